// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The fixed keyboard and mouse-button spaces tracked by the runtime.

use serde::{Deserialize, Serialize};

/// Declares the [`Key`] enum together with its dense index table.
///
/// Every variant gets an implicit discriminant equal to its position, which is
/// what `Key::index` relies on to address the fixed-size state arrays.
macro_rules! key_codes {
    ($($name:ident),+ $(,)?) => {
        /// A physical keyboard key.
        ///
        /// The key space is closed: platform keys without a counterpart here
        /// are dropped by the backend translation layer.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Key {
            $(
                #[doc = concat!("The `", stringify!($name), "` key.")]
                $name,
            )+
        }

        impl Key {
            /// Every key, in index order.
            pub const ALL: &'static [Key] = &[$(Key::$name),+];
        }
    };
}

key_codes! {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    Escape,
    LControl, LShift, LAlt, LSystem,
    RControl, RShift, RAlt, RSystem,
    Menu,
    LBracket, RBracket, SemiColon, Comma, Period, Quote, Slash, BackSlash,
    Tilde, Equal, Dash,
    Space, Return, Back, Tab,
    PageUp, PageDown, End, Home, Insert, Delete,
    Add, Subtract, Multiply, Divide,
    Left, Right, Up, Down,
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
    Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12, F13, F14, F15,
    Pause,
}

impl Key {
    /// Number of distinct keys.
    pub const COUNT: usize = Key::ALL.len();

    /// Dense index of this key, in `0..Key::COUNT`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the modifier this key drives, if it is a left/right
    /// Ctrl, Shift or Alt variant.
    pub const fn modifier(self) -> Option<Modifier> {
        match self {
            Key::LControl | Key::RControl => Some(Modifier::Ctrl),
            Key::LShift | Key::RShift => Some(Modifier::Shift),
            Key::LAlt | Key::RAlt => Some(Modifier::Alt),
            _ => None,
        }
    }
}

/// One of the three tracked keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Either Control key.
    Ctrl,
    /// Either Shift key.
    Shift,
    /// Either Alt key.
    Alt,
}

impl Modifier {
    /// The (left, right) physical keys backing this modifier.
    pub const fn keys(self) -> (Key, Key) {
        match self {
            Modifier::Ctrl => (Key::LControl, Key::RControl),
            Modifier::Shift => (Key::LShift, Key::RShift),
            Modifier::Alt => (Key::LAlt, Key::RAlt),
        }
    }
}

/// A mouse button.
///
/// Unlike the platform layer, buttons beyond the five standard ones are not
/// tracked, so the button space stays fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// The left mouse button.
    Left,
    /// The right mouse button.
    Right,
    /// The middle mouse button.
    Middle,
    /// The back mouse button (typically on the side).
    Back,
    /// The forward mouse button (typically on the side).
    Forward,
}

impl MouseButton {
    /// Every button, in index order.
    pub const ALL: [MouseButton; 5] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::Back,
        MouseButton::Forward,
    ];

    /// Number of distinct buttons.
    pub const COUNT: usize = MouseButton::ALL.len();

    /// Dense index of this button, in `0..MouseButton::COUNT`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}
