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

//! Backend-agnostic platform events.

use crate::input::{Key, MouseButton};

/// One event pulled from the windowing collaborator.
///
/// Backends translate their native events into this enum; anything the
/// runtime does not react to arrives as [`RawEvent::Unhandled`] or is dropped
/// before it gets here.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    /// A keyboard key changed state.
    Key {
        /// The key that changed.
        key: Key,
        /// `true` on press, `false` on release.
        pressed: bool,
    },
    /// A mouse button changed state.
    Button {
        /// The button that changed.
        button: MouseButton,
        /// `true` on press, `false` on release.
        pressed: bool,
    },
    /// The pointer moved over the surface.
    PointerMoved {
        /// New horizontal position in surface pixels.
        x: i32,
        /// New vertical position in surface pixels.
        y: i32,
    },
    /// The wheel moved.
    Wheel {
        /// Wheel steps; positive away from the user.
        delta: i32,
    },
    /// The pointer entered (`true`) or left (`false`) the surface.
    PointerCrossing {
        /// Whether the pointer is now inside.
        entered: bool,
    },
    /// The surface gained (`true`) or lost (`false`) input focus.
    Focus {
        /// Whether focus was gained.
        gained: bool,
    },
    /// The user asked to close the surface.
    CloseRequested,
    /// The surface was resized by the platform.
    Resized {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
    /// Any other platform event.
    Unhandled,
}
