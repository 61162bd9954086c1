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

//! The Input State Tracker.
//!
//! Keys and buttons live in fixed-size arrays indexed by [`Key::index`] and
//! [`MouseButton::index`]. Only the event dispatcher mutates them during a
//! tick; scripts read them through the [`GameContext`](crate::GameContext).

mod key;
mod state;

pub use self::key::{Key, Modifier, MouseButton};
pub use self::state::{InputState, ModifierState, PointerState, SyntheticRelease};
