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

//! Process-level run flags.

/// Flags describing whether the loop keeps running and how the surface is
/// currently engaged by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunState {
    /// Cleared to leave the loop after the current tick.
    pub running: bool,
    /// Set when the user asked for a reload; interpreted by the host.
    pub reload_requested: bool,
    /// The surface currently has input focus.
    pub has_focus: bool,
    /// The pointer is currently over the surface.
    pub pointer_inside: bool,
}

impl RunState {
    /// State right after a successful surface creation.
    pub fn started() -> Self {
        Self {
            running: true,
            reload_requested: false,
            has_focus: true,
            pointer_inside: false,
        }
    }

    /// Asks the loop to stop once the current tick completes.
    pub fn request_exit(&mut self) {
        self.running = false;
    }

    /// Asks the loop to stop and the host to reload.
    pub fn request_reload(&mut self) {
        self.running = false;
        self.reload_requested = true;
    }
}
