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

//! Edge-triggered keyboard, mouse-button and pointer state.

use super::key::{Key, Modifier, MouseButton};

/// A release transition produced by a reset rather than by the platform.
///
/// Only emitted when a reset is asked to notify listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticRelease {
    /// A key that was down when the reset happened.
    Key(Key),
    /// A button that was down when the reset happened.
    Button(MouseButton),
}

/// The three modifier flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    /// Either Control key is held.
    pub ctrl: bool,
    /// Either Shift key is held.
    pub shift: bool,
    /// Either Alt key is held.
    pub alt: bool,
}

impl ModifierState {
    /// Returns the flag for `which`.
    pub fn get(&self, which: Modifier) -> bool {
        match which {
            Modifier::Ctrl => self.ctrl,
            Modifier::Shift => self.shift,
            Modifier::Alt => self.alt,
        }
    }

    fn set(&mut self, which: Modifier, active: bool) {
        match which {
            Modifier::Ctrl => self.ctrl = active,
            Modifier::Shift => self.shift = active,
            Modifier::Alt => self.alt = active,
        }
    }
}

/// Which keys and buttons are currently held down.
///
/// A key or button is down between its press and its matching release, or
/// until a reset clears it. The previous frame's snapshot (taken by
/// [`InputState::begin_frame`]) backs the `was_*` edge queries.
#[derive(Debug, Clone)]
pub struct InputState {
    keys: [bool; Key::COUNT],
    buttons: [bool; MouseButton::COUNT],
    previous_keys: [bool; Key::COUNT],
    previous_buttons: [bool; MouseButton::COUNT],
    modifiers: ModifierState,
    synthetic: Vec<SyntheticRelease>,
}

impl InputState {
    /// Creates a state with every key and button up.
    pub fn new() -> Self {
        Self {
            keys: [false; Key::COUNT],
            buttons: [false; MouseButton::COUNT],
            previous_keys: [false; Key::COUNT],
            previous_buttons: [false; MouseButton::COUNT],
            modifiers: ModifierState::default(),
            synthetic: Vec::new(),
        }
    }

    /// Snapshots the current state as "previous frame".
    ///
    /// Called once per tick before any event is dispatched.
    pub fn begin_frame(&mut self) {
        self.previous_keys = self.keys;
        self.previous_buttons = self.buttons;
    }

    /// Records a key transition.
    pub fn set_key(&mut self, key: Key, down: bool) {
        self.keys[key.index()] = down;
    }

    /// Records a mouse-button transition.
    pub fn set_button(&mut self, button: MouseButton, down: bool) {
        self.buttons[button.index()] = down;
    }

    /// Sets a modifier flag directly.
    pub fn set_modifier(&mut self, which: Modifier, active: bool) {
        self.modifiers.set(which, active);
    }

    /// Recomputes a modifier flag from its left and right keys.
    ///
    /// The flag stays set while either variant is held.
    pub fn sync_modifier(&mut self, which: Modifier) {
        let (left, right) = which.keys();
        let active = self.is_key_down(left) || self.is_key_down(right);
        self.set_modifier(which, active);
    }

    /// Releases every key and clears the modifier flags.
    ///
    /// With `notify`, one [`SyntheticRelease`] is queued per key that was
    /// down. Focus-loss resets never notify.
    pub fn reset_all_keys(&mut self, notify: bool) {
        for key in Key::ALL {
            if self.keys[key.index()] && notify {
                self.synthetic.push(SyntheticRelease::Key(*key));
            }
        }
        self.keys = [false; Key::COUNT];
        self.modifiers = ModifierState::default();
    }

    /// Releases every mouse button.
    ///
    /// With `notify`, one [`SyntheticRelease`] is queued per button that was
    /// down.
    pub fn reset_all_buttons(&mut self, notify: bool) {
        for button in MouseButton::ALL {
            if self.buttons[button.index()] && notify {
                self.synthetic.push(SyntheticRelease::Button(button));
            }
        }
        self.buttons = [false; MouseButton::COUNT];
    }

    /// Drains the synthetic releases queued by notifying resets.
    pub fn take_synthetic_releases(&mut self) -> Vec<SyntheticRelease> {
        std::mem::take(&mut self.synthetic)
    }

    /// Returns `true` while `key` is held.
    #[inline]
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys[key.index()]
    }

    /// Returns `true` while `button` is held.
    #[inline]
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons[button.index()]
    }

    /// Returns `true` if `key` went down since the last [`begin_frame`](Self::begin_frame).
    pub fn was_key_pressed(&self, key: Key) -> bool {
        self.keys[key.index()] && !self.previous_keys[key.index()]
    }

    /// Returns `true` if `key` went up since the last [`begin_frame`](Self::begin_frame).
    pub fn was_key_released(&self, key: Key) -> bool {
        !self.keys[key.index()] && self.previous_keys[key.index()]
    }

    /// Returns `true` if `button` went down since the last [`begin_frame`](Self::begin_frame).
    pub fn was_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button.index()] && !self.previous_buttons[button.index()]
    }

    /// Returns `true` if `button` went up since the last [`begin_frame`](Self::begin_frame).
    pub fn was_button_released(&self, button: MouseButton) -> bool {
        !self.buttons[button.index()] && self.previous_buttons[button.index()]
    }

    /// The current modifier flags.
    pub fn modifiers(&self) -> ModifierState {
        self.modifiers
    }

    /// Iterates over the keys currently held, in index order.
    pub fn keys_down(&self) -> impl Iterator<Item = Key> + '_ {
        Key::ALL.iter().copied().filter(|key| self.is_key_down(*key))
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Last known pointer position and wheel delta.
///
/// Both are overwritten by each event, never accumulated. `scroll_delta`
/// keeps the last wheel event's value across ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerState {
    /// Horizontal position in surface pixels.
    pub x: i32,
    /// Vertical position in surface pixels.
    pub y: i32,
    /// Delta of the most recent wheel event, in wheel steps.
    pub scroll_delta: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_only_touch_their_key() {
        let mut input = InputState::new();
        input.set_key(Key::A, true);
        assert!(input.is_key_down(Key::A));
        assert!(!input.is_key_down(Key::B));

        input.set_key(Key::B, true);
        input.set_key(Key::A, false);
        assert!(!input.is_key_down(Key::A));
        assert!(input.is_key_down(Key::B));
    }

    #[test]
    fn ctrl_clears_only_after_both_variants_are_up() {
        let mut input = InputState::new();

        input.set_key(Key::LControl, true);
        input.sync_modifier(Modifier::Ctrl);
        assert!(input.modifiers().ctrl);

        input.set_key(Key::RControl, true);
        input.sync_modifier(Modifier::Ctrl);
        input.set_key(Key::LControl, false);
        input.sync_modifier(Modifier::Ctrl);
        assert!(input.modifiers().ctrl, "right ctrl is still held");

        input.set_key(Key::RControl, false);
        input.sync_modifier(Modifier::Ctrl);
        assert!(!input.modifiers().ctrl);
    }

    #[test]
    fn reset_keys_without_notify_is_silent_and_idempotent() {
        let mut input = InputState::new();
        input.set_key(Key::W, true);
        input.set_key(Key::LShift, true);
        input.sync_modifier(Modifier::Shift);

        input.reset_all_keys(false);
        let once: Vec<Key> = input.keys_down().collect();
        input.reset_all_keys(false);
        let twice: Vec<Key> = input.keys_down().collect();

        assert!(once.is_empty());
        assert_eq!(once, twice);
        assert!(!input.modifiers().shift);
        assert!(input.take_synthetic_releases().is_empty());
    }

    #[test]
    fn notifying_reset_reports_each_held_key_once() {
        let mut input = InputState::new();
        input.set_key(Key::A, true);
        input.set_key(Key::Space, true);

        input.reset_all_keys(true);
        input.reset_all_keys(true);

        assert_eq!(
            input.take_synthetic_releases(),
            vec![SyntheticRelease::Key(Key::A), SyntheticRelease::Key(Key::Space)]
        );
    }

    #[test]
    fn reset_buttons_leaves_keys_alone() {
        let mut input = InputState::new();
        input.set_key(Key::D, true);
        input.set_button(MouseButton::Left, true);
        input.set_button(MouseButton::Middle, true);

        input.reset_all_buttons(true);

        assert!(!input.is_button_down(MouseButton::Left));
        assert!(!input.is_button_down(MouseButton::Middle));
        assert!(input.is_key_down(Key::D));
        assert_eq!(
            input.take_synthetic_releases(),
            vec![
                SyntheticRelease::Button(MouseButton::Left),
                SyntheticRelease::Button(MouseButton::Middle)
            ]
        );
    }

    #[test]
    fn edge_queries_compare_against_previous_frame() {
        let mut input = InputState::new();
        input.begin_frame();
        input.set_key(Key::Up, true);
        assert!(input.was_key_pressed(Key::Up));

        input.begin_frame();
        assert!(!input.was_key_pressed(Key::Up), "held, not newly pressed");
        input.set_key(Key::Up, false);
        assert!(input.was_key_released(Key::Up));

        input.begin_frame();
        input.set_button(MouseButton::Right, true);
        assert!(input.was_button_pressed(MouseButton::Right));
        input.begin_frame();
        input.set_button(MouseButton::Right, false);
        assert!(input.was_button_released(MouseButton::Right));
    }
}
