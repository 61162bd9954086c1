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

//! Translation of raw platform events into state changes and callbacks.
//!
//! [`translate`] is a pure function: it looks at one [`RawEvent`] and the
//! configured key bindings and reset policy, and describes what should happen
//! as a [`Transition`]. [`EventDispatcher`] applies those transitions to a
//! [`GameContext`] and drains a whole surface queue in one go.

use super::RawEvent;
use crate::config::{KeyBindings, ResetPolicy};
use crate::context::GameContext;
use crate::input::{Key, Modifier, MouseButton};
use crate::platform::Surface;
use crate::script::Callback;

/// A single mutation of the runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEffect {
    /// Clear the running flag.
    StopRunning,
    /// Clear the running flag and ask the host to reload.
    RequestReload,
    /// Record a key transition.
    SetKey {
        /// The key.
        key: Key,
        /// New state.
        down: bool,
    },
    /// Recompute a modifier flag from its left and right keys.
    SyncModifier(Modifier),
    /// Record a button transition.
    SetButton {
        /// The button.
        button: MouseButton,
        /// New state.
        down: bool,
    },
    /// Set the focus flag.
    SetFocus(bool),
    /// Set the pointer-inside flag.
    SetPointerInside(bool),
    /// Release every button without notification.
    ResetButtons,
    /// Release every key without notification.
    ResetKeys,
    /// Overwrite the wheel delta.
    SetScroll(i32),
    /// Overwrite the pointer position.
    MovePointer {
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
    },
}

/// Everything one raw event causes: ordered state effects, then at most one
/// callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// Effects, applied in order.
    pub effects: Vec<StateEffect>,
    /// Callback to invoke once the effects are applied.
    pub callback: Option<Callback>,
}

impl Transition {
    fn from_effects(effects: Vec<StateEffect>) -> Self {
        Self {
            effects,
            callback: None,
        }
    }

    fn with_callback(mut self, callback: Callback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Returns `true` if the event has no consequence at all.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.callback.is_none()
    }

    /// Applies the effects to `ctx` and returns the callback to invoke.
    pub fn apply(&self, ctx: &mut GameContext) -> Option<Callback> {
        for effect in &self.effects {
            match *effect {
                StateEffect::StopRunning => ctx.run.request_exit(),
                StateEffect::RequestReload => ctx.run.request_reload(),
                StateEffect::SetKey { key, down } => ctx.input.set_key(key, down),
                StateEffect::SyncModifier(which) => ctx.input.sync_modifier(which),
                StateEffect::SetButton { button, down } => ctx.input.set_button(button, down),
                StateEffect::SetFocus(focused) => ctx.run.has_focus = focused,
                StateEffect::SetPointerInside(inside) => ctx.run.pointer_inside = inside,
                StateEffect::ResetButtons => ctx.input.reset_all_buttons(false),
                StateEffect::ResetKeys => ctx.input.reset_all_keys(false),
                StateEffect::SetScroll(delta) => ctx.pointer.scroll_delta = delta,
                StateEffect::MovePointer { x, y } => {
                    ctx.pointer.x = x;
                    ctx.pointer.y = y;
                }
            }
        }
        self.callback
    }
}

/// Maps one raw event to its transition.
pub fn translate(event: &RawEvent, keys: &KeyBindings, policy: &ResetPolicy) -> Transition {
    use StateEffect::*;

    match *event {
        RawEvent::Key { key, pressed } => {
            let mut effects = Vec::with_capacity(3);
            if pressed {
                if keys.exit == Some(key) {
                    effects.push(StopRunning);
                } else if keys.reload == Some(key) {
                    effects.push(RequestReload);
                }
            }
            effects.push(SetKey { key, down: pressed });
            if let Some(which) = key.modifier() {
                effects.push(SyncModifier(which));
            }
            Transition::from_effects(effects)
        }
        RawEvent::Button { button, pressed } => Transition::from_effects(vec![SetButton {
            button,
            down: pressed,
        }]),
        RawEvent::PointerMoved { x, y } => Transition::from_effects(vec![MovePointer { x, y }]),
        RawEvent::Wheel { delta } => Transition::from_effects(vec![SetScroll(delta)]),
        RawEvent::CloseRequested => Transition::from_effects(vec![StopRunning]),
        RawEvent::Focus { gained: true } => {
            Transition::from_effects(vec![SetFocus(true)]).with_callback(Callback::Focus)
        }
        RawEvent::Focus { gained: false } => {
            let mut effects = vec![SetFocus(false)];
            if policy.reset_buttons {
                effects.push(ResetButtons);
            }
            if policy.reset_keys {
                effects.push(ResetKeys);
            }
            Transition::from_effects(effects).with_callback(Callback::Blur)
        }
        RawEvent::PointerCrossing { entered: true } => {
            Transition::from_effects(vec![SetPointerInside(true)]).with_callback(Callback::Enter)
        }
        RawEvent::PointerCrossing { entered: false } => {
            let mut effects = vec![SetPointerInside(false)];
            if policy.reset_buttons {
                effects.push(ResetButtons);
            }
            Transition::from_effects(effects).with_callback(Callback::Leave)
        }
        RawEvent::Resized { .. } | RawEvent::Unhandled => Transition::default(),
    }
}

/// Applies raw events to a [`GameContext`] under fixed bindings and policy.
#[derive(Debug, Clone, Default)]
pub struct EventDispatcher {
    keys: KeyBindings,
    policy: ResetPolicy,
}

impl EventDispatcher {
    /// Creates a dispatcher.
    pub fn new(keys: KeyBindings, policy: ResetPolicy) -> Self {
        Self { keys, policy }
    }

    /// Translates and applies a single event, returning the callback it asks for.
    pub fn dispatch(&self, event: &RawEvent, ctx: &mut GameContext) -> Option<Callback> {
        let transition = translate(event, &self.keys, &self.policy);
        if transition.is_empty() {
            log::trace!("Ignoring event {event:?}");
        }
        transition.apply(ctx)
    }

    /// Polls `surface` until its queue is empty, dispatching every event.
    ///
    /// Each callback is handed to `on_callback` right after its event's
    /// effects are applied, so later events in the burst see the state the
    /// callback left behind. Returns the number of events drained.
    pub fn drain<S, F, E>(
        &self,
        surface: &mut S,
        ctx: &mut GameContext,
        mut on_callback: F,
    ) -> Result<usize, E>
    where
        S: Surface + ?Sized,
        F: FnMut(Callback, &mut GameContext) -> Result<(), E>,
    {
        let mut drained = 0;
        while let Some(event) = surface.poll_event() {
            drained += 1;
            if let Some(callback) = self.dispatch(&event, ctx) {
                on_callback(callback, ctx)?;
            }
        }
        Ok(drained)
    }
}
