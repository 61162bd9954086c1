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

//! The contract between the loop and the embedded scripting engine.
//!
//! The loop never knows what runs behind a callback. It only asks a
//! [`CallbackHost`] to resolve a name and run it synchronously.

use crate::context::GameContext;
use std::fmt;

/// The lifecycle callbacks the runtime invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Callback {
    /// `onUpdate(deltaSeconds)`, once per tick.
    Update,
    /// `onDraw()`, once per tick after update.
    Draw,
    /// `onFocus()`, when the surface gains focus.
    Focus,
    /// `onBlur()`, when the surface loses focus.
    Blur,
    /// `onEnter()`, when the pointer enters the surface.
    Enter,
    /// `onLeave()`, when the pointer leaves the surface.
    Leave,
    /// `onExit()`, once during shutdown.
    Exit,
}

impl Callback {
    /// The script-visible name of the callback.
    pub const fn name(self) -> &'static str {
        match self {
            Callback::Update => "onUpdate",
            Callback::Draw => "onDraw",
            Callback::Focus => "onFocus",
            Callback::Blur => "onBlur",
            Callback::Enter => "onEnter",
            Callback::Leave => "onLeave",
            Callback::Exit => "onExit",
        }
    }

    /// Number of arguments the callback is always invoked with.
    pub const fn arity(self) -> usize {
        match self {
            Callback::Update => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value passed to a callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CallbackArg {
    /// A floating-point number.
    Number(f64),
}

impl CallbackArg {
    /// Returns the numeric value of this argument.
    pub fn as_number(&self) -> f64 {
        match self {
            CallbackArg::Number(value) => *value,
        }
    }
}

/// An error raised by a script while running a callback.
#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    /// The script threw; the message is whatever the engine reported.
    #[error("script raised: {0}")]
    Script(String),
    /// The callback was invoked with the wrong number of arguments.
    #[error("expected {expected} argument(s), got {actual}")]
    Arity {
        /// Declared arity.
        expected: usize,
        /// Number of arguments received.
        actual: usize,
    },
}

/// The embedding boundary: resolves a callback name to zero or one handler
/// and runs it to completion.
pub trait CallbackHost {
    /// Invokes the handler registered under `name`.
    ///
    /// Returns `Ok(false)` when no handler is registered; a missing callback
    /// is never an error.
    fn invoke(
        &mut self,
        name: &str,
        args: &[CallbackArg],
        ctx: &mut GameContext,
    ) -> Result<bool, CallbackError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_the_script_surface() {
        let names: Vec<&str> = [
            Callback::Update,
            Callback::Draw,
            Callback::Focus,
            Callback::Blur,
            Callback::Enter,
            Callback::Leave,
            Callback::Exit,
        ]
        .iter()
        .map(|cb| cb.name())
        .collect();
        assert_eq!(
            names,
            ["onUpdate", "onDraw", "onFocus", "onBlur", "onEnter", "onLeave", "onExit"]
        );
    }

    #[test]
    fn only_update_takes_an_argument() {
        assert_eq!(Callback::Update.arity(), 1);
        assert_eq!(Callback::Draw.arity(), 0);
        assert_eq!(Callback::Exit.arity(), 0);
    }
}
