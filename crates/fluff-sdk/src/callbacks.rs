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

//! A closure-backed [`CallbackHost`].

use fluff_core::script::{Callback, CallbackArg, CallbackError, CallbackHost};
use fluff_core::GameContext;
use std::collections::HashMap;
use std::fmt;

type Handler = Box<dyn FnMut(&[CallbackArg], &mut GameContext) -> Result<(), CallbackError>>;

struct Entry {
    arity: Option<usize>,
    handler: Handler,
}

/// Callbacks registered by name, for hosts written directly in Rust.
///
/// Lifecycle callbacks registered through [`on`](Self::on) are checked
/// against their fixed argument count before they run.
#[derive(Default)]
pub struct CallbackTable {
    entries: HashMap<String, Entry>,
}

impl CallbackTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a lifecycle callback, replacing any previous handler.
    pub fn on<F>(&mut self, callback: Callback, handler: F) -> &mut Self
    where
        F: FnMut(&[CallbackArg], &mut GameContext) -> Result<(), CallbackError> + 'static,
    {
        self.entries.insert(
            callback.name().to_string(),
            Entry {
                arity: Some(callback.arity()),
                handler: Box::new(handler),
            },
        );
        self
    }

    /// Registers `onUpdate`, which receives the frame time in seconds.
    pub fn on_update<F>(&mut self, mut handler: F) -> &mut Self
    where
        F: FnMut(f64, &mut GameContext) -> Result<(), CallbackError> + 'static,
    {
        self.on(Callback::Update, move |args, ctx| {
            let delta = args.first().map_or(0.0, CallbackArg::as_number);
            handler(delta, ctx)
        })
    }

    /// Registers a handler under an arbitrary name, with no arity check.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: FnMut(&[CallbackArg], &mut GameContext) -> Result<(), CallbackError> + 'static,
    {
        self.entries.insert(
            name.into(),
            Entry {
                arity: None,
                handler: Box::new(handler),
            },
        );
        self
    }

    /// Removes the handler for `name`. Returns `true` if one was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Returns `true` if a handler is registered for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

impl CallbackHost for CallbackTable {
    fn invoke(
        &mut self,
        name: &str,
        args: &[CallbackArg],
        ctx: &mut GameContext,
    ) -> Result<bool, CallbackError> {
        let Some(entry) = self.entries.get_mut(name) else {
            return Ok(false);
        };
        if let Some(expected) = entry.arity {
            if args.len() != expected {
                return Err(CallbackError::Arity {
                    expected,
                    actual: args.len(),
                });
            }
        }
        (entry.handler)(args, ctx)?;
        Ok(true)
    }
}

impl fmt::Debug for CallbackTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CallbackTable")
            .field("callbacks", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fluff_core::GameConfig;
    use std::cell::Cell;
    use std::rc::Rc;

    fn ctx() -> GameContext {
        GameContext::new(&GameConfig::default())
    }

    #[test]
    fn missing_callback_does_not_run() {
        let mut table = CallbackTable::new();
        assert!(!table.invoke("onDraw", &[], &mut ctx()).unwrap());
    }

    #[test]
    fn update_receives_delta() {
        let seen = Rc::new(Cell::new(0.0));
        let sink = Rc::clone(&seen);
        let mut table = CallbackTable::new();
        table.on_update(move |dt, _| {
            sink.set(dt);
            Ok(())
        });

        let ran = table
            .invoke("onUpdate", &[CallbackArg::Number(0.25)], &mut ctx())
            .unwrap();
        assert!(ran);
        assert_relative_eq!(seen.get(), 0.25);
    }

    #[test]
    fn lifecycle_arity_is_enforced() {
        let mut table = CallbackTable::new();
        table.on(Callback::Draw, |_, _| Ok(()));
        let err = table
            .invoke("onDraw", &[CallbackArg::Number(1.0)], &mut ctx())
            .unwrap_err();
        assert!(matches!(
            err,
            CallbackError::Arity {
                expected: 0,
                actual: 1
            }
        ));
    }

    #[test]
    fn handlers_can_mutate_the_context() {
        let mut table = CallbackTable::new();
        table.register("custom", |_, ctx| {
            ctx.request_exit();
            Ok(())
        });
        let mut ctx = ctx();
        ctx.run.running = true;
        table.invoke("custom", &[], &mut ctx).unwrap();
        assert!(!ctx.run.running);
    }

    #[test]
    fn errors_surface_to_the_caller() {
        let mut table = CallbackTable::new();
        table.on(Callback::Exit, |_, _| Err(CallbackError::Script("nope".into())));
        assert!(table.invoke("onExit", &[], &mut ctx()).is_err());
        assert!(table.remove("onExit"));
        assert!(!table.contains("onExit"));
    }
}
