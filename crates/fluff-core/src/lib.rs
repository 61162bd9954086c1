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

//! # Fluff Core
//!
//! Foundational crate of the Fluff runtime: the per-frame input tracker, the
//! raw event dispatcher, the socket multiplexer, and the contracts that the
//! windowing, font and scripting collaborators must fulfil.

#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod event;
pub mod graphics;
pub mod input;
pub mod math;
pub mod net;
pub mod platform;
pub mod script;
pub mod state;
pub mod utils;

pub use config::GameConfig;
pub use context::GameContext;
pub use utils::timer::Stopwatch;
