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

//! The public-facing SDK of the Fluff runtime.
//!
//! Hosts either call [`run_loop`] with a [`CallbackHost`] and let it open a
//! desktop window, or build a [`FrameLoop`] around their own surface.

mod callbacks;
mod frame_loop;

use anyhow::{Context, Result};
use fluff_core::script::CallbackHost;
use fluff_core::GameConfig;
use fluff_infra::{AbGlyphFontLoader, WinitSurface};

pub use callbacks::CallbackTable;
pub use frame_loop::{FrameLoop, LoopError, LoopOutcome, LoopPhase};

pub mod prelude {
    pub use crate::{run_loop, CallbackTable, FrameLoop, LoopError, LoopOutcome, LoopPhase};
    pub use fluff_core::config::{FaultPolicy, GameConfig};
    pub use fluff_core::event::EventBus;
    pub use fluff_core::graphics::BlendMode;
    pub use fluff_core::input::{Key, Modifier, MouseButton};
    pub use fluff_core::math::LinearRgba;
    pub use fluff_core::net::{SharedSocket, Socket, SocketStatus};
    pub use fluff_core::script::{Callback, CallbackArg, CallbackError, CallbackHost};
    pub use fluff_core::GameContext;
    pub use fluff_infra::{AbGlyphFontLoader, SocketEvent, TcpSocket, WinitSurface};
}

/// Opens a desktop window for `config` and runs `host` until the loop stops.
///
/// The window can only be opened once per process: hosts that reload should
/// keep the surface from [`FrameLoop::into_parts`] and build a new
/// [`FrameLoop`] around it instead of calling this again.
pub fn run_loop<H: CallbackHost>(config: GameConfig, host: H) -> Result<LoopOutcome> {
    config.validate().context("invalid game configuration")?;

    let surface = WinitSurface::new().context("failed to initialise the window system")?;
    let mut frame_loop =
        FrameLoop::new(config, surface, host).with_font_loader(Box::new(AbGlyphFontLoader));
    let outcome = frame_loop.run().context("frame loop failed")?;

    log::info!(
        "Loop finished after {} frame(s){}.",
        outcome.frames,
        if outcome.reload_requested {
            ", reload requested"
        } else {
            ""
        }
    );
    Ok(outcome)
}
