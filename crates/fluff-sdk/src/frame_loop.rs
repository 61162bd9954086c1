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

//! The frame loop controller.
//!
//! A [`FrameLoop`] owns the surface, the callback host and the
//! [`GameContext`], and moves through
//! `Starting -> Running -> Stopping -> Stopped`. Every tick runs the same
//! six steps; the running flag is only looked at once a tick is complete.

use fluff_core::config::FaultPolicy;
use fluff_core::event::EventDispatcher;
use fluff_core::graphics::{DrawCommand, FontLoader, FontRegistry, SurfaceRequest};
use fluff_core::platform::{Surface, SurfaceError, SurfaceSettings};
use fluff_core::script::{Callback, CallbackArg, CallbackError, CallbackHost};
use fluff_core::state::RunState;
use fluff_core::{GameConfig, GameContext};
use std::io::Write;

/// Lifecycle of a [`FrameLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Created; the surface is not open yet.
    Starting,
    /// Ticking.
    Running,
    /// The running flag was cleared; shutdown is pending.
    Stopping,
    /// Terminal. The surface is released.
    Stopped,
}

/// Errors that end a [`FrameLoop`].
#[derive(Debug, thiserror::Error)]
pub enum LoopError {
    /// The surface failed to open or present.
    #[error("surface failure: {0}")]
    Surface(#[from] SurfaceError),
    /// A callback raised and the fault policy propagates it.
    #[error("callback '{name}' failed: {source}")]
    Callback {
        /// Script-visible callback name.
        name: &'static str,
        /// The script error.
        #[source]
        source: CallbackError,
    },
    /// An operation was attempted in the wrong phase.
    #[error("frame loop is {actual:?}, expected {expected:?}")]
    InvalidPhase {
        /// Phase the operation needs.
        expected: LoopPhase,
        /// Phase the loop is in.
        actual: LoopPhase,
    },
}

/// What the host gets back once the loop is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOutcome {
    /// The user asked for a reload; the host decides what that means.
    pub reload_requested: bool,
    /// Number of completed ticks.
    pub frames: u64,
}

/// Runs a callback and applies the fault policy to its error.
fn invoke_callback<H: CallbackHost>(
    host: &mut H,
    ctx: &mut GameContext,
    policy: FaultPolicy,
    callback: Callback,
    args: &[CallbackArg],
) -> Result<(), LoopError> {
    match host.invoke(callback.name(), args, ctx) {
        Ok(true) => Ok(()),
        Ok(false) => {
            log::trace!("No handler for {callback}; skipped.");
            Ok(())
        }
        Err(source) => match policy {
            FaultPolicy::Propagate => Err(LoopError::Callback {
                name: callback.name(),
                source,
            }),
            FaultPolicy::LogAndContinue => {
                log::error!("{callback} failed: {source}");
                Ok(())
            }
            FaultPolicy::LogAndStop => {
                log::error!("{callback} failed, stopping: {source}");
                ctx.run.request_exit();
                Ok(())
            }
        },
    }
}

/// The top-level driver of a game.
pub struct FrameLoop<S: Surface, H: CallbackHost> {
    config: GameConfig,
    surface: S,
    host: H,
    ctx: GameContext,
    dispatcher: EventDispatcher,
    phase: LoopPhase,
    frames: u64,
}

impl<S: Surface, H: CallbackHost> FrameLoop<S, H> {
    /// Creates a loop in the `Starting` phase. Nothing is opened yet.
    pub fn new(config: GameConfig, surface: S, host: H) -> Self {
        let ctx = GameContext::new(&config);
        let dispatcher = EventDispatcher::new(config.key_bindings(), config.reset_policy());
        Self {
            config,
            surface,
            host,
            ctx,
            dispatcher,
            phase: LoopPhase::Starting,
            frames: 0,
        }
    }

    /// Replaces the font backend. Fonts loaded so far are dropped.
    pub fn with_font_loader(mut self, loader: Box<dyn FontLoader>) -> Self {
        self.ctx.fonts = FontRegistry::new(loader);
        self
    }

    /// Current phase.
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// The game state.
    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    /// The game state, mutably (e.g. to register sockets before `run`).
    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.ctx
    }

    /// The surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Opens and configures the surface, records the initial clear and
    /// enters `Running`.
    ///
    /// # Errors
    /// A surface that cannot be created or cleared is fatal: the surface is
    /// released and the loop goes straight to `Stopped` without invoking any
    /// callback.
    pub fn start(&mut self) -> Result<(), LoopError> {
        self.expect_phase(LoopPhase::Starting)?;

        if self.surface.is_open() {
            self.surface.close();
        }
        let settings = SurfaceSettings::from_config(&self.config);
        if let Err(e) = self.surface.create(&settings) {
            log::error!("Could not create the surface: {e}");
            self.phase = LoopPhase::Stopped;
            return Err(e.into());
        }

        self.surface.set_key_repeat(false);
        self.surface.set_vertical_sync(self.config.vsync);
        self.surface.set_frame_rate_limit(self.config.fps);
        let initial_clear = [DrawCommand::Clear(self.ctx.render.clear_color)];
        if let Err(e) = self.surface.submit(&initial_clear) {
            log::error!("Could not clear the new surface: {e}");
            self.surface.close();
            self.phase = LoopPhase::Stopped;
            return Err(e.into());
        }

        self.ctx.run = RunState::started();
        self.phase = LoopPhase::Running;
        log::info!(
            "Frame loop running ({}x{}, {} fps cap).",
            self.surface.width(),
            self.surface.height(),
            self.config.fps
        );
        Ok(())
    }

    /// Runs one tick: events, sockets, `onUpdate`, `onDraw`, present, flush.
    ///
    /// All six steps run even if an early step clears the running flag; the
    /// loop moves to `Stopping` afterwards.
    pub fn tick(&mut self) -> Result<(), LoopError> {
        self.expect_phase(LoopPhase::Running)?;
        let policy = self.config.fault_policy;

        // 1. Events.
        self.ctx.input.begin_frame();
        let host = &mut self.host;
        let drained = self
            .dispatcher
            .drain(&mut self.surface, &mut self.ctx, |callback, ctx| {
                invoke_callback(&mut *host, ctx, policy, callback, &[])
            })?;
        if drained > 0 {
            log::trace!("Dispatched {drained} event(s).");
        }

        // 2. Sockets.
        let report = self.ctx.sockets.poll_all();
        if report.faulted > 0 {
            log::warn!("{} socket(s) faulted this tick.", report.faulted);
        }

        // 3. Update.
        let delta = f64::from(self.surface.frame_time());
        invoke_callback(
            &mut self.host,
            &mut self.ctx,
            policy,
            Callback::Update,
            &[CallbackArg::Number(delta)],
        )?;

        // 4. Draw.
        invoke_callback(&mut self.host, &mut self.ctx, policy, Callback::Draw, &[])?;

        // 5. Present.
        self.present()?;

        // 6. Flush.
        self.flush_output();

        self.frames += 1;
        if !self.ctx.run.running {
            log::info!("Running flag cleared after {} frame(s).", self.frames);
            self.phase = LoopPhase::Stopping;
        }
        Ok(())
    }

    /// Closes every socket, invokes `onExit`, then releases the surface.
    ///
    /// The surface is released even when `onExit` fails.
    pub fn shutdown(&mut self) -> Result<(), LoopError> {
        self.expect_phase(LoopPhase::Stopping)?;

        self.ctx.sockets.close_all();
        let exit = invoke_callback(
            &mut self.host,
            &mut self.ctx,
            self.config.fault_policy,
            Callback::Exit,
            &[],
        );
        self.flush_output();
        self.surface.close();
        self.phase = LoopPhase::Stopped;
        log::info!("Frame loop stopped.");
        exit
    }

    /// Drives the loop from `Starting` to `Stopped`.
    ///
    /// A propagated fault skips `onExit` but still closes the sockets and
    /// releases the surface before the error is returned.
    pub fn run(&mut self) -> Result<LoopOutcome, LoopError> {
        self.start()?;
        while self.phase == LoopPhase::Running {
            if let Err(e) = self.tick() {
                log::error!("Tick failed: {e}");
                self.abort();
                return Err(e);
            }
        }
        self.shutdown()?;
        Ok(self.outcome())
    }

    /// The outcome so far.
    pub fn outcome(&self) -> LoopOutcome {
        LoopOutcome {
            reload_requested: self.ctx.run.reload_requested,
            frames: self.frames,
        }
    }

    /// Gives back the surface and the host, e.g. to run again after a reload.
    pub fn into_parts(self) -> (S, H) {
        (self.surface, self.host)
    }

    fn abort(&mut self) {
        self.ctx.sockets.close_all();
        self.surface.close();
        self.phase = LoopPhase::Stopped;
    }

    fn present(&mut self) -> Result<(), LoopError> {
        for request in self.ctx.take_surface_requests() {
            match request {
                SurfaceRequest::SetTitle(title) => self.surface.set_title(&title),
                SurfaceRequest::SetSize { width, height } => self.surface.set_size(width, height),
            }
        }

        let recorded = self.ctx.take_draw_commands();
        let mut commands = Vec::with_capacity(recorded.len() + 1);
        commands.push(DrawCommand::Clear(self.ctx.render.clear_color));
        commands.extend(recorded);

        self.surface.submit(&commands)?;
        self.surface.display()?;
        Ok(())
    }

    fn flush_output(&mut self) {
        let output = self.ctx.take_output();
        let mut stdout = std::io::stdout().lock();
        let result = stdout
            .write_all(output.as_bytes())
            .and_then(|()| stdout.flush());
        if let Err(e) = result {
            log::warn!("Could not flush output: {e}");
        }
    }

    fn expect_phase(&self, expected: LoopPhase) -> Result<(), LoopError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(LoopError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}
