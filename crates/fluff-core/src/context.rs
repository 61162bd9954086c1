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

//! The state a running game sees.
//!
//! A [`GameContext`] is owned by the frame loop and lent mutably to every
//! callback, so scripts read input and record drawing through it rather than
//! through globals.

use crate::config::GameConfig;
use crate::graphics::{
    DrawCommand, FontError, FontLoader, FontRegistry, NullFontLoader, RenderState,
    SurfaceRequest, TextCommand,
};
use crate::input::{InputState, PointerState};
use crate::math::LinearRgba;
use crate::net::{SharedSocket, SocketMultiplexer};
use crate::state::RunState;

/// All per-run mutable state.
#[derive(Debug)]
pub struct GameContext {
    /// Run flags.
    pub run: RunState,
    /// Keyboard and mouse-button state.
    pub input: InputState,
    /// Pointer position and wheel delta.
    pub pointer: PointerState,
    /// Persistent drawing parameters.
    pub render: RenderState,
    /// Loaded fonts.
    pub fonts: FontRegistry,
    /// Sockets serviced every tick.
    pub sockets: SocketMultiplexer,
    commands: Vec<DrawCommand>,
    requests: Vec<SurfaceRequest>,
    output: String,
}

impl GameContext {
    /// Creates a context without text support.
    pub fn new(config: &GameConfig) -> Self {
        Self::with_font_loader(config, Box::new(NullFontLoader))
    }

    /// Creates a context whose fonts are loaded by `loader`.
    pub fn with_font_loader(config: &GameConfig, loader: Box<dyn FontLoader>) -> Self {
        Self {
            run: RunState::default(),
            input: InputState::new(),
            pointer: PointerState::default(),
            render: RenderState::from_config(config),
            fonts: FontRegistry::new(loader),
            sockets: SocketMultiplexer::new(),
            commands: Vec::new(),
            requests: Vec::new(),
            output: String::new(),
        }
    }

    /// Asks the loop to stop after the current tick.
    pub fn request_exit(&mut self) {
        log::debug!("Exit requested by game code.");
        self.run.request_exit();
    }

    /// Loads `name` at `size` pixels (or reselects it) and makes it current.
    ///
    /// On failure nothing changes.
    pub fn load_font(&mut self, name: &str, size: u32) -> Result<(), FontError> {
        self.fonts.load(name, size).inspect_err(|e| {
            log::warn!("Could not load font '{name}': {e}");
        })
    }

    /// Drops every loaded font.
    pub fn reset_fonts(&mut self) {
        self.fonts.reset();
    }

    /// Records a line of text in the loaded font `font`, using the current
    /// color, rotation, scale and blend mode.
    ///
    /// Returns `false` and records nothing when `font` is not loaded.
    pub fn draw_text(&mut self, text: &str, font: &str, x: i32, y: i32, size: u32) -> bool {
        let Some(handle) = self.fonts.get(font) else {
            return false;
        };
        let command = TextCommand {
            text: text.to_string(),
            font: handle.clone(),
            size,
            x,
            y,
            color: self.render.color,
            rotation: self.render.font_rotation,
            scale: self.render.font_scale,
            blend: self.render.blend_mode,
        };
        self.commands.push(DrawCommand::Text(command));
        true
    }

    /// Sets the text color.
    pub fn set_color(&mut self, color: LinearRgba) {
        self.render.color = color;
    }

    /// Sets the color frames are cleared to.
    pub fn set_clear_color(&mut self, color: LinearRgba) {
        self.render.clear_color = color;
    }

    /// Applies a blend selector (`0` alpha, `1` additive). Other values are
    /// ignored and return `false`.
    pub fn set_blend_mode(&mut self, selector: i32) -> bool {
        self.render.set_blend_selector(selector)
    }

    /// Sets text rotation in degrees.
    pub fn set_font_rotation(&mut self, degrees: f32) {
        self.render.font_rotation = degrees;
    }

    /// Sets text scale factors.
    pub fn set_font_scale(&mut self, x: f32, y: f32) {
        self.render.font_scale = (x, y);
    }

    /// Changes the surface title at the next present.
    pub fn set_caption(&mut self, title: &str) {
        self.requests.push(SurfaceRequest::SetTitle(title.to_string()));
    }

    /// Resizes the surface at the next present.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.requests.push(SurfaceRequest::SetSize { width, height });
    }

    /// Registers a socket with the per-tick multiplexer.
    pub fn register_socket(&mut self, socket: SharedSocket) {
        self.sockets.register(socket);
    }

    /// Buffers text for the end-of-tick flush.
    pub fn print(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Takes the draw commands recorded since the last call.
    pub fn take_draw_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Takes the surface requests recorded since the last call.
    pub fn take_surface_requests(&mut self) -> Vec<SurfaceRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Takes the buffered text output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}
