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

//! The contract of the windowing and graphics collaborator.

use crate::config::GameConfig;
use crate::event::RawEvent;
use crate::graphics::DrawCommand;
use bitflags::bitflags;

bitflags! {
    /// Decorations and behavior requested for a surface.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StyleFlags: u32 {
        /// Has a title bar.
        const TITLEBAR = 1 << 0;
        /// Can be resized by the user.
        const RESIZE = 1 << 1;
        /// Has a close button.
        const CLOSE = 1 << 2;
        /// Covers the whole screen.
        const FULLSCREEN = 1 << 3;
    }
}

impl StyleFlags {
    /// A regular decorated window.
    pub const WINDOWED: Self = Self::TITLEBAR.union(Self::CLOSE);
}

impl Default for StyleFlags {
    fn default() -> Self {
        Self::WINDOWED
    }
}

/// Everything needed to create a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSettings {
    /// Drawable width in pixels.
    pub width: u32,
    /// Drawable height in pixels.
    pub height: u32,
    /// Bits per pixel.
    pub color_depth: u32,
    /// Title bar text.
    pub title: String,
    /// Window style.
    pub style: StyleFlags,
    /// Antialiasing level hint; backends may ignore it.
    pub antialiasing: u32,
}

impl SurfaceSettings {
    /// Derives the surface settings from a configuration.
    pub fn from_config(config: &GameConfig) -> Self {
        let style = if config.fullscreen {
            StyleFlags::FULLSCREEN
        } else {
            StyleFlags::WINDOWED
        };
        Self {
            width: config.width,
            height: config.height,
            color_depth: config.color_depth,
            title: config.title.clone(),
            style,
            antialiasing: config.antialiasing,
        }
    }
}

/// Errors raised by a surface backend.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// The surface could not be created.
    #[error("failed to create surface: {0}")]
    Creation(String),
    /// An operation needed an open surface.
    #[error("the surface is not open")]
    NotOpen,
    /// Presenting the frame failed.
    #[error("failed to present frame: {0}")]
    Present(String),
}

/// A window plus its graphics context, driven from the tick thread.
pub trait Surface {
    /// Opens the surface. Any previous surface must have been closed.
    fn create(&mut self, settings: &SurfaceSettings) -> Result<(), SurfaceError>;

    /// Returns `true` between a successful `create` and `close`.
    fn is_open(&self) -> bool;

    /// Releases the surface. Closing a closed surface is a no-op.
    fn close(&mut self);

    /// Enables or disables repeated key presses while a key is held.
    fn set_key_repeat(&mut self, enabled: bool);

    /// Enables or disables vertical sync.
    fn set_vertical_sync(&mut self, enabled: bool);

    /// Caps the frame rate; `0` removes the cap.
    fn set_frame_rate_limit(&mut self, fps: u32);

    /// Pops the next pending event without blocking.
    fn poll_event(&mut self) -> Option<RawEvent>;

    /// Drawable width in pixels.
    fn width(&self) -> u32;

    /// Drawable height in pixels.
    fn height(&self) -> u32;

    /// Requests a new drawable size.
    fn set_size(&mut self, width: u32, height: u32);

    /// Sets the title bar text.
    fn set_title(&mut self, title: &str);

    /// Rasterizes a frame's draw commands into the back buffer.
    fn submit(&mut self, commands: &[DrawCommand]) -> Result<(), SurfaceError>;

    /// Presents the back buffer, waiting as the frame pacing requires.
    fn display(&mut self) -> Result<(), SurfaceError>;

    /// Duration of the last frame, in seconds.
    fn frame_time(&self) -> f32;
}
