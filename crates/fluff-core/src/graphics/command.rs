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

use super::{BlendMode, FontHandle};
use crate::math::LinearRgba;

/// A single line of text to rasterize.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    /// The string to draw.
    pub text: String,
    /// Backend font data.
    pub font: FontHandle,
    /// Glyph height in pixels.
    pub size: u32,
    /// Left edge, in surface pixels.
    pub x: i32,
    /// Top edge, in surface pixels.
    pub y: i32,
    /// Fill color.
    pub color: LinearRgba,
    /// Rotation in degrees around the text origin.
    pub rotation: f32,
    /// Horizontal and vertical scale factors.
    pub scale: (f32, f32),
    /// How the glyphs combine with the surface.
    pub blend: BlendMode,
}

/// One entry of the per-frame draw list, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface with a color.
    Clear(LinearRgba),
    /// Draw a line of text.
    Text(TextCommand),
}

/// A change to the surface itself, asked for by game code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceRequest {
    /// Set the title bar text.
    SetTitle(String),
    /// Resize the drawable area.
    SetSize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
}
