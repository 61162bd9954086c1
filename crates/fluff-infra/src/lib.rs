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

//! # Fluff Infra
//!
//! Concrete collaborators behind the `fluff-core` contracts: a `winit`
//! window presented through `softbuffer`, a `tiny-skia` rasterizer with
//! `ab_glyph` text, a frame pacer, and a non-blocking TCP socket.

pub mod graphics;
pub mod net;
pub mod platform;

pub use graphics::{AbGlyphFontLoader, Rasterizer};
pub use net::{SocketEvent, TcpSocket};
pub use platform::{FramePacer, WinitSurface};
