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

//! Font loading with `ab_glyph`.

use ab_glyph::FontArc;
use fluff_core::graphics::{FontError, FontHandle, FontLoader};

/// Loads TrueType/OpenType files into [`FontArc`]s.
///
/// Glyphs are scaled at draw time, so the requested size is not baked into
/// the loaded data.
#[derive(Debug, Default, Clone, Copy)]
pub struct AbGlyphFontLoader;

impl FontLoader for AbGlyphFontLoader {
    fn load(&self, path: &str, _size: u32) -> Result<FontHandle, FontError> {
        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_string(),
            source,
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| FontError::Invalid {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(FontHandle::new(font))
    }
}
