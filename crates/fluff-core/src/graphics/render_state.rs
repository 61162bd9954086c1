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

use super::BlendMode;
use crate::config::GameConfig;
use crate::math::LinearRgba;

/// Drawing parameters that persist across frames until game code changes them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    /// Color the surface is cleared to at the start of each frame.
    pub clear_color: LinearRgba,
    /// Color used for text.
    pub color: LinearRgba,
    /// Current blend function.
    pub blend_mode: BlendMode,
    /// Text rotation in degrees.
    pub font_rotation: f32,
    /// Text scale factors.
    pub font_scale: (f32, f32),
}

impl RenderState {
    /// Initial render state for a configuration.
    ///
    /// An unknown blend selector falls back to alpha blending.
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            clear_color: LinearRgba::from_array(config.clear_color),
            blend_mode: BlendMode::from_selector(config.blend_mode).unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Applies a blend selector. Unknown selectors leave the mode untouched
    /// and return `false`.
    pub fn set_blend_selector(&mut self, selector: i32) -> bool {
        match BlendMode::from_selector(selector) {
            Some(mode) => {
                self.blend_mode = mode;
                true
            }
            None => false,
        }
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            clear_color: LinearRgba::BLACK,
            color: LinearRgba::WHITE,
            blend_mode: BlendMode::Alpha,
            font_rotation: 0.0,
            font_scale: (1.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_uses_clear_color_and_blend() {
        let config = GameConfig {
            clear_color: [0.2, 0.4, 0.6, 1.0],
            blend_mode: 1,
            ..GameConfig::default()
        };
        let state = RenderState::from_config(&config);
        assert_eq!(state.clear_color, LinearRgba::new(0.2, 0.4, 0.6, 1.0));
        assert_eq!(state.blend_mode, BlendMode::Additive);
        assert_eq!(state.color, LinearRgba::WHITE);
    }

    #[test]
    fn unknown_selector_is_a_no_op() {
        let mut state = RenderState::default();
        assert!(state.set_blend_selector(1));
        assert!(!state.set_blend_selector(7));
        assert_eq!(state.blend_mode, BlendMode::Additive);
    }
}
