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

//! Startup configuration.
//!
//! A [`GameConfig`] is read once before the loop starts and never re-validated
//! afterwards. Every field has a default, so a config file only needs to list
//! what it changes:
//!
//! ```toml
//! title = "Pong"
//! width = 800
//! height = 600
//! vsync = true
//! blend_mode = 1
//! reload_key = "F5"
//! ```
//!
//! TOML has no null, so `exit_key` and `reload_key` take the name `"none"`
//! to leave the binding empty.

use crate::input::Key;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors raised while loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The TOML could not be parsed into a [`GameConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but is unusable.
    #[error("invalid config value for '{field}': {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// What the loop does when a callback raises an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicy {
    /// The error escapes the loop immediately; the surface is still released.
    #[default]
    Propagate,
    /// The error is logged and the tick carries on.
    LogAndContinue,
    /// The error is logged and the loop stops through the normal shutdown.
    LogAndStop,
}

/// Whether down-state is cleared when the surface loses focus or the pointer
/// leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetPolicy {
    /// Clear every mouse button on focus loss and pointer exit.
    pub reset_buttons: bool,
    /// Clear every key on focus loss.
    pub reset_keys: bool,
}

impl Default for ResetPolicy {
    fn default() -> Self {
        Self {
            reset_buttons: true,
            reset_keys: true,
        }
    }
}

/// Keys with a built-in meaning for the loop itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    /// Pressing this key stops the loop.
    pub exit: Option<Key>,
    /// Pressing this key stops the loop and flags a reload.
    pub reload: Option<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            exit: Some(Key::Escape),
            reload: Some(Key::F5),
        }
    }
}

/// An optional key written as its name, or `"none"` when unbound.
mod binding {
    use crate::input::Key;
    use serde::de::value::StrDeserializer;
    use serde::de::IntoDeserializer;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    const UNBOUND: &str = "none";

    pub fn serialize<S>(key: &Option<Key>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match key {
            Some(key) => key.serialize(serializer),
            None => serializer.serialize_str(UNBOUND),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Key>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        if name.eq_ignore_ascii_case(UNBOUND) {
            return Ok(None);
        }
        let name: StrDeserializer<'_, D::Error> = name.as_str().into_deserializer();
        Key::deserialize(name).map(Some)
    }
}

/// Everything the runtime needs to know before opening the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window title.
    pub title: String,
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Bits per pixel requested from the video mode.
    pub color_depth: u32,
    /// Open the surface fullscreen.
    pub fullscreen: bool,
    /// Synchronise presentation with the display refresh.
    pub vsync: bool,
    /// Antialiasing level hint (0 disables).
    pub antialiasing: u32,
    /// Frame-rate cap; 0 means uncapped.
    pub fps: u32,
    /// Clear color as linear RGBA.
    pub clear_color: [f32; 4],
    /// Blend mode selector: 0 alpha, 1 additive, anything else leaves the
    /// blend function unchanged.
    pub blend_mode: i32,
    /// See [`ResetPolicy::reset_buttons`].
    pub reset_buttons_on_focus_loss: bool,
    /// See [`ResetPolicy::reset_keys`].
    pub reset_keys_on_focus_loss: bool,
    /// See [`KeyBindings::exit`].
    #[serde(with = "binding")]
    pub exit_key: Option<Key>,
    /// See [`KeyBindings::reload`].
    #[serde(with = "binding")]
    pub reload_key: Option<Key>,
    /// What to do when a callback fails.
    pub fault_policy: FaultPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Fluff".to_string(),
            width: 640,
            height: 480,
            color_depth: 32,
            fullscreen: false,
            vsync: false,
            antialiasing: 0,
            fps: 60,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            blend_mode: 0,
            reset_buttons_on_focus_loss: true,
            reset_keys_on_focus_loss: true,
            exit_key: Some(Key::Escape),
            reload_key: Some(Key::F5),
            fault_policy: FaultPolicy::Propagate,
        }
    }
}

impl GameConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the TOML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::info!("Loaded config from '{}'.", path.display());
        Ok(config)
    }

    /// Checks the values that would make surface creation meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::Invalid {
                field: "width",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.height == 0 {
            return Err(ConfigError::Invalid {
                field: "height",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.clear_color.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "clear_color",
                reason: "components must be finite".to_string(),
            });
        }
        Ok(())
    }

    /// The focus-loss reset policy.
    pub fn reset_policy(&self) -> ResetPolicy {
        ResetPolicy {
            reset_buttons: self.reset_buttons_on_focus_loss,
            reset_keys: self.reset_keys_on_focus_loss,
        }
    }

    /// The loop's built-in key bindings.
    pub fn key_bindings(&self) -> KeyBindings {
        KeyBindings {
            exit: self.exit_key,
            reload: self.reload_key,
        }
    }
}
