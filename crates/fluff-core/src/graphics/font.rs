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

//! The font table.
//!
//! Fonts are loaded by a [`FontLoader`] (the rasterization backend) and kept
//! by name for the lifetime of the table. The loaded data is type-erased in a
//! [`FontHandle`] so this crate never depends on a font library.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Errors raised while loading a font.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// The font file could not be read.
    #[error("failed to read font '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file was read but is not a usable font.
    #[error("'{path}' is not a valid font: {reason}")]
    Invalid {
        /// Path of the offending file.
        path: String,
        /// Backend-specific reason.
        reason: String,
    },
    /// No font backend is installed.
    #[error("no font loader is available")]
    Unsupported,
}

/// Backend-owned font data, type-erased.
///
/// Backends wrap their own font type with [`FontHandle::new`] and recover it
/// with [`FontHandle::downcast_ref`] at draw time.
#[derive(Clone)]
pub struct FontHandle {
    inner: Arc<dyn Any + Send + Sync>,
}

impl FontHandle {
    /// Wraps backend font data.
    pub fn new<T: Any + Send + Sync>(font: T) -> Self {
        Self {
            inner: Arc::new(font),
        }
    }

    /// Returns the backend font data if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl PartialEq for FontHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle").finish_non_exhaustive()
    }
}

/// Loads font files into backend font data.
pub trait FontLoader {
    /// Loads the font at `path`, prepared for glyphs of `size` pixels.
    fn load(&self, path: &str, size: u32) -> Result<FontHandle, FontError>;
}

/// A loader for runtimes without text support. Every load fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFontLoader;

impl FontLoader for NullFontLoader {
    fn load(&self, _path: &str, _size: u32) -> Result<FontHandle, FontError> {
        Err(FontError::Unsupported)
    }
}

struct FontEntry {
    name: String,
    size: u32,
    handle: FontHandle,
}

/// Loaded fonts, keyed by the name (path) they were loaded from, plus the
/// currently selected one.
pub struct FontRegistry {
    loader: Box<dyn FontLoader>,
    entries: Vec<FontEntry>,
    current: Option<String>,
}

impl FontRegistry {
    /// Creates an empty table backed by `loader`.
    pub fn new(loader: Box<dyn FontLoader>) -> Self {
        Self {
            loader,
            entries: Vec::new(),
            current: None,
        }
    }

    /// Makes `name` the current font, loading it first if it is unknown.
    ///
    /// A name that is already loaded is selected as-is; `size` only matters
    /// on the first load. On failure the table and the current font are left
    /// exactly as they were.
    pub fn load(&mut self, name: &str, size: u32) -> Result<(), FontError> {
        if self.contains(name) {
            self.current = Some(name.to_string());
            return Ok(());
        }

        let handle = self.loader.load(name, size)?;
        log::debug!("Loaded font '{name}' at {size}px.");
        self.entries.push(FontEntry {
            name: name.to_string(),
            size,
            handle,
        });
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Drops every loaded font and clears the current selection.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.current = None;
    }

    /// Name of the current font, if any.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Backend data for `name`, if it is loaded.
    pub fn get(&self, name: &str) -> Option<&FontHandle> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.handle)
    }

    /// Size `name` was first loaded at.
    pub fn loaded_size(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.size)
    }

    /// Returns `true` if `name` is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    /// Number of loaded fonts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no font is loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new(Box::new(NullFontLoader))
    }
}

impl fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontRegistry")
            .field(
                "fonts",
                &self.entries.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            )
            .field("current", &self.current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Accepts paths ending in `.ttf` and counts how often it was asked.
    struct CountingLoader {
        calls: Rc<Cell<usize>>,
    }

    impl FontLoader for CountingLoader {
        fn load(&self, path: &str, size: u32) -> Result<FontHandle, FontError> {
            self.calls.set(self.calls.get() + 1);
            if path.ends_with(".ttf") {
                Ok(FontHandle::new((path.to_string(), size)))
            } else {
                Err(FontError::Invalid {
                    path: path.to_string(),
                    reason: "not a ttf".to_string(),
                })
            }
        }
    }

    fn registry() -> (FontRegistry, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let loader = CountingLoader {
            calls: Rc::clone(&calls),
        };
        (FontRegistry::new(Box::new(loader)), calls)
    }

    #[test]
    fn loading_selects_the_font() {
        let (mut fonts, _) = registry();
        fonts.load("mono.ttf", 12).unwrap();
        assert_eq!(fonts.current(), Some("mono.ttf"));
        assert_eq!(fonts.loaded_size("mono.ttf"), Some(12));

        let data = fonts.get("mono.ttf").unwrap().downcast_ref::<(String, u32)>();
        assert_eq!(data, Some(&("mono.ttf".to_string(), 12)));
    }

    #[test]
    fn known_name_is_reselected_without_reloading() {
        let (mut fonts, calls) = registry();
        fonts.load("a.ttf", 12).unwrap();
        fonts.load("b.ttf", 14).unwrap();
        fonts.load("a.ttf", 30).unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(fonts.current(), Some("a.ttf"));
        assert_eq!(fonts.loaded_size("a.ttf"), Some(12), "size of first load wins");
    }

    #[test]
    fn failed_load_leaves_state_unchanged() {
        let (mut fonts, _) = registry();
        fonts.load("a.ttf", 12).unwrap();

        let err = fonts.load("broken.otf", 12).unwrap_err();
        assert!(matches!(err, FontError::Invalid { .. }));
        assert_eq!(fonts.len(), 1);
        assert_eq!(fonts.current(), Some("a.ttf"));
    }

    #[test]
    fn reset_clears_everything() {
        let (mut fonts, _) = registry();
        fonts.load("a.ttf", 12).unwrap();
        fonts.reset();
        assert!(fonts.is_empty());
        assert_eq!(fonts.current(), None);
        assert!(fonts.get("a.ttf").is_none());
    }

    #[test]
    fn default_registry_cannot_load() {
        let mut fonts = FontRegistry::default();
        assert!(matches!(fonts.load("a.ttf", 12), Err(FontError::Unsupported)));
    }
}
