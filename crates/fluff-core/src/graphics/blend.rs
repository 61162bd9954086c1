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

/// How drawn pixels combine with what is already on the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// `src * src_alpha + dst * (1 - src_alpha)`.
    #[default]
    Alpha,
    /// `src * src_alpha + dst`.
    Additive,
}

impl BlendMode {
    /// Maps a configuration selector to a blend mode.
    ///
    /// `0` is alpha, `1` is additive; every other value yields `None`, which
    /// callers treat as "leave the current blend function alone".
    pub const fn from_selector(selector: i32) -> Option<Self> {
        match selector {
            0 => Some(BlendMode::Alpha),
            1 => Some(BlendMode::Additive),
            _ => None,
        }
    }
}
