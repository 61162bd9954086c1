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

//! Software rasterization of draw commands with `tiny-skia`.

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use fluff_core::graphics::{BlendMode, DrawCommand, TextCommand};
use fluff_core::math::LinearRgba;
use tiny_skia::{BlendMode as SkiaBlendMode, Color, Pixmap, PixmapPaint, Transform};

/// Errors raised while rasterizing a frame.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// tiny-skia refused the back buffer size.
    #[error("Failed to create a {width}x{height} pixmap")]
    PixmapCreationFailed {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}

/// Owns the back buffer and renders frames of [`DrawCommand`]s into it.
#[derive(Debug, Default)]
pub struct Rasterizer {
    pixmap: Option<Pixmap>,
}

impl Rasterizer {
    /// Creates a rasterizer with no back buffer yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `commands` in order into a `width` x `height` back buffer.
    ///
    /// The buffer is reallocated when the size changes and otherwise keeps
    /// its previous contents, so a frame without a clear draws on top of the
    /// last one.
    pub fn render(
        &mut self,
        width: u32,
        height: u32,
        commands: &[DrawCommand],
    ) -> Result<(), RasterError> {
        let target = self.target(width, height)?;
        for command in commands {
            match command {
                DrawCommand::Clear(color) => target.fill(to_skia_color(*color)),
                DrawCommand::Text(text) => draw_text(target, text),
            }
        }
        Ok(())
    }

    /// The back buffer, once something was rendered.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Writes the back buffer as `0RGB` words, the layout `softbuffer`
    /// presents. Returns the number of pixels written.
    pub fn copy_to_xrgb(&self, out: &mut [u32]) -> usize {
        let Some(pixmap) = &self.pixmap else {
            return 0;
        };
        let mut written = 0;
        for (dst, px) in out.iter_mut().zip(pixmap.pixels()) {
            *dst = (u32::from(px.red()) << 16) | (u32::from(px.green()) << 8) | u32::from(px.blue());
            written += 1;
        }
        written
    }

    fn target(&mut self, width: u32, height: u32) -> Result<&mut Pixmap, RasterError> {
        let stale = self
            .pixmap
            .as_ref()
            .is_none_or(|p| p.width() != width || p.height() != height);
        if stale {
            let pixmap = Pixmap::new(width, height)
                .ok_or(RasterError::PixmapCreationFailed { width, height })?;
            log::debug!("Allocated {width}x{height} back buffer.");
            self.pixmap = Some(pixmap);
        }
        self.pixmap
            .as_mut()
            .ok_or(RasterError::PixmapCreationFailed { width, height })
    }
}

fn to_skia_color(color: LinearRgba) -> Color {
    let [r, g, b, a] = color.to_rgba8();
    Color::from_rgba8(r, g, b, a)
}

fn to_skia_blend(mode: BlendMode) -> SkiaBlendMode {
    match mode {
        BlendMode::Alpha => SkiaBlendMode::SourceOver,
        BlendMode::Additive => SkiaBlendMode::Plus,
    }
}

fn draw_text(target: &mut Pixmap, text: &TextCommand) {
    let Some(font) = text.font.downcast_ref::<FontArc>() else {
        log::warn!("Skipping text '{}': font was not loaded by ab_glyph.", text.text);
        return;
    };
    let Some(line) = rasterize_line(font, &text.text, text.size, text.color) else {
        return;
    };

    let transform = Transform::from_translate(text.x as f32, text.y as f32)
        .pre_concat(Transform::from_rotate(text.rotation))
        .pre_concat(Transform::from_scale(text.scale.0, text.scale.1));
    let paint = PixmapPaint {
        blend_mode: to_skia_blend(text.blend),
        ..PixmapPaint::default()
    };
    target.draw_pixmap(0, 0, line.as_ref(), &paint, transform, None);
}

/// Lays out `text` on a single baseline and rasterizes it into a tight,
/// premultiplied pixmap. Returns `None` for empty or invisible text.
fn rasterize_line(font: &FontArc, text: &str, size: u32, color: LinearRgba) -> Option<Pixmap> {
    let scaled = font.as_scaled(PxScale::from(size.max(1) as f32));

    let mut glyphs = Vec::with_capacity(text.len());
    let mut caret = 0.0f32;
    let mut previous: Option<GlyphId> = None;
    for c in text.chars() {
        let mut glyph = scaled.scaled_glyph(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, glyph.id);
        }
        glyph.position = point(caret, scaled.ascent());
        caret += scaled.h_advance(glyph.id);
        previous = Some(glyph.id);
        glyphs.push(glyph);
    }

    let width = caret.ceil() as u32;
    let height = (scaled.ascent() - scaled.descent()).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height)?;

    let [r, g, b, a] = color.to_rgba8();
    let stride = width as usize;
    let data = pixmap.data_mut();
    for glyph in glyphs {
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i64 + i64::from(gx);
            let y = bounds.min.y as i64 + i64::from(gy);
            if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
                return;
            }
            let alpha = coverage.clamp(0.0, 1.0) * f32::from(a) / 255.0;
            let new_a = (alpha * 255.0).round() as u8;
            let idx = (y as usize * stride + x as usize) * 4;
            let px = &mut data[idx..idx + 4];
            // Overlapping glyph edges keep the stronger coverage.
            if new_a <= px[3] {
                return;
            }
            px[0] = (f32::from(r) * alpha).round() as u8;
            px[1] = (f32::from(g) * alpha).round() as u8;
            px[2] = (f32::from(b) * alpha).round() as u8;
            px[3] = new_a;
        });
    }
    Some(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluff_core::graphics::FontHandle;

    #[test]
    fn clear_fills_the_buffer() {
        let mut raster = Rasterizer::new();
        raster
            .render(4, 3, &[DrawCommand::Clear(LinearRgba::rgb(1.0, 0.0, 0.0))])
            .unwrap();

        let pixmap = raster.pixmap().unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (4, 3));
        let px = pixmap.pixel(3, 2).unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (255, 0, 0));
    }

    #[test]
    fn xrgb_copy() {
        let mut raster = Rasterizer::new();
        raster
            .render(2, 2, &[DrawCommand::Clear(LinearRgba::rgb(0.0, 1.0, 0.0))])
            .unwrap();

        let mut out = [0u32; 4];
        assert_eq!(raster.copy_to_xrgb(&mut out), 4);
        assert_eq!(out, [0x00FF00; 4]);
    }

    #[test]
    fn nothing_to_copy_before_first_render() {
        let mut out = [7u32; 2];
        assert_eq!(Rasterizer::new().copy_to_xrgb(&mut out), 0);
        assert_eq!(out, [7, 7]);
    }

    #[test]
    fn foreign_font_data_is_skipped() {
        let mut raster = Rasterizer::new();
        let text = TextCommand {
            text: "hi".into(),
            font: FontHandle::new(42u8),
            size: 12,
            x: 0,
            y: 0,
            color: LinearRgba::WHITE,
            rotation: 0.0,
            scale: (1.0, 1.0),
            blend: BlendMode::Alpha,
        };
        raster
            .render(
                2,
                2,
                &[DrawCommand::Clear(LinearRgba::BLACK), DrawCommand::Text(text)],
            )
            .unwrap();
        let px = raster.pixmap().unwrap().pixel(0, 0).unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (0, 0, 0));
    }

    #[test]
    fn resize_reallocates() {
        let mut raster = Rasterizer::new();
        raster.render(2, 2, &[]).unwrap();
        raster.render(5, 1, &[]).unwrap();
        let pixmap = raster.pixmap().unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (5, 1));
    }

    #[test]
    fn zero_sized_buffer_is_an_error() {
        let err = Rasterizer::new().render(0, 10, &[]).unwrap_err();
        assert_eq!(err.to_string(), "Failed to create a 0x10 pixmap");
        assert!(matches!(
            err,
            RasterError::PixmapCreationFailed {
                width: 0,
                height: 10
            }
        ));
    }
}
