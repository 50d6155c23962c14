use super::{glyphs, PixelBuffer};
use plotters_backend::{
    text_anchor::{HPos, VPos},
    BackendColor, BackendCoord, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};
use std::convert::Infallible;

/// A plotters backend compositing into a premultiplied RGBA
/// [PixelBuffer].
///
/// Shapes go through the default plotters rasterizer, which hands
/// every covered pixel to [DrawingBackend::draw_pixel] with its
/// coverage folded into the alpha. Text is drawn with the built-in
/// bitmap glyphs, so no font backend is involved.
pub(crate) struct RgbaBackend<'a> {
    buffer: &'a mut PixelBuffer,
}

impl<'a> RgbaBackend<'a> {
    pub fn new(buffer: &'a mut PixelBuffer) -> Self {
        Self { buffer }
    }
}

impl DrawingBackend for RgbaBackend<'_> {
    type ErrorType = Infallible;

    fn get_size(&self) -> (u32, u32) {
        (self.buffer.width(), self.buffer.height())
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Infallible>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Infallible>> {
        Ok(())
    }

    fn draw_pixel(
        &mut self,
        (x, y): BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        self.buffer.blend(x, y, &color);
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        let color = style.color();
        if color.alpha == 0.0 || text.is_empty() {
            return Ok(());
        }

        let scale = glyphs::scale_for(style.size());
        let (width, height) = glyphs::text_extent(text, scale);
        #[allow(clippy::cast_possible_wrap)]
        let (width, height, step) = (width as i32, height as i32, scale as i32);
        let anchor = style.anchor();
        let dx = match anchor.h_pos {
            HPos::Left => 0,
            HPos::Center => -width / 2,
            HPos::Right => -width,
        };
        let dy = match anchor.v_pos {
            VPos::Top => 0,
            VPos::Center => -height / 2,
            VPos::Bottom => -height,
        };

        #[allow(clippy::cast_possible_wrap)]
        let top = pos.1 + dy + (glyphs::LINE_PADDING * scale) as i32;
        let mut cursor_x = pos.0 + dx;
        for ch in text.chars() {
            if let Some(glyph) = glyphs::glyph(ch) {
                for row in 0..glyph.rows.len() {
                    for col in 0..glyph.width {
                        if !glyph.is_set(col, row) {
                            continue;
                        }
                        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
                        let (x, y) = (
                            cursor_x + i32::from(col) * step,
                            top + row as i32 * step,
                        );
                        for by in y..y + step {
                            for bx in x..x + step {
                                self.buffer.blend(bx, by, &color);
                            }
                        }
                    }
                }
            }
            #[allow(clippy::cast_possible_wrap)]
            let advance = glyphs::advance(ch) as i32;
            cursor_x += advance * step;
        }
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Infallible>> {
        Ok(glyphs::text_extent(text, glyphs::scale_for(style.size())))
    }
}
