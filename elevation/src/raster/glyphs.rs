//! Built-in bitmap glyphs for label text.
//!
//! Labels only ever contain numbers and unit suffixes, so a 5x7 cell
//! font covers them without depending on system fonts.

/// Glyph height in font pixels.
pub(crate) const GLYPH_HEIGHT: u32 = 7;

/// Empty font rows above and below the glyphs of a line.
pub(crate) const LINE_PADDING: u32 = 1;

/// Advance of a space or of a character without a glyph, in font
/// pixels.
const SPACE_WIDTH: u32 = 2;

#[derive(Clone, Copy)]
pub(crate) struct Glyph {
    pub width: u8,
    pub rows: [u8; GLYPH_HEIGHT as usize],
}

impl Glyph {
    /// Returns `true` if the font pixel at `(col, row)` is set.
    pub fn is_set(&self, col: u8, row: usize) -> bool {
        self.rows[row] & (1 << (self.width - 1 - col)) != 0
    }
}

/// Integer glyph scale for a nominal font size.
pub(crate) fn scale_for(font_size: f64) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scale = (font_size / f64::from(GLYPH_HEIGHT)).round() as u32;
    scale.max(1)
}

/// Horizontal advance of `ch`, including one column of spacing.
pub(crate) fn advance(ch: char) -> u32 {
    glyph(ch).map_or(SPACE_WIDTH, |glyph| u32::from(glyph.width)) + 1
}

/// Returns `(width, height)` of the line box holding `text`.
pub(crate) fn text_extent(text: &str, scale: u32) -> (u32, u32) {
    let columns = text.chars().map(advance).sum::<u32>().saturating_sub(1);
    let rows = GLYPH_HEIGHT + 2 * LINE_PADDING;
    (columns * scale, rows * scale)
}

pub(crate) fn glyph(ch: char) -> Option<Glyph> {
    Some(match ch {
        '0' => Glyph {
            width: 5,
            rows: [
                0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110,
            ],
        },
        '1' => Glyph {
            width: 5,
            rows: [
                0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110,
            ],
        },
        '2' => Glyph {
            width: 5,
            rows: [
                0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111,
            ],
        },
        '3' => Glyph {
            width: 5,
            rows: [
                0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110,
            ],
        },
        '4' => Glyph {
            width: 5,
            rows: [
                0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010,
            ],
        },
        '5' => Glyph {
            width: 5,
            rows: [
                0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110,
            ],
        },
        '6' => Glyph {
            width: 5,
            rows: [
                0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110,
            ],
        },
        '7' => Glyph {
            width: 5,
            rows: [
                0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000,
            ],
        },
        '8' => Glyph {
            width: 5,
            rows: [
                0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110,
            ],
        },
        '9' => Glyph {
            width: 5,
            rows: [
                0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100,
            ],
        },
        '-' => Glyph {
            width: 3,
            rows: [0b000, 0b000, 0b000, 0b111, 0b000, 0b000, 0b000],
        },
        '.' => Glyph {
            width: 1,
            rows: [0b0, 0b0, 0b0, 0b0, 0b0, 0b0, 0b1],
        },
        'k' => Glyph {
            width: 4,
            rows: [0b1000, 0b1000, 0b1001, 0b1010, 0b1100, 0b1010, 0b1001],
        },
        'm' => Glyph {
            width: 5,
            rows: [
                0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10101, 0b10101,
            ],
        },
        _ => return None,
    })
}
