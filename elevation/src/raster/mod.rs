//! Profile rasterization.
//!
//! Geometry is computed in a bottom-left origin space (y up), then
//! flipped into the buffer, whose first row is the top of the image.

mod backend;
mod glyphs;

use self::backend::RgbaBackend;
use crate::{coordinates, AltitudeSample, ProfileStats, RasterError, Size, Theme};
use geo::geometry::Coord;
use log::debug;
use plotters::{
    coord::Shift,
    drawing::{DrawingArea, IntoDrawingArea},
    element::{Polygon, Text},
    style::{Color, FontDesc, FontFamily, FontStyle, TextStyle},
};
use plotters_backend::{BackendColor, DrawingBackend};
use std::fmt::Display;

/// An owned RGBA image with 8 bits per channel and premultiplied
/// alpha, stored top row first.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub const CHANNELS: usize = 4;

    /// Returns a fully transparent buffer of `size`.
    pub fn new(size: Size) -> Result<Self, RasterError> {
        let Size { width, height } = size;
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(Self::CHANNELS))
            .filter(|&len| len > 0)
            .ok_or(RasterError::Allocation { width, height })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Raw premultiplied RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Returns the premultiplied RGBA value at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.data[idx..idx + Self::CHANNELS]);
        Some(rgba)
    }

    /// Returns a copy with straight (non-premultiplied) alpha, as most
    /// image encoders expect.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut straight = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(Self::CHANNELS) {
            let alpha = px[3];
            if alpha == 0 {
                straight.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            for &channel in &px[..3] {
                let value = (u32::from(channel) * 255 + u32::from(alpha) / 2) / u32::from(alpha);
                #[allow(clippy::cast_possible_truncation)]
                straight.push(value.min(255) as u8);
            }
            straight.push(alpha);
        }
        straight
    }

    /// Composites `color` over the pixel at `(x, y)`; out of bounds
    /// coordinates are ignored.
    pub(crate) fn blend(&mut self, x: i32, y: i32, color: &BackendColor) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x >= self.width || y >= self.height {
            return;
        }
        let alpha = color.alpha.clamp(0.0, 1.0);
        if alpha == 0.0 {
            return;
        }
        let (r, g, b) = color.rgb;
        let src = [
            f64::from(r) * alpha,
            f64::from(g) * alpha,
            f64::from(b) * alpha,
            255.0 * alpha,
        ];
        let idx = self.index(x, y);
        for (dst, src) in self.data[idx..idx + Self::CHANNELS].iter_mut().zip(src) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let value = (src + f64::from(*dst) * (1.0 - alpha)).round() as u8;
            *dst = value;
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * Self::CHANNELS
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Horizontal placement of a label relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Badge starts at the origin.
    Left,
    /// Badge is centered on the origin.
    Center,
}

/// A text badge drawn on top of the profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,

    /// Bottom-left corner of the badge (bottom-center when centered),
    /// in pixels from the bottom-left of the image.
    pub origin: (f32, f32),

    pub align: Align,
}

/// Returns the minimum altitude, maximum altitude and distance labels.
pub fn labels(stats: &ProfileStats, size: Size, theme: &Theme) -> [Label; 3] {
    #[allow(clippy::cast_precision_loss)]
    let (width, height) = (size.width as f32, size.height as f32);
    let (max_x, max_top) = theme.max_label_inset;
    [
        Label {
            text: format!("{} m", whole_meters(stats.min_altitude)),
            origin: theme.min_label_origin,
            align: Align::Left,
        },
        Label {
            text: format!("{} m", whole_meters(stats.max_altitude)),
            origin: (max_x, height - max_top),
            align: Align::Left,
        },
        Label {
            text: format!("{:.2} km", stats.total_distance / 1000.0),
            origin: (width / 2.0, theme.distance_label_bottom),
            align: Align::Center,
        },
    ]
}

/// Draws the shaded profile of `samples` and its labels.
///
/// `samples` should hold at least two points; fewer produce a
/// degenerate (empty) profile area.
pub fn rasterize(
    samples: &[AltitudeSample],
    stats: &ProfileStats,
    size: Size,
    theme: &Theme,
) -> Result<PixelBuffer, RasterError> {
    let mut buffer = PixelBuffer::new(size)?;
    {
        let root = RgbaBackend::new(&mut buffer).into_drawing_area();
        #[allow(clippy::cast_precision_loss)]
        let (width, height) = (size.width as f32, size.height as f32);

        let outline: Vec<(i32, i32)> = samples
            .iter()
            .map(|sample| coordinates(sample, stats, size))
            .chain([Coord { x: width, y: 0.0 }, Coord { x: 0.0, y: 0.0 }])
            .map(|coord| to_pixel(coord, height))
            .collect();
        debug!("profile; samples: {}, outline: {}", samples.len(), outline.len());
        root.draw(&Polygon::new(outline, theme.profile_fill.filled()))
            .map_err(draw_error)?;

        let font = FontDesc::new(FontFamily::SansSerif, theme.font_size, FontStyle::Normal)
            .color(&theme.text_color);
        for label in labels(stats, size, theme) {
            draw_badge(&root, &label, &font, theme)?;
        }
        root.present().map_err(draw_error)?;
    }
    Ok(buffer)
}

fn draw_badge<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    label: &Label,
    font: &TextStyle,
    theme: &Theme,
) -> Result<(), RasterError> {
    #[allow(clippy::cast_precision_loss)]
    let image_height = root.dim_in_pixel().1 as f32;
    let text_size = root
        .estimate_text_size(&label.text, font)
        .map_err(draw_error)?;
    let rect = BadgeRect::around(label, text_size, theme.badge_padding);

    root.draw(&Polygon::new(
        rect.outline(theme.badge_corner, image_height),
        theme.badge_fill.filled(),
    ))
    .map_err(draw_error)?;

    // The text box sits inside the padding, its top edge `pad_y`
    // below the badge's top edge.
    #[allow(clippy::cast_precision_loss)]
    let text_top = rect.y + theme.badge_padding.1 as f32 + text_size.1 as f32;
    #[allow(clippy::cast_precision_loss)]
    let text_left = rect.x + theme.badge_padding.0 as f32;
    let origin = to_pixel(
        Coord {
            x: text_left,
            y: text_top,
        },
        image_height,
    );
    root.draw(&Text::new(label.text.clone(), origin, font.clone()))
        .map_err(draw_error)?;
    Ok(())
}

/// Badge rectangle in bottom-left origin coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BadgeRect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl BadgeRect {
    #[allow(clippy::cast_precision_loss)]
    fn around(label: &Label, (text_w, text_h): (u32, u32), (pad_x, pad_y): (i32, i32)) -> Self {
        let width = text_w as f32 + 2.0 * pad_x as f32;
        let height = text_h as f32 + 2.0 * pad_y as f32;
        let (origin_x, y) = label.origin;
        let x = match label.align {
            Align::Left => origin_x,
            Align::Center => origin_x - width / 2.0,
        };
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rounded rectangle outline in pixel coordinates.
    fn outline(&self, (rx, ry): (f32, f32), image_height: f32) -> Vec<(i32, i32)> {
        const SEGMENTS: u16 = 4;
        let rx = rx.clamp(0.0, self.width.max(0.0) / 2.0);
        let ry = ry.clamp(0.0, self.height.max(0.0) / 2.0);
        let (left, right) = (self.x, self.x + self.width);
        let (bottom, top) = (self.y, self.y + self.height);

        // Corner centers with the starting angle of their arc,
        // counter-clockwise from the top-right corner.
        let corners = [
            (right - rx, top - ry, 0.0_f32),
            (left + rx, top - ry, 90.0),
            (left + rx, bottom + ry, 180.0),
            (right - rx, bottom + ry, 270.0),
        ];

        let mut outline = Vec::with_capacity(corners.len() * usize::from(SEGMENTS + 1));
        for (cx, cy, start) in corners {
            for step in 0..=SEGMENTS {
                let angle = (start + 90.0 * f32::from(step) / f32::from(SEGMENTS)).to_radians();
                let coord = Coord {
                    x: cx + rx * angle.cos(),
                    y: cy + ry * angle.sin(),
                };
                let px = to_pixel(coord, image_height);
                if outline.last() != Some(&px) {
                    outline.push(px);
                }
            }
        }
        outline
    }
}

/// Flips a bottom-left origin coordinate into buffer space.
fn to_pixel(Coord { x, y }: Coord<f32>, image_height: f32) -> (i32, i32) {
    #[allow(clippy::cast_possible_truncation)]
    (x.round() as i32, (image_height - y).round() as i32)
}

#[allow(clippy::cast_possible_truncation)]
fn whole_meters(altitude: f32) -> i64 {
    altitude.round() as i64
}

fn draw_error<E: Display>(e: E) -> RasterError {
    RasterError::Draw(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::{glyphs, labels, rasterize, Align, BadgeRect, Label, PixelBuffer};
    use crate::{sample_series, ProfileStats, RasterError, Size, Theme};

    const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];
    const SHADE: [u8; 4] = [0, 0, 0, 128];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn example() -> (Vec<crate::AltitudeSample>, ProfileStats, Size) {
        let series = sample_series(&[(100.0, 0.0), (500.0, 2000.0), (300.0, 5000.0)]);
        let stats = ProfileStats::from_samples(&series);
        (series, stats, Size::new(300, 150))
    }

    fn assert_close(actual: [u8; 4], expected: [u8; 4]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(
                a.abs_diff(*e) <= 1,
                "pixel {actual:?} differs from {expected:?}"
            );
        }
    }

    #[test]
    fn test_labels() {
        let (_, stats, size) = example();
        let [min, max, distance] = labels(&stats, size, &Theme::default());
        assert_eq!(
            min,
            Label {
                text: "100 m".to_owned(),
                origin: (10.0, 10.0),
                align: Align::Left,
            }
        );
        assert_eq!(
            max,
            Label {
                text: "500 m".to_owned(),
                origin: (10.0, 125.0),
                align: Align::Left,
            }
        );
        assert_eq!(
            distance,
            Label {
                text: "5.00 km".to_owned(),
                origin: (150.0, 10.0),
                align: Align::Center,
            }
        );
    }

    #[test]
    fn test_labels_round_altitudes() {
        let stats = ProfileStats {
            total_distance: 12_345.0,
            max_altitude: 1999.6,
            min_altitude: -12.6,
        };
        let [min, max, distance] = labels(&stats, Size::new(200, 100), &Theme::default());
        assert_eq!(min.text, "-13 m");
        assert_eq!(max.text, "2000 m");
        assert_eq!(distance.text, "12.35 km");
    }

    #[test]
    fn test_badge_rect() {
        let theme = Theme::default();
        let left = Label {
            text: "100 m".to_owned(),
            origin: (10.0, 10.0),
            align: Align::Left,
        };
        let rect = BadgeRect::around(&left, (52, 18), theme.badge_padding);
        assert_eq!(
            rect,
            BadgeRect {
                x: 10.0,
                y: 10.0,
                width: 56.0,
                height: 16.0
            }
        );

        let centered = Label {
            align: Align::Center,
            origin: (150.0, 10.0),
            ..left
        };
        let rect = BadgeRect::around(&centered, (66, 18), theme.badge_padding);
        assert_eq!(rect.x, 115.0);
        assert_eq!(rect.width, 70.0);
    }

    #[test]
    fn test_badge_outline_stays_in_rect() {
        let rect = BadgeRect {
            x: 10.0,
            y: 10.0,
            width: 56.0,
            height: 16.0,
        };
        for (x, y) in rect.outline((3.0, 2.0), 150.0) {
            assert!((10..=66).contains(&x), "x {x} outside badge");
            assert!((124..=140).contains(&y), "y {y} outside badge");
        }
    }

    #[test]
    fn test_empty_target_is_allocation_error() {
        let (series, stats, _) = example();
        let result = rasterize(&series, &stats, Size::new(0, 150), &Theme::default());
        assert!(matches!(
            result,
            Err(RasterError::Allocation {
                width: 0,
                height: 150
            })
        ));
    }

    #[test]
    fn test_rasterize_example() {
        let (series, stats, size) = example();
        let image = rasterize(&series, &stats, size, &Theme::default()).unwrap();
        assert_eq!(image.size(), size);
        assert_eq!(image.as_raw().len(), 300 * 150 * PixelBuffer::CHANNELS);

        // Below the profile, away from all badges.
        assert_close(image.pixel(250, 100).unwrap(), SHADE);
        assert_close(image.pixel(290, 140).unwrap(), SHADE);
        // Above the profile.
        assert_eq!(image.pixel(250, 20).unwrap(), TRANSPARENT);
        assert_eq!(image.pixel(0, 0).unwrap(), TRANSPARENT);
    }

    #[test]
    fn test_profile_edges_blend_below_fill_alpha() {
        let (series, stats, size) = example();
        let image = rasterize(&series, &stats, size, &Theme::default()).unwrap();

        // Rows 30..120 hold no badge, only profile fill and its
        // antialiased top edge.
        let mut partial = 0;
        for y in 30..120 {
            for x in 0..300 {
                let [r, g, b, a] = image.pixel(x, y).unwrap();
                assert_eq!([r, g, b], [0, 0, 0], "pixel ({x}, {y})");
                assert!(a <= SHADE[3], "pixel ({x}, {y}) alpha {a} over fill");
                if a > 0 && a < SHADE[3] {
                    partial += 1;
                }
            }
        }
        assert!(partial > 0, "profile edge is not antialiased");
    }

    #[test]
    fn test_rasterize_badges() {
        let (series, stats, size) = example();
        let image = rasterize(&series, &stats, size, &Theme::default()).unwrap();

        // Minimum altitude badge spans columns 10..66 and rows
        // 124..140, on top of the shaded area. Column 50 falls in the
        // space between "100" and "m".
        assert_close(image.pixel(50, 130).unwrap(), [64, 64, 64, 192]);

        // The stem of the leading '1' starts 2 glyph columns into the
        // text, which itself starts 2 pixels into the badge.
        assert_eq!(image.pixel(16, 130).unwrap(), WHITE);

        // Maximum altitude badge floats above the profile, over
        // transparent pixels; rows 9..25.
        assert_close(image.pixel(50, 15).unwrap(), [64, 64, 64, 128]);

        // Distance badge is centered on column 150.
        let row = 130;
        let white: Vec<u32> = (0..300)
            .filter(|&x| image.pixel(x, row) == Some(WHITE))
            .collect();
        assert!(white.iter().any(|&x| (117..183).contains(&x)));
        assert!(white.iter().all(|&x| x < 66 || (115..185).contains(&x)));
    }

    #[test]
    fn test_text_fits_inside_badge() {
        let (series, stats, size) = example();
        let image = rasterize(&series, &stats, size, &Theme::default()).unwrap();
        let (_, text_h) = glyphs::text_extent("100 m", 2);
        assert_eq!(text_h, 18);
        // Glyph ink of the minimum label occupies rows 125..139 only.
        for x in 10..66 {
            assert_ne!(image.pixel(x, 123).unwrap(), WHITE);
            assert_ne!(image.pixel(x, 140).unwrap(), WHITE);
        }
    }

    #[test]
    fn test_straight_alpha() {
        let (series, stats, size) = example();
        let image = rasterize(&series, &stats, size, &Theme::default()).unwrap();
        let straight = image.to_straight_rgba();
        let px = |x: usize, y: usize| {
            let idx = (y * 300 + x) * PixelBuffer::CHANNELS;
            [
                straight[idx],
                straight[idx + 1],
                straight[idx + 2],
                straight[idx + 3],
            ]
        };
        assert_close(px(250, 100), SHADE);
        assert_close(px(50, 130), [85, 85, 85, 192]);
        assert_close(px(50, 15), [128, 128, 128, 128]);
        assert_eq!(px(16, 130), WHITE);
    }

    #[test]
    fn test_flat_profile_renders() {
        let series = sample_series(&[(700.0, 0.0), (700.0, 40.0), (700.0, 90.0)]);
        let stats = ProfileStats::from_samples(&series);
        let image = rasterize(&series, &stats, Size::new(120, 60), &Theme::default()).unwrap();
        // Nothing below a profile that hugs the bottom edge.
        assert_eq!(image.pixel(100, 30).unwrap(), TRANSPARENT);
    }
}
