use plotters::style::{Color, RGBAColor, RGBColor, BLACK, WHITE};

/// Visual constants of a profile image.
///
/// Positions are in pixels, measured from the bottom-left corner of
/// the image.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Fill of the area below the profile.
    pub profile_fill: RGBAColor,

    /// Fill of the rounded rectangle behind each label.
    pub badge_fill: RGBAColor,

    /// Label text color.
    pub text_color: RGBAColor,

    /// Nominal label font size; the built-in glyphs are scaled to the
    /// nearest multiple of their 7 pixel height.
    pub font_size: f64,

    /// Space added on both sides of a label, `(horizontal, vertical)`.
    /// Negative values shrink the badge.
    pub badge_padding: (i32, i32),

    /// Corner radii of a badge, `(horizontal, vertical)`.
    pub badge_corner: (f32, f32),

    /// Bottom-left corner of the minimum altitude badge.
    pub min_label_origin: (f32, f32),

    /// Left edge and distance from the top edge of the maximum
    /// altitude badge's bottom-left corner.
    pub max_label_inset: (f32, f32),

    /// Distance of the centered distance badge from the bottom edge.
    pub distance_label_bottom: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            profile_fill: BLACK.mix(0.5),
            badge_fill: RGBColor(128, 128, 128).mix(0.5),
            text_color: WHITE.to_rgba(),
            font_size: 14.0,
            badge_padding: (2, -1),
            badge_corner: (3.0, 2.0),
            min_label_origin: (10.0, 10.0),
            max_label_inset: (10.0, 25.0),
            distance_label_bottom: 10.0,
        }
    }
}
