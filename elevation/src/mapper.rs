use crate::{AltitudeSample, ProfileStats, Size};
use geo::geometry::Coord;

/// Maps `sample` into the target's coordinate space.
///
/// The origin is the bottom-left corner with `y` pointing up: the
/// first sample lands on `x = 0`, the last on `x = width`, the lowest
/// altitude on `y = 0` and the highest on `y = height`.
///
/// A series without distance maps every sample to `x = 0`, and a flat
/// series maps every sample to `y = 0`.
pub fn coordinates(sample: &AltitudeSample, stats: &ProfileStats, target: Size) -> Coord<f32> {
    #[allow(clippy::cast_precision_loss)]
    let (width, height) = (target.width as f32, target.height as f32);
    let x = normalize(sample.distance, stats.total_distance) * width;
    let y = normalize(
        sample.altitude - stats.min_altitude,
        stats.altitude_span(),
    ) * height;
    Coord { x, y }
}

fn normalize(value: f32, range: f32) -> f32 {
    let ratio = value / range;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}
