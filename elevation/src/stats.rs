use crate::AltitudeSample;

/// Summary values of a sample series, recomputed for every render.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProfileStats {
    /// Distance of the last sample (meters), 0 below two samples.
    pub total_distance: f32,

    /// Highest altitude in the series (meters).
    pub max_altitude: f32,

    /// Lowest altitude in the series (meters).
    pub min_altitude: f32,
}

impl ProfileStats {
    pub fn from_samples(samples: &[AltitudeSample]) -> Self {
        Self {
            total_distance: total_distance(samples),
            max_altitude: max_altitude(samples),
            min_altitude: min_altitude(samples),
        }
    }

    /// Altitude range covered by the series.
    pub fn altitude_span(&self) -> f32 {
        self.max_altitude - self.min_altitude
    }
}

/// Returns the last sample's distance, or 0 when there are fewer than
/// two samples and so no track to measure.
pub fn total_distance(samples: &[AltitudeSample]) -> f32 {
    match samples {
        [_, .., last] => last.distance,
        _ => 0.0,
    }
}

/// Returns the highest altitude, or 0 for an empty series.
pub fn max_altitude(samples: &[AltitudeSample]) -> f32 {
    samples
        .iter()
        .map(|sample| sample.altitude)
        .reduce(f32::max)
        .unwrap_or(0.0)
}

/// Returns the lowest altitude, or 0 for an empty series.
pub fn min_altitude(samples: &[AltitudeSample]) -> f32 {
    samples
        .iter()
        .map(|sample| sample.altitude)
        .reduce(f32::min)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::{max_altitude, min_altitude, total_distance, ProfileStats};
    use crate::sample_series;

    #[test]
    fn test_empty_series() {
        assert_eq!(total_distance(&[]), 0.0);
        assert_eq!(max_altitude(&[]), 0.0);
        assert_eq!(min_altitude(&[]), 0.0);
        assert_eq!(ProfileStats::from_samples(&[]), ProfileStats::default());
    }

    #[test]
    fn test_total_distance_is_last_distance() {
        let series = sample_series(&[(10.0, 0.0), (12.0, 55.0), (11.0, 160.5), (9.0, 420.25)]);
        assert_eq!(total_distance(&series), 420.25);
    }

    #[test]
    fn test_extrema() {
        let series = sample_series(&[(100.0, 0.0), (500.0, 2000.0), (300.0, 5000.0)]);
        let stats = ProfileStats::from_samples(&series);
        assert_eq!(
            stats,
            ProfileStats {
                total_distance: 5000.0,
                max_altitude: 500.0,
                min_altitude: 100.0,
            }
        );
        assert_eq!(stats.altitude_span(), 400.0);
    }

    #[test]
    fn test_repeated_extrema() {
        let series = sample_series(&[(-4.0, 0.0), (7.0, 1.0), (-4.0, 2.0), (7.0, 3.0)]);
        assert_eq!(max_altitude(&series), 7.0);
        assert_eq!(min_altitude(&series), -4.0);
    }

    #[test]
    fn test_single_sample() {
        // A lone fix far from the origin still spans no distance.
        let series = sample_series(&[(250.0, 40.0)]);
        let stats = ProfileStats::from_samples(&series);
        assert_eq!(stats.max_altitude, 250.0);
        assert_eq!(stats.min_altitude, 250.0);
        assert_eq!(stats.total_distance, 0.0);

        let series = sample_series(&[(250.0, 40.0), (260.0, 90.0)]);
        assert_eq!(total_distance(&series), 90.0);
    }
}
