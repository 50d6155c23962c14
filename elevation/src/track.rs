//! Feeds a [SampleStore] from raw GPS fixes.

use crate::SampleStore;
use geo::{
    algorithm::HaversineDistance,
    geometry::{Coord, Point},
};
use log::{debug, trace};

/// Default minimum distance between recorded fixes (meters).
pub const DEFAULT_MIN_STEP_M: f64 = 50.0;

/// A position fix with its elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackFix {
    /// `x` is longitude, `y` is latitude, both in degrees.
    pub location: Coord<f64>,

    /// Meters above sea level.
    pub elevation_m: f32,
}

/// Converts a stream of [TrackFix]es into altitude samples.
///
/// Fixes closer than `min_step_m` to their predecessor are dropped.
/// The predecessor is updated either way, so many short hops never
/// add up to a recorded step.
#[derive(Debug, Clone)]
pub struct TrackRecorder {
    store: SampleStore,
    min_step_m: f64,
    previous: Option<Point<f64>>,
    total_distance_m: f64,
}

impl TrackRecorder {
    pub fn new(store: SampleStore) -> Self {
        Self {
            store,
            min_step_m: DEFAULT_MIN_STEP_M,
            previous: None,
            total_distance_m: 0.0,
        }
    }

    #[must_use]
    pub fn min_step_m(mut self, min_step_m: f64) -> Self {
        self.min_step_m = min_step_m;
        self
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    /// Cumulative distance of the recorded samples (meters).
    pub fn total_distance_m(&self) -> f64 {
        self.total_distance_m
    }

    /// Records `fix`, returning `true` if a sample was appended.
    pub fn push(&mut self, fix: TrackFix) -> bool {
        let point = Point::from(fix.location);
        let Some(previous) = self.previous.replace(point) else {
            self.store.append(fix.elevation_m, 0.0);
            return true;
        };

        let step = previous.haversine_distance(&point);
        if step <= self.min_step_m {
            trace!("skipping fix {:?}; step: {step:.1} m", fix.location);
            return false;
        }
        self.total_distance_m += step;
        #[allow(clippy::cast_possible_truncation)]
        let distance = self.total_distance_m as f32;
        self.store.append(fix.elevation_m, distance);
        true
    }

    /// Replaces all recorded samples with those derived from `fixes`.
    pub fn reload<I>(&mut self, fixes: I)
    where
        I: IntoIterator<Item = TrackFix>,
    {
        self.reset();
        let mut kept = 0;
        for fix in fixes {
            kept += usize::from(self.push(fix));
        }
        debug!(
            "reloaded track; samples: {kept}, distance: {:.1} m",
            self.total_distance_m
        );
    }

    /// Clears the store and the running distance.
    pub fn reset(&mut self) {
        self.store.reset();
        self.previous = None;
        self.total_distance_m = 0.0;
    }
}
