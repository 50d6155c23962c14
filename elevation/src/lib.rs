//! # Elevation profiles
//!
//! `elevation` turns the altitude samples of a recorded track into a
//! shaded profile image with min/max altitude and distance badges.
//!
//! Samples are collected in a [SampleStore], optionally fed by a
//! [TrackRecorder] from raw GPS fixes. A [ProfileGenerator] renders
//! snapshots of the store off the caller's thread and hands the
//! finished [PixelBuffer] to a callback.

mod error;
mod generator;
mod mapper;
mod raster;
mod stats;
mod store;
mod theme;
mod track;

pub use {
    crate::{
        error::RasterError,
        generator::{ProfileGenerator, Request},
        mapper::coordinates,
        raster::{labels, rasterize, Align, Label, PixelBuffer},
        stats::{max_altitude, min_altitude, total_distance, ProfileStats},
        store::{AltitudeSample, SampleStore, Snapshot},
        theme::Theme,
        track::{TrackFix, TrackRecorder, DEFAULT_MIN_STEP_M},
    },
    geo,
};

/// Pixel dimensions of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
fn sample_series(points: &[(f32, f32)]) -> Vec<AltitudeSample> {
    points
        .iter()
        .map(|&(altitude, distance)| AltitudeSample { altitude, distance })
        .collect()
}
