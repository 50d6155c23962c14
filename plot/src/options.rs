use brdf::DEFAULT_SAMPLE_COUNT;
use clap::{Parser, Subcommand};
use elevation::DEFAULT_MIN_STEP_M;
use std::path::PathBuf;

/// Render elevation profiles of recorded tracks.
#[derive(Parser, Debug, Clone)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Render a shaded profile with altitude and distance badges to PNG.
    Profile {
        /// Track file: GPX if it ends in `.gpx`, otherwise JSON
        /// `[{ "location": [lon, lat], "elevation": m }, ..]`.
        #[arg(short, long)]
        track: PathBuf,

        /// Image width in pixels.
        #[arg(long, default_value_t = 900)]
        width: u32,

        /// Image height in pixels.
        #[arg(long, default_value_t = 300)]
        height: u32,

        /// Minimum distance between recorded fixes, in meters.
        #[arg(short, long, default_value_t = DEFAULT_MIN_STEP_M)]
        min_step: f64,

        /// PNG file path.
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Plot the profile to the terminal.
    Ascii {
        /// Track file: GPX if it ends in `.gpx`, otherwise JSON
        /// `[{ "location": [lon, lat], "elevation": m }, ..]`.
        #[arg(short, long)]
        track: PathBuf,

        /// Minimum distance between recorded fixes, in meters.
        #[arg(short, long, default_value_t = DEFAULT_MIN_STEP_M)]
        min_step: f64,
    },

    /// Build the BRDF lookup table on the GPU and export it as PNG.
    Lut {
        /// Samples per texel.
        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_COUNT)]
        samples: u32,

        /// PNG file path.
        #[arg(short, long)]
        out: PathBuf,
    },
}
