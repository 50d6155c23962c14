mod options;
mod png;
mod track;

use anyhow::{anyhow, bail, Error as AnyError};
use brdf::{BrdfError, BrdfLut, GpuContext, LUT_SIZE};
use clap::Parser;
use elevation::{ProfileGenerator, Request, SampleStore, Size, TrackRecorder};
use log::info;
use options::{Cli, Command as CliCmd};
use std::{path::Path, sync::mpsc};
use textplots::{Chart, Plot, Shape};

fn main() -> Result<(), AnyError> {
    let Cli { cmd } = Cli::parse();

    env_logger::init();

    match cmd {
        CliCmd::Profile {
            track,
            width,
            height,
            min_step,
            out,
        } => {
            let store = load_track(&track, min_step)?;
            render_profile(store, Size::new(width, height), &out)
        }
        CliCmd::Ascii { track, min_step } => {
            let store = load_track(&track, min_step)?;
            plot_ascii(&store)
        }
        CliCmd::Lut { samples, out } => export_lut(samples, &out),
    }
}

fn load_track(path: &Path, min_step: f64) -> Result<SampleStore, AnyError> {
    let fixes = track::read_fixes(path)?;
    let store = SampleStore::new();
    let mut recorder = TrackRecorder::new(store.clone()).min_step_m(min_step);
    let fix_count = fixes.len();
    recorder.reload(fixes);
    info!(
        "{}: {fix_count} fixes, {} samples, {:.0} m",
        path.display(),
        store.len(),
        recorder.total_distance_m()
    );
    Ok(store)
}

fn render_profile(store: SampleStore, size: Size, out: &Path) -> Result<(), AnyError> {
    let generator = ProfileGenerator::new(store);
    let (tx, rx) = mpsc::channel();
    match generator.request_image(size, move |image| {
        let _ = tx.send(image);
    }) {
        Request::Scheduled => (),
        Request::Insufficient => bail!("track has fewer than two samples"),
        Request::Busy => bail!("a render is already in flight"),
    }

    let image = rx
        .recv()?
        .ok_or_else(|| anyhow!("failed to rasterize {}x{} profile", size.width, size.height))?;
    png::write_rgba8(out, &image.to_straight_rgba(), image.width(), image.height())?;
    info!("wrote {}", out.display());
    Ok(())
}

fn plot_ascii(store: &SampleStore) -> Result<(), AnyError> {
    let snapshot = store.snapshot();
    if snapshot.len() < 2 {
        bail!("track has fewer than two samples");
    }
    let plot_data: Vec<(f32, f32)> = snapshot
        .iter()
        .map(|sample| (sample.distance / 1000.0, sample.altitude))
        .collect();
    let max_km = plot_data.last().map_or(0.0, |(km, _)| *km);
    Chart::new(300, 150, 0.0, max_km)
        .lineplot(&Shape::Lines(&plot_data))
        .display();
    Ok(())
}

fn export_lut(samples: u32, out: &Path) -> Result<(), AnyError> {
    let now = std::time::Instant::now();
    let texels = pollster::block_on(build_lut(samples))?;
    info!("built {LUT_SIZE}x{LUT_SIZE} BRDF LUT in {:?}", now.elapsed());
    png::write_rgba8(out, &png::lut_to_rgba8(&texels), LUT_SIZE, LUT_SIZE)?;
    info!("wrote {}", out.display());
    Ok(())
}

async fn build_lut(samples: u32) -> Result<Vec<[f32; 2]>, BrdfError> {
    let ctx = GpuContext::try_init().await.into_result()?;
    let lut = BrdfLut::build_with(&ctx, LUT_SIZE, samples).await?;
    lut.read_back(&ctx).await
}
