//! PNG output for tightly packed RGBA8 buffers.

use anyhow::{ensure, Context, Error as AnyError};
use image::{
    codecs::png::{CompressionType, FilterType, PngEncoder},
    ColorType, ImageEncoder,
};
use std::{fs::File, io::BufWriter, path::Path};

const RGBA8_CHANNELS: usize = 4;

/// Writes straight alpha RGBA8 `data` of `width` x `height` to `path`.
pub fn write_rgba8(path: &Path, data: &[u8], width: u32, height: u32) -> Result<(), AnyError> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(RGBA8_CHANNELS))
        .context("image dimensions overflow")?;
    ensure!(
        data.len() == expected,
        "expected {expected} bytes of RGBA8 for {width}x{height}, got {}",
        data.len()
    );

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let encoder = PngEncoder::new_with_quality(
        BufWriter::new(file),
        CompressionType::Default,
        FilterType::Adaptive,
    );
    encoder
        .write_image(data, width, height, ColorType::Rgba8)
        .with_context(|| format!("encoding {}", path.display()))?;
    Ok(())
}

/// Maps `[scale, bias]` texels to opaque red/green pixels.
pub fn lut_to_rgba8(texels: &[[f32; 2]]) -> Vec<u8> {
    let mut data = Vec::with_capacity(texels.len() * RGBA8_CHANNELS);
    for &[scale, bias] in texels {
        data.extend_from_slice(&[unit_to_u8(scale), unit_to_u8(bias), 0, u8::MAX]);
    }
    data
}

fn unit_to_u8(value: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let byte = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    byte
}
