//! GPU device initialization.

use crate::BrdfError;
use log::{info, warn};
use std::fmt;

/// Storage texture formats the LUT can be written in, best first.
///
/// Both hold `f32` channels, so readback only has to skip the unused
/// ones. `Rg32Float` is not a storage format on downlevel (GLES)
/// adapters, `Rgba32Float` is.
const LUT_FORMATS: [wgpu::TextureFormat; 2] = [
    wgpu::TextureFormat::Rg32Float,
    wgpu::TextureFormat::Rgba32Float,
];

/// Device and queue every dispatch runs on, plus what the adapter can
/// store the LUT in.
///
/// Created once with [GpuContext::try_init] and passed by reference;
/// nothing in this crate holds on to a global device.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    adapter_info: wgpu::AdapterInfo,
    lut_format: Option<wgpu::TextureFormat>,
}

/// Outcome of [GpuContext::try_init].
#[derive(Debug)]
pub enum GpuAvailability {
    Available(GpuContext),
    Unavailable(String),
}

impl GpuAvailability {
    /// Converts into a `Result`, for callers that cannot do without a
    /// GPU.
    pub fn into_result(self) -> Result<GpuContext, BrdfError> {
        match self {
            Self::Available(ctx) => Ok(ctx),
            Self::Unavailable(reason) => Err(BrdfError::Unavailable(reason)),
        }
    }
}

impl GpuContext {
    /// Requests an adapter and device. Never fails; any error is
    /// reported as [GpuAvailability::Unavailable].
    pub async fn try_init() -> GpuAvailability {
        match Self::request().await {
            Ok(ctx) => GpuAvailability::Available(ctx),
            Err(e) => {
                warn!("GPU initialization failed: {e}");
                GpuAvailability::Unavailable(e.to_string())
            }
        }
    }

    /// The adapter this context's device was created from.
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// The first of `Rg32Float`, `Rgba32Float` the adapter allows as a
    /// storage texture, or `None` if it allows neither.
    pub fn lut_format(&self) -> Option<wgpu::TextureFormat> {
        self.lut_format
    }

    async fn request() -> Result<Self, BrdfError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(BrdfError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        let lut_format = pick_lut_format(|format| {
            adapter
                .get_texture_format_features(format)
                .allowed_usages
                .contains(wgpu::TextureUsages::STORAGE_BINDING)
        });
        match lut_format {
            Some(format) => info!(
                "GPU adapter: {} ({:?}), lut format: {format:?}",
                adapter_info.name, adapter_info.backend
            ),
            None => warn!(
                "GPU adapter: {} ({:?}) has no storage texture format for the lut",
                adapter_info.name, adapter_info.backend
            ),
        }

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("brdf"),
                    required_features: wgpu::Features::empty(),
                    // Storage textures are not part of the WebGL2
                    // downlevel limits.
                    required_limits: adapter.limits(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        Ok(Self {
            device,
            queue,
            adapter_info,
            lut_format,
        })
    }
}

impl fmt::Debug for GpuContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuContext")
            .field("adapter", &self.adapter_info.name)
            .field("backend", &self.adapter_info.backend)
            .field("lut_format", &self.lut_format)
            .finish_non_exhaustive()
    }
}

fn pick_lut_format(
    storage_capable: impl Fn(wgpu::TextureFormat) -> bool,
) -> Option<wgpu::TextureFormat> {
    LUT_FORMATS.into_iter().find(|&format| storage_capable(format))
}

#[cfg(test)]
mod tests {
    use super::pick_lut_format;
    use wgpu::TextureFormat;

    #[test]
    fn test_prefers_two_channel_format() {
        assert_eq!(pick_lut_format(|_| true), Some(TextureFormat::Rg32Float));
    }

    #[test]
    fn test_falls_back_to_four_channels() {
        // GLES rejects rg32f image stores.
        assert_eq!(
            pick_lut_format(|format| format != TextureFormat::Rg32Float),
            Some(TextureFormat::Rgba32Float)
        );
    }

    #[test]
    fn test_no_storage_format() {
        assert_eq!(pick_lut_format(|_| false), None);
    }
}
