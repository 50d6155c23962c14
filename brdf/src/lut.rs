use crate::{BrdfError, DispatchGrid, GpuContext, DEFAULT_SAMPLE_COUNT, LUT_SIZE, TILE};
use bytemuck::{Pod, Zeroable};
use log::debug;
use wgpu::util::DeviceExt;

/// Written against `rg32float`; [shader_source] swaps in the context's
/// storage format.
const SHADER: &str = include_str!("shaders/integrate_brdf.wgsl");

const F32_BYTES: usize = std::mem::size_of::<f32>();

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Params {
    size: u32,
    sample_count: u32,
    _pad: [u32; 2],
}

/// GPU resident split-sum BRDF lookup table.
///
/// Texel `(x, y)` holds `[scale, bias]` in its first two channels for
/// `n_dot_v = (x + 0.5) / size` and `roughness = (y + 0.5) / size`.
#[derive(Debug)]
pub struct BrdfLut {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    grid: DispatchGrid,
}

impl BrdfLut {
    /// Builds the standard 256² table with [DEFAULT_SAMPLE_COUNT]
    /// samples per texel.
    pub async fn build(ctx: &GpuContext) -> Result<Self, BrdfError> {
        Self::build_with(ctx, LUT_SIZE, DEFAULT_SAMPLE_COUNT).await
    }

    /// Encodes and submits the integration pass.
    ///
    /// Every resource is created inside one validation error scope and
    /// nothing is submitted unless the scope comes back clean, so an
    /// adapter that rejects the setup yields `Err` rather than a panic
    /// from the device's uncaptured error handler.
    ///
    /// Returns as soon as the work is submitted. Reads through
    /// [BrdfLut::read_back] or any later submission on `ctx.queue` are
    /// ordered after it.
    pub async fn build_with(
        ctx: &GpuContext,
        size: u32,
        sample_count: u32,
    ) -> Result<Self, BrdfError> {
        let grid = DispatchGrid::new(size, TILE)?;
        let format = ctx.lut_format().ok_or(BrdfError::UnsupportedFormat)?;
        let shader = shader_source(format).ok_or(BrdfError::UnsupportedFormat)?;
        let device = &ctx.device;

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let (layout, pipeline) = create_pipeline(device, &shader, format);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("brdf.lut"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("brdf.lut.view"),
            ..Default::default()
        });

        let params = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("brdf.params"),
            contents: bytemuck::bytes_of(&Params {
                size,
                sample_count,
                _pad: [0; 2],
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("brdf.bind_group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
            ],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("brdf.encoder"),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("brdf.pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            let (x, y, z) = grid.workgroups();
            pass.dispatch_workgroups(x, y, z);
        }
        let commands = encoder.finish();

        if let Some(e) = device.pop_error_scope().await {
            return Err(BrdfError::Validation(e.to_string()));
        }
        ctx.queue.submit(Some(commands));
        debug!(
            "brdf lut submitted; size: {size}, samples: {sample_count}, format: {format:?}, workgroups: {}",
            grid.workgroup_count()
        );

        Ok(Self {
            texture,
            view,
            grid,
        })
    }

    pub fn size(&self) -> u32 {
        self.grid.size()
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.texture.format()
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Copies the table back to host memory, row by row from `y = 0`.
    ///
    /// Blocks on the device until the copy completes.
    pub async fn read_back(&self, ctx: &GpuContext) -> Result<Vec<[f32; 2]>, BrdfError> {
        let format = self.format();
        let texel_bytes = format
            .block_copy_size(None)
            .ok_or(BrdfError::UnsupportedFormat)?;
        let channels = usize::from(format.components());

        let size = self.size();
        let unpadded = size * texel_bytes;
        let padded = unpadded.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let device = &ctx.device;

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("brdf.readback"),
            size: u64::from(padded) * u64::from(size),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("brdf.readback.encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &staging,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(size),
                },
            },
            wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
        );
        let commands = encoder.finish();

        if let Some(e) = device.pop_error_scope().await {
            return Err(BrdfError::Validation(e.to_string()));
        }
        ctx.queue.submit(Some(commands));

        let slice = staging.slice(..);
        let (tx, rx) = futures_channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device.poll(wgpu::Maintain::Wait);

        rx.await
            .map_err(|_| BrdfError::Unavailable("readback channel closed".into()))?
            .map_err(BrdfError::BufferMap)?;

        let texels = {
            let mapped = slice.get_mapped_range();
            unpack_rows(&mapped, padded as usize, size as usize, channels)
        };
        staging.unmap();

        Ok(texels)
    }
}

/// WGSL for a storage texture of `format`, or `None` if the shader
/// cannot write it.
fn shader_source(format: wgpu::TextureFormat) -> Option<String> {
    let name = match format {
        wgpu::TextureFormat::Rg32Float => "rg32float",
        wgpu::TextureFormat::Rgba32Float => "rgba32float",
        _ => return None,
    };
    Some(SHADER.replace("<rg32float,", &format!("<{name},")))
}

/// Pulls `[scale, bias]` out of `size` rows of `channels` wide `f32`
/// texels, each row starting `padded` bytes after the last.
fn unpack_rows(mapped: &[u8], padded: usize, size: usize, channels: usize) -> Vec<[f32; 2]> {
    let row_bytes = size * channels * F32_BYTES;
    let mut texels = Vec::with_capacity(size * size);
    for row in mapped.chunks_exact(padded).take(size) {
        let values: &[f32] = bytemuck::cast_slice(&row[..row_bytes]);
        texels.extend(
            values
                .chunks_exact(channels)
                .map(|texel| [texel[0], texel[1]]),
        );
    }
    texels
}

fn create_pipeline(
    device: &wgpu::Device,
    shader: &str,
    format: wgpu::TextureFormat,
) -> (wgpu::BindGroupLayout, wgpu::ComputePipeline) {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("brdf.shader"),
        source: wgpu::ShaderSource::Wgsl(shader.into()),
    });

    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("brdf.layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::StorageTexture {
                    access: wgpu::StorageTextureAccess::WriteOnly,
                    format,
                    view_dimension: wgpu::TextureViewDimension::D2,
                },
                count: None,
            },
        ],
    });

    let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some("brdf.pipeline"),
        layout: Some(
            &device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("brdf.pipeline.layout"),
                bind_group_layouts: &[&layout],
                push_constant_ranges: &[],
            }),
        ),
        module: &module,
        entry_point: Some("integrate_brdf"),
        compilation_options: wgpu::PipelineCompilationOptions::default(),
        cache: None,
    });

    (layout, pipeline)
}
