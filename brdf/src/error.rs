use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrdfError {
    #[error("no GPU adapter found")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    #[error("adapter has no storage texture format for the lut")]
    UnsupportedFormat,

    #[error("GPU validation failed: {0}")]
    Validation(String),

    #[error("grid size {size} is not a multiple of tile {tile}")]
    Indivisible { size: u32, tile: u32 },

    #[error("buffer mapping failed: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("GPU unavailable: {0}")]
    Unavailable(String),
}
