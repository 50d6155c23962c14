use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("can not allocate a {width}x{height} pixel buffer")]
    Allocation { width: u32, height: u32 },

    #[error("{0}")]
    Reserve(#[from] TryReserveError),

    #[error("drawing failed: {0}")]
    Draw(String),
}
