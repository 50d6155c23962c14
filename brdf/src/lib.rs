//! Split-sum BRDF lookup table.
//!
//! [BrdfLut::build] integrates the GGX specular BRDF for every
//! `(n_dot_v, roughness)` pair of a square table in one compute
//! dispatch. [integrate_brdf] is the same integral on the CPU.

mod device;
mod error;
mod grid;
mod lut;
mod reference;

pub use crate::{
    device::{GpuAvailability, GpuContext},
    error::BrdfError,
    grid::{DispatchGrid, LUT_SIZE, TILE},
    lut::BrdfLut,
    reference::{integrate_brdf, texel_inputs, DEFAULT_SAMPLE_COUNT},
};
