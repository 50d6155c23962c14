//! CPU version of the `integrate_brdf.wgsl` kernel.
//!
//! Follows the shader step by step in `f32`, so GPU output can be
//! checked texel by texel.

use std::f32::consts::PI;

type Vec3 = [f32; 3];

/// Number of Hammersley samples per texel the GPU kernel uses.
pub const DEFAULT_SAMPLE_COUNT: u32 = 1024;

/// Split-sum scale and bias for `n_dot_v` and perceptual `roughness`.
///
/// Returns `[scale, bias]` such that the specular term is
/// `F0 * scale + bias`. Both inputs are expected in `(0, 1]`.
pub fn integrate_brdf(n_dot_v: f32, roughness: f32, sample_count: u32) -> [f32; 2] {
    let view = [(1.0 - n_dot_v * n_dot_v).max(0.0).sqrt(), 0.0, n_dot_v];
    let mut scale = 0.0;
    let mut bias = 0.0;

    for i in 0..sample_count {
        let half = importance_sample_ggx(hammersley(i, sample_count), roughness);
        let v_dot_h = dot(view, half);
        let light = sub(scale_by(half, 2.0 * v_dot_h), view);

        let n_dot_l = light[2].max(0.0);
        if n_dot_l > 0.0 {
            let n_dot_h = half[2].max(0.0);
            let v_dot_h = v_dot_h.max(0.0);
            let g = geometry_smith(n_dot_v, n_dot_l, roughness);
            let g_vis = g * v_dot_h / (n_dot_h * n_dot_v);
            let fc = (1.0 - v_dot_h).powi(5);
            scale += (1.0 - fc) * g_vis;
            bias += fc * g_vis;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let n = sample_count.max(1) as f32;
    [scale / n, bias / n]
}

/// Inputs of texel `(x, y)` in a `size`² table: `(n_dot_v, roughness)`.
#[allow(clippy::cast_precision_loss)]
pub fn texel_inputs(x: u32, y: u32, size: u32) -> (f32, f32) {
    let size = size as f32;
    ((x as f32 + 0.5) / size, (y as f32 + 0.5) / size)
}

fn hammersley(i: u32, n: u32) -> [f32; 2] {
    #[allow(clippy::cast_precision_loss)]
    let first = i as f32 / n as f32;
    #[allow(clippy::cast_precision_loss)]
    let second = i.reverse_bits() as f32 * 2.328_306_4e-10;
    [first, second]
}

/// GGX half vector around the +z normal.
fn importance_sample_ggx([u, v]: [f32; 2], roughness: f32) -> Vec3 {
    let a = roughness * roughness;
    let phi = 2.0 * PI * u;
    let cos_theta = ((1.0 - v) / (1.0 + (a * a - 1.0) * v)).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    [phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta]
}

fn geometry_schlick_ggx(n_dot_x: f32, roughness: f32) -> f32 {
    // IBL remapping of k.
    let k = roughness * roughness / 2.0;
    n_dot_x / (n_dot_x * (1.0 - k) + k)
}

fn geometry_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    geometry_schlick_ggx(n_dot_v, roughness) * geometry_schlick_ggx(n_dot_l, roughness)
}

fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale_by(a: Vec3, s: f32) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}
