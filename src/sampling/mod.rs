mod independent;

pub use independent::IndependentSampler;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::math::{Point2, Vec2, Vec3, INV_2_PI, INV_4_PI, INV_PI};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Sampling_and_Reconstruction/Sampling_Interface.html

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub enum SamplerSettings {
    Independent { samples_per_pixel: u32 },
}

impl Default for SamplerSettings {
    fn default() -> Self {
        SamplerSettings::Independent {
            samples_per_pixel: 16,
        }
    }
}

pub fn create_sampler(settings: SamplerSettings) -> Arc<dyn Sampler> {
    Arc::new(match settings {
        SamplerSettings::Independent { samples_per_pixel } => {
            IndependentSampler::new(samples_per_pixel)
        }
    })
}

/// Pseudo-random sample source for the estimators.
///
/// Pure value-semantics prng state underneath, so workers duplicate it per
/// tile through [`Sampler::clone_seeded`] with decorrelated streams.
pub trait Sampler: Send + Sync {
    /// Clones this `Sampler` with a decorrelated stream for `seed`.
    fn clone_seeded(&self, seed: u64) -> Box<dyn Sampler>;
    /// Returns the number of samples per pixel this `Sampler` generates.
    fn samples_per_pixel(&self) -> u32;
    /// Readies the sampler for a new pixel sample.
    fn start_pixel_sample(&mut self, p: Point2<u16>, sample: u32);
    /// Returns the next sample dimension in `[0, 1)`.
    fn next_1d(&mut self) -> f32;
    /// Returns the next two sample dimensions in `[0, 1)`.
    fn next_2d(&mut self) -> Point2<f32>;
}

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Monte_Carlo_Integration/2D_Sampling_with_Multidimensional_Transformations

pub fn concentric_sample_disk(u: Point2<f32>) -> Point2<f32> {
    let offset = (u * 2.0) + Vec2::new(-1.0, -1.0);
    if offset.x == 0.0 && offset.y == 0.0 {
        return Point2::zeros();
    }

    let (theta, r) = if offset.x.abs() > offset.y.abs() {
        (
            std::f32::consts::FRAC_PI_4 * (offset.y / offset.x),
            offset.x,
        )
    } else {
        (
            std::f32::consts::FRAC_PI_2 - std::f32::consts::FRAC_PI_4 * (offset.x / offset.y),
            offset.y,
        )
    };

    Point2::new(theta.cos() * r, theta.sin() * r)
}

pub fn cosine_sample_hemisphere(u: Point2<f32>) -> Vec3 {
    let d = concentric_sample_disk(u);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vec3::new(d.x, d.y, z)
}

pub fn cosine_hemisphere_pdf(cos_theta: f32) -> f32 {
    cos_theta * INV_PI
}

pub fn uniform_sample_hemisphere(u: Point2<f32>) -> Vec3 {
    let z = u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * std::f32::consts::PI * u.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

pub fn uniform_hemisphere_pdf() -> f32 {
    INV_2_PI
}

pub fn uniform_sample_sphere(u: Point2<f32>) -> Vec3 {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * std::f32::consts::PI * u.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

pub fn uniform_sphere_pdf() -> f32 {
    INV_4_PI
}

/// Power heuristic weight for combining two sampling strategies.
///
/// The degenerate all-zero case resolves to 0 so delta events on both sides
/// stay zero-contribution instead of NaN.
pub fn power_heuristic(f_pdf: f32, g_pdf: f32) -> f32 {
    let f2 = f_pdf * f_pdf;
    let g2 = g_pdf * g_pdf;
    if f2 + g2 == 0.0 {
        0.0
    } else {
        f2 / (f2 + g2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn power_heuristic_normalizes() {
        for &(f, g) in &[(1.0, 0.0), (0.0, 1.0), (0.5, 0.5), (2.0, 7.0), (1e-6, 1e3)] {
            assert_abs_diff_eq!(
                power_heuristic(f, g) + power_heuristic(g, f),
                1.0,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn power_heuristic_zero_case() {
        assert_eq!(power_heuristic(0.0, 0.0), 0.0);
    }

    #[test]
    fn hemisphere_samples_are_above_horizon() {
        let mut sampler = IndependentSampler::new(1);
        sampler.start_pixel_sample(Point2::new(0, 0), 0);
        for _ in 0..256 {
            let u = sampler.next_2d();
            assert!(cosine_sample_hemisphere(u).z >= 0.0);
            assert!(uniform_sample_hemisphere(u).z >= 0.0);
        }
    }

    #[test]
    fn sphere_samples_are_unit_length() {
        let mut sampler = IndependentSampler::new(1);
        sampler.start_pixel_sample(Point2::new(0, 0), 0);
        for _ in 0..256 {
            let d = uniform_sample_sphere(sampler.next_2d());
            assert_abs_diff_eq!(d.len(), 1.0, epsilon = 1e-4);
        }
    }
}
