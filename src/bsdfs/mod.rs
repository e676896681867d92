mod conductor;
mod dielectric;
mod distribution;
pub mod fresnel;
mod lambertian;
mod microfacet;
mod mirror;

pub use conductor::Conductor;
pub use dielectric::Dielectric;
pub use distribution::{
    create_distribution, Beckmann, MicrofacetDistribution, Phong, TrowbridgeReitz,
};
pub use lambertian::Lambertian;
pub use microfacet::Microfacet;
pub use mirror::Mirror;

use std::str::FromStr;
use std::sync::Arc;

use bitflags::bitflags;
use strum::EnumString;

use crate::{
    math::{Spectrum, Vec3},
    params::ParamSet,
    sampling::Sampler,
};

// Local shading frame convention throughout: the surface normal is the +z
// axis, `wi` points away from the surface toward the viewer and is fixed for
// one evaluation, `wo` is the scattered direction.

bitflags! {
    /// Scattering lobe classification, fixed per BSDF at construction.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Lobe: u8 {
        const DIFFUSE = 1 << 0;
        const GLOSSY = 1 << 1;
        const DELTA = 1 << 2;
    }
}

/// Integration measure a sample was generated under.
///
/// `Discrete` marks zero-measure delta events which can only be reached
/// through explicit sampling, never through density evaluation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Measure {
    SolidAngle,
    Discrete,
}

/// Per-evaluation scattering record.
///
/// Created at the shading point, filled in by [`Bsdf::sample`], read by
/// [`Bsdf::eval`] and [`Bsdf::pdf`]. Lives for one evaluation call.
#[derive(Copy, Clone, Debug)]
pub struct BsdfSample {
    /// Fixed incident direction, local frame.
    pub wi: Vec3,
    /// Scattered direction, local frame.
    pub wo: Vec3,
    pub measure: Measure,
    /// Lobe the scattered direction was drawn from.
    pub lobe: Lobe,
    pub pdf: f32,
    /// Relative index of refraction along the sampled direction.
    pub eta: f32,
}

impl BsdfSample {
    pub fn new(wi: Vec3) -> Self {
        Self {
            wi,
            wo: Vec3::zeros(),
            measure: Measure::SolidAngle,
            lobe: Lobe::empty(),
            pdf: 0.0,
            eta: 1.0,
        }
    }

    pub fn with_pair(wi: Vec3, wo: Vec3) -> Self {
        Self {
            wo,
            ..Self::new(wi)
        }
    }
}

/// Surface scattering model.
pub trait Bsdf: Send + Sync {
    /// Evaluates the BSDF value for the sample's direction pair under the
    /// solid-angle measure. Exactly zero below the hemisphere, for delta
    /// lobes and for `Discrete`-measure queries.
    fn eval(&self, sample: &BsdfSample) -> Spectrum;

    /// Draws `wo` from a distribution matched to this BSDF, filling in
    /// `pdf`, `measure` and `lobe`. Returns the throughput weight, i.e. the
    /// BSDF value times cosine foreshortening, pre-divided by the sample
    /// density. Delta lobes return a constant fresnel-weighted throughput
    /// under the `Discrete` measure instead.
    fn sample(&self, sample: &mut BsdfSample, sampler: &mut dyn Sampler) -> Spectrum;

    /// Density of [`Bsdf::sample`] having produced the sample's direction
    /// pair. Zero for delta lobes.
    fn pdf(&self, sample: &BsdfSample) -> f32;

    /// Lobes this BSDF scatters through, fixed at construction.
    fn lobes(&self) -> Lobe;

    /// `true` if all transport flows through zero-measure lobes.
    fn is_delta(&self) -> bool {
        self.lobes().contains(Lobe::DELTA)
    }
}

#[derive(Copy, Clone, Debug, EnumString, strum::Display)]
#[strum(serialize_all = "snake_case")]
enum BsdfType {
    Lambertian,
    Mirror,
    Dielectric,
    Conductor,
    Microfacet,
}

/// Builds a BSDF from a type name and named parameters.
///
/// Unknown names fail open: a warning is logged and a default Lambertian is
/// substituted so scene construction keeps going.
pub fn create_bsdf(type_name: &str, params: &ParamSet) -> Arc<dyn Bsdf> {
    let bsdf_type = BsdfType::from_str(type_name).unwrap_or_else(|_| {
        vermeer_warn!(
            "Unknown BSDF type '{}', substituting lambertian",
            type_name
        );
        BsdfType::Lambertian
    });

    match bsdf_type {
        BsdfType::Lambertian => Arc::new(Lambertian::new(
            params.spectrum("albedo", Spectrum::from(0.5)),
        )),
        BsdfType::Mirror => Arc::new(Mirror::new()),
        BsdfType::Dielectric => Arc::new(Dielectric::new(
            params.float("int_ior", 1.5046),
            params.float("ext_ior", 1.000_277),
        )),
        BsdfType::Conductor => Arc::new(Conductor::new(
            params.spectrum("eta", Spectrum::new(0.143, 0.375, 1.442)),
            params.spectrum("k", Spectrum::new(3.983, 2.386, 1.603)),
        )),
        BsdfType::Microfacet => Arc::new(Microfacet::new(
            params.spectrum("albedo", Spectrum::from(0.5)),
            create_distribution(
                params.text("distribution", "beckmann"),
                params.float("alpha", 0.1),
            ),
        )),
    }
}

// Shading frame trigonometry, n = (0,0,1)

pub fn cos_theta(v: Vec3) -> f32 {
    v.z
}

pub fn cos_2_theta(v: Vec3) -> f32 {
    v.z * v.z
}

pub fn sin_2_theta(v: Vec3) -> f32 {
    (1.0 - cos_2_theta(v)).max(0.0)
}

pub fn sin_theta(v: Vec3) -> f32 {
    sin_2_theta(v).sqrt()
}

pub fn tan_theta(v: Vec3) -> f32 {
    sin_theta(v) / cos_theta(v)
}

pub fn tan_2_theta(v: Vec3) -> f32 {
    sin_2_theta(v) / cos_2_theta(v)
}

pub fn cos_phi(v: Vec3) -> f32 {
    let sin_theta = sin_theta(v);
    if sin_theta == 0.0 {
        1.0
    } else {
        (v.x / sin_theta).clamp(-1.0, 1.0)
    }
}

pub fn sin_phi(v: Vec3) -> f32 {
    let sin_theta = sin_theta(v);
    if sin_theta == 0.0 {
        0.0
    } else {
        (v.y / sin_theta).clamp(-1.0, 1.0)
    }
}

pub fn same_hemisphere(a: Vec3, b: Vec3) -> bool {
    a.z * b.z > 0.0
}

/// Mirror reflection about the local +z normal.
pub fn reflect(v: Vec3) -> Vec3 {
    Vec3::new(-v.x, -v.y, v.z)
}

/// Reflection about an arbitrary half-vector.
pub fn reflect_about(v: Vec3, wh: Vec3) -> Vec3 {
    wh * (2.0 * v.dot(wh)) - v
}

/// Refraction through the local +z normal with relative index `eta`
/// (incident over transmitted). `None` on total internal reflection.
pub fn refract(wi: Vec3, eta: f32) -> Option<Vec3> {
    let cos_theta_i = cos_theta(wi);
    let sin_2_theta_t = eta * eta * (1.0 - cos_theta_i * cos_theta_i);
    if sin_2_theta_t >= 1.0 {
        return None;
    }
    let cos_theta_t = (1.0 - sin_2_theta_t).sqrt();
    let cos_theta_t = if cos_theta_i > 0.0 {
        -cos_theta_t
    } else {
        cos_theta_t
    };
    Some(Vec3::new(-eta * wi.x, -eta * wi.y, cos_theta_t))
}

pub fn spherical_direction(sin_theta: f32, cos_theta: f32, phi: f32) -> Vec3 {
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}
