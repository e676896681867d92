mod area;
mod distant;
mod environment;
mod point;

pub use area::AreaLight;
pub use distant::DistantLight;
pub use environment::Environment;
pub use point::PointLight;

use std::str::FromStr;
use std::sync::Arc;

use strum::EnumString;

use crate::{
    math::{Normal, Point3, Ray, Spectrum, Vec3, RAY_EPSILON},
    params::ParamSet,
    sampling::Sampler,
};

/// An emitter sample toward a vantage point.
///
/// `light` is a non-owning arena index into the scene's light list, kept so
/// an estimator can come back for `eval`/`pdf` on the same emitter.
#[derive(Copy, Clone, Debug)]
pub struct LightSample {
    /// The vantage point being lit.
    pub ref_p: Point3,
    /// Sampled point on the emitter; unused for distant emitters.
    pub p: Point3,
    /// Emitter surface normal at `p`; unused for non-surface emitters.
    pub n: Normal,
    /// World-space direction from `ref_p` toward the emitter.
    pub wi: Vec3,
    pub dist: f32,
    pub pdf: f32,
    pub light: usize,
}

impl LightSample {
    pub fn new(ref_p: Point3) -> Self {
        Self {
            ref_p,
            p: Point3::zeros(),
            n: Normal::new(0.0, 0.0, 1.0),
            wi: Vec3::zeros(),
            dist: f32::INFINITY,
            pdf: 0.0,
            light: 0,
        }
    }

    /// Occlusion test ray from the vantage point to just short of the
    /// emitter.
    pub fn shadow_ray(&self) -> Ray {
        Ray::spanning(self.ref_p, self.wi, RAY_EPSILON, self.dist - RAY_EPSILON)
    }
}

/// Emitter model.
pub trait Light: Send + Sync {
    /// Radiance arriving from the emitter along the sample's `wi`. Zero for
    /// delta emitters, which can only be reached through [`Light::sample`].
    fn eval(&self, sample: &LightSample) -> Spectrum;

    /// Draws a direction toward the emitter, filling in `wi`, `dist`, `pdf`
    /// and the emitter geometry. Returns incident radiance pre-divided by
    /// the solid-angle density.
    fn sample(&self, sample: &mut LightSample, sampler: &mut dyn Sampler) -> Spectrum;

    /// Solid-angle density of [`Light::sample`] having produced `wi` from
    /// `ref_p`. Zero for delta emitters.
    fn pdf(&self, sample: &LightSample) -> f32;

    /// Emits a photon ray from the emitter's surface, returning the ray and
    /// the carried flux pre-divided by the emission density.
    fn sample_photon(&self, sampler: &mut dyn Sampler) -> (Ray, Spectrum);

    fn is_delta(&self) -> bool;
}

#[derive(Copy, Clone, Debug, EnumString, strum::Display)]
#[strum(serialize_all = "snake_case")]
enum LightType {
    Point,
    Distant,
    Environment,
}

/// Builds a standalone light from a type name and named parameters.
///
/// Area lights are bound to scene primitives and constructed with their
/// shape instead. Unknown names fail open to a point light with a warning.
pub fn create_light(type_name: &str, params: &ParamSet) -> Arc<dyn Light> {
    let light_type = LightType::from_str(type_name).unwrap_or_else(|_| {
        vermeer_warn!("Unknown light type '{}', substituting point", type_name);
        LightType::Point
    });

    match light_type {
        LightType::Point => {
            let position = params.vector("position", Vec3::zeros());
            Arc::new(PointLight::new(
                Point3::new(position.x, position.y, position.z),
                params.spectrum("power", Spectrum::ones()),
            ))
        }
        LightType::Distant => Arc::new(DistantLight::new(
            params.vector("direction", Vec3::new(0.0, 0.0, -1.0)),
            params.spectrum("irradiance", Spectrum::ones()),
        )),
        LightType::Environment => Arc::new(Environment::new(
            params.spectrum("radiance", Spectrum::ones()),
        )),
    }
}
