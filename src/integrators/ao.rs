use serde::{Deserialize, Serialize};

use super::Integrator;
use crate::{
    math::{Ray, Spectrum, RAY_EPSILON},
    sampling::{cosine_sample_hemisphere, Sampler},
    scene::Scene,
};

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub struct Params {
    /// Maximum occlusion distance; hits beyond it don't darken the point.
    pub ray_length: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            ray_length: f32::INFINITY,
        }
    }
}

/// Cosine-weighted ambient occlusion.
///
/// Cosine sampling cancels the foreshortening and the hemisphere
/// normalization exactly, so each sample contributes plain visibility.
pub struct AmbientOcclusion {
    params: Params,
}

impl AmbientOcclusion {
    pub fn new(params: Params) -> Self {
        Self { params }
    }
}

impl Integrator for AmbientOcclusion {
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: Ray) -> Spectrum {
        let its = match scene.intersect(ray) {
            Some(its) => its,
            // Nothing to occlude
            None => return Spectrum::ones(),
        };

        let d = its.to_world(cosine_sample_hemisphere(sampler.next_2d()));
        let shadow_ray = Ray::spanning(its.p, d, RAY_EPSILON, self.params.ray_length);
        if scene.intersect_p(shadow_ray) {
            Spectrum::zeros()
        } else {
            Spectrum::ones()
        }
    }
}
