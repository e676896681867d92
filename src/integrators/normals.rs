use super::Integrator;
use crate::{
    math::{Ray, Spectrum},
    sampling::Sampler,
    scene::Scene,
};

/// Debug visualization of shading normals, mapped to `[0,1]` color.
pub struct Normals {}

impl Integrator for Normals {
    fn li(&self, scene: &Scene, _sampler: &mut dyn Sampler, ray: Ray) -> Spectrum {
        match scene.intersect(ray) {
            Some(its) => Spectrum::new(
                (its.n.x + 1.0) / 2.0,
                (its.n.y + 1.0) / 2.0,
                (its.n.z + 1.0) / 2.0,
            ),
            None => Spectrum::zeros(),
        }
    }
}
