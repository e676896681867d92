use super::{Light, LightSample};
use crate::{
    math::{Ray, Spectrum},
    sampling::{uniform_sample_sphere, uniform_sphere_pdf, Sampler},
};

const DISTANT_T: f32 = 1e7;

/// Constant-radiance sky dome surrounding the scene.
///
/// Image-backed maps belong to the host's loaders; the core only needs the
/// uniform dome to close escaping paths.
pub struct Environment {
    radiance: Spectrum,
}

impl Environment {
    pub fn new(radiance: Spectrum) -> Self {
        Self { radiance }
    }

    /// Radiance along an escaping ray.
    pub fn le(&self, _ray: Ray) -> Spectrum {
        self.radiance
    }
}

impl Light for Environment {
    fn eval(&self, _sample: &LightSample) -> Spectrum {
        self.radiance
    }

    fn sample(&self, sample: &mut LightSample, sampler: &mut dyn Sampler) -> Spectrum {
        sample.wi = uniform_sample_sphere(sampler.next_2d());
        sample.dist = DISTANT_T;
        sample.p = sample.ref_p + sample.wi * DISTANT_T;
        sample.pdf = uniform_sphere_pdf();

        self.radiance / sample.pdf
    }

    fn pdf(&self, _sample: &LightSample) -> f32 {
        uniform_sphere_pdf()
    }

    fn sample_photon(&self, _sampler: &mut dyn Sampler) -> (Ray, Spectrum) {
        // Would need the scene bounds to bracket the emitting sphere
        (
            Ray::new(crate::math::Point3::zeros(), crate::math::Vec3::new(0.0, 0.0, 1.0)),
            Spectrum::zeros(),
        )
    }

    fn is_delta(&self) -> bool {
        false
    }
}
