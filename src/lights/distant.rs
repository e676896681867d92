use super::{Light, LightSample};
use crate::{
    math::{Ray, Spectrum, Vec3},
    sampling::Sampler,
};

// Shadow rays toward an infinitely distant emitter still need a finite span
const DISTANT_T: f32 = 1e7;

/// Directional emitter infinitely far away, e.g. an idealized sun.
pub struct DistantLight {
    // Direction the light travels in, world space
    d: Vec3,
    irradiance: Spectrum,
}

impl DistantLight {
    pub fn new(d: Vec3, irradiance: Spectrum) -> Self {
        Self {
            d: d.normalized(),
            irradiance,
        }
    }
}

impl Light for DistantLight {
    fn eval(&self, _sample: &LightSample) -> Spectrum {
        Spectrum::zeros()
    }

    fn sample(&self, sample: &mut LightSample, _sampler: &mut dyn Sampler) -> Spectrum {
        sample.wi = -self.d;
        sample.dist = DISTANT_T;
        sample.p = sample.ref_p + sample.wi * DISTANT_T;
        sample.pdf = 1.0;

        self.irradiance
    }

    fn pdf(&self, _sample: &LightSample) -> f32 {
        0.0
    }

    fn sample_photon(&self, _sampler: &mut dyn Sampler) -> (Ray, Spectrum) {
        // Would need the scene bounds to place the emitting disk
        (
            Ray::new(crate::math::Point3::zeros(), self.d),
            Spectrum::zeros(),
        )
    }

    fn is_delta(&self) -> bool {
        true
    }
}
