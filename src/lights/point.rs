use super::{Light, LightSample};
use crate::{
    math::{Point3, Ray, Spectrum, INV_4_PI},
    sampling::{uniform_sample_sphere, uniform_sphere_pdf, Sampler},
};

/// Isotropic point emitter described by its total power.
pub struct PointLight {
    p: Point3,
    power: Spectrum,
}

impl PointLight {
    pub fn new(p: Point3, power: Spectrum) -> Self {
        Self { p, power }
    }
}

impl Light for PointLight {
    fn eval(&self, _sample: &LightSample) -> Spectrum {
        Spectrum::zeros()
    }

    fn sample(&self, sample: &mut LightSample, _sampler: &mut dyn Sampler) -> Spectrum {
        let to_light = self.p - sample.ref_p;
        let dist_sqr = to_light.len_sqr();

        sample.p = self.p;
        sample.dist = dist_sqr.sqrt();
        sample.wi = to_light / sample.dist;
        sample.pdf = 1.0;

        self.power * INV_4_PI / dist_sqr
    }

    fn pdf(&self, _sample: &LightSample) -> f32 {
        0.0
    }

    fn sample_photon(&self, sampler: &mut dyn Sampler) -> (Ray, Spectrum) {
        let d = uniform_sample_sphere(sampler.next_2d());
        // Intensity over the direction density collapses to the total power
        let weight = self.power * INV_4_PI / uniform_sphere_pdf();
        (Ray::new(self.p, d), weight)
    }

    fn is_delta(&self) -> bool {
        true
    }
}
