use super::{cos_theta, reflect, Bsdf, BsdfSample, Lobe, Measure};
use crate::{math::Spectrum, sampling::Sampler};

/// Ideal specular reflection without any fresnel falloff.
pub struct Mirror;

impl Mirror {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Mirror {
    fn default() -> Self {
        Self::new()
    }
}

impl Bsdf for Mirror {
    fn eval(&self, _sample: &BsdfSample) -> Spectrum {
        Spectrum::zeros()
    }

    fn sample(&self, sample: &mut BsdfSample, _sampler: &mut dyn Sampler) -> Spectrum {
        if cos_theta(sample.wi) <= 0.0 {
            return Spectrum::zeros();
        }

        sample.wo = reflect(sample.wi);
        sample.pdf = 1.0;
        sample.measure = Measure::Discrete;
        sample.lobe = Lobe::DELTA;

        Spectrum::ones()
    }

    fn pdf(&self, _sample: &BsdfSample) -> f32 {
        0.0
    }

    fn lobes(&self) -> Lobe {
        Lobe::DELTA
    }
}
