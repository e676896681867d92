use super::{cos_theta, fresnel, reflect, Bsdf, BsdfSample, Lobe, Measure};
use crate::{math::Spectrum, sampling::Sampler};

/// Smooth metal surface, specular reflection weighted by the conductor
/// fresnel term.
pub struct Conductor {
    eta: Spectrum,
    k: Spectrum,
}

impl Conductor {
    pub fn new(eta: Spectrum, k: Spectrum) -> Self {
        Self { eta, k }
    }
}

impl Bsdf for Conductor {
    fn eval(&self, _sample: &BsdfSample) -> Spectrum {
        Spectrum::zeros()
    }

    fn sample(&self, sample: &mut BsdfSample, _sampler: &mut dyn Sampler) -> Spectrum {
        let cos_theta_i = cos_theta(sample.wi);
        if cos_theta_i <= 0.0 {
            return Spectrum::zeros();
        }

        sample.wo = reflect(sample.wi);
        sample.pdf = 1.0;
        sample.measure = Measure::Discrete;
        sample.lobe = Lobe::DELTA;

        fresnel::conductor(cos_theta_i, self.eta, self.k)
    }

    fn pdf(&self, _sample: &BsdfSample) -> f32 {
        0.0
    }

    fn lobes(&self) -> Lobe {
        Lobe::DELTA
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::sampling::IndependentSampler;
    use approx::assert_abs_diff_eq;

    #[test]
    fn delta_queries_degrade_to_zero() {
        let bsdf = Conductor::new(
            Spectrum::new(0.143, 0.375, 1.442),
            Spectrum::new(3.983, 2.386, 1.603),
        );
        let sample = BsdfSample::with_pair(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        assert!(bsdf.eval(&sample).is_black());
        assert_eq!(bsdf.pdf(&sample), 0.0);
        assert!(bsdf.is_delta());
    }

    #[test]
    fn reflects_with_fresnel_weight() {
        let eta = Spectrum::new(0.143, 0.375, 1.442);
        let k = Spectrum::new(3.983, 2.386, 1.603);
        let bsdf = Conductor::new(eta, k);
        let mut sampler = IndependentSampler::with_seed(1, 1);

        let wi = Vec3::new(0.3, -0.4, (1.0f32 - 0.25).sqrt());
        let mut sample = BsdfSample::new(wi);
        let weight = bsdf.sample(&mut sample, &mut sampler);
        assert_abs_diff_eq!(sample.wo, reflect(wi));
        assert_abs_diff_eq!(
            weight,
            fresnel::conductor(cos_theta(wi), eta, k),
            epsilon = 1e-6
        );
    }
}
