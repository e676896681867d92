use super::{cos_theta, same_hemisphere, Bsdf, BsdfSample, Lobe, Measure};
use crate::{
    math::{Spectrum, INV_PI},
    sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere, Sampler},
};

/// Ideal diffuse reflection.
pub struct Lambertian {
    albedo: Spectrum,
}

impl Lambertian {
    pub fn new(albedo: Spectrum) -> Self {
        Self { albedo }
    }
}

impl Bsdf for Lambertian {
    fn eval(&self, sample: &BsdfSample) -> Spectrum {
        if sample.measure != Measure::SolidAngle
            || cos_theta(sample.wi) <= 0.0
            || cos_theta(sample.wo) <= 0.0
        {
            return Spectrum::zeros();
        }
        self.albedo * INV_PI
    }

    fn sample(&self, sample: &mut BsdfSample, sampler: &mut dyn Sampler) -> Spectrum {
        if cos_theta(sample.wi) <= 0.0 {
            return Spectrum::zeros();
        }

        sample.wo = cosine_sample_hemisphere(sampler.next_2d());
        sample.pdf = cosine_hemisphere_pdf(cos_theta(sample.wo));
        sample.measure = Measure::SolidAngle;
        sample.lobe = Lobe::DIFFUSE;

        // albedo/pi * cos / (cos/pi) collapses to the albedo
        self.albedo
    }

    fn pdf(&self, sample: &BsdfSample) -> f32 {
        if !same_hemisphere(sample.wi, sample.wo) || cos_theta(sample.wi) <= 0.0 {
            return 0.0;
        }
        cosine_hemisphere_pdf(cos_theta(sample.wo))
    }

    fn lobes(&self) -> Lobe {
        Lobe::DIFFUSE
    }
}
