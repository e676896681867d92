use std::sync::Arc;

use super::{
    cos_theta, fresnel, reflect_about, same_hemisphere, Bsdf, BsdfSample, Lobe, Measure,
    MicrofacetDistribution,
};
use crate::{
    math::{Spectrum, INV_PI},
    sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere, Sampler},
};

// Fresnel indices for the specular coat
const INT_IOR: f32 = 1.5046;
const EXT_IOR: f32 = 1.000_277;

/// Rough plastic-like surface, a Lambertian base under a Cook-Torrance
/// specular lobe shaped by a microfacet distribution.
///
/// The lobes are mixed with weight `ks = 1 - max(albedo)` so the surface
/// cannot reflect more energy than it receives.
pub struct Microfacet {
    albedo: Spectrum,
    ks: f32,
    distribution: Arc<dyn MicrofacetDistribution>,
}

impl Microfacet {
    pub fn new(albedo: Spectrum, distribution: Arc<dyn MicrofacetDistribution>) -> Self {
        Self {
            albedo,
            ks: (1.0 - albedo.max_component()).clamp(0.0, 1.0),
            distribution,
        }
    }
}

impl Bsdf for Microfacet {
    fn eval(&self, sample: &BsdfSample) -> Spectrum {
        let cos_theta_i = cos_theta(sample.wi);
        let cos_theta_o = cos_theta(sample.wo);
        if sample.measure != Measure::SolidAngle || cos_theta_i <= 0.0 || cos_theta_o <= 0.0 {
            return Spectrum::zeros();
        }

        let wh = (sample.wi + sample.wo).normalized();
        let d = self.distribution.d(wh);
        let g = self.distribution.g(sample.wi, sample.wo);
        let f = fresnel::dielectric(sample.wi.dot(wh), EXT_IOR, INT_IOR);

        let diffuse = self.albedo * INV_PI;
        let specular = self.ks * d * g * f / (4.0 * cos_theta_i * cos_theta_o);
        diffuse + Spectrum::from(specular)
    }

    fn sample(&self, sample: &mut BsdfSample, sampler: &mut dyn Sampler) -> Spectrum {
        if cos_theta(sample.wi) <= 0.0 {
            return Spectrum::zeros();
        }

        sample.measure = Measure::SolidAngle;
        if sampler.next_1d() < self.ks {
            let wh = self.distribution.sample_wh(sampler.next_2d());
            sample.wo = reflect_about(sample.wi, wh);
            sample.lobe = Lobe::GLOSSY;
        } else {
            sample.wo = cosine_sample_hemisphere(sampler.next_2d());
            sample.lobe = Lobe::DIFFUSE;
        }
        if cos_theta(sample.wo) <= 0.0 {
            sample.pdf = 0.0;
            return Spectrum::zeros();
        }

        sample.pdf = self.pdf(sample);
        if sample.pdf == 0.0 {
            return Spectrum::zeros();
        }

        self.eval(sample) * cos_theta(sample.wo) / sample.pdf
    }

    fn pdf(&self, sample: &BsdfSample) -> f32 {
        if !same_hemisphere(sample.wi, sample.wo) || cos_theta(sample.wi) <= 0.0 {
            return 0.0;
        }

        let wh = (sample.wi + sample.wo).normalized();
        // Change of variables from the half-vector to the scattered direction
        let specular_pdf = self.distribution.pdf(wh) / (4.0 * sample.wo.dot(wh));
        let diffuse_pdf = cosine_hemisphere_pdf(cos_theta(sample.wo));
        self.ks * specular_pdf + (1.0 - self.ks) * diffuse_pdf
    }

    fn lobes(&self) -> Lobe {
        Lobe::DIFFUSE | Lobe::GLOSSY
    }
}
