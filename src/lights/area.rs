use std::sync::Arc;

use super::{Light, LightSample};
use crate::{
    math::{Frame, Ray, Spectrum},
    sampling::{cosine_sample_hemisphere, Sampler},
    shapes::Shape,
};

/// Uniform diffuse emitter bound to a shape's surface.
///
/// Holds a shared handle to the geometry for surface sampling only; the
/// scene primitive owns the shape's role in intersection.
pub struct AreaLight {
    shape: Arc<dyn Shape>,
    radiance: Spectrum,
}

impl AreaLight {
    pub fn new(shape: Arc<dyn Shape>, radiance: Spectrum) -> Self {
        Self { shape, radiance }
    }

    pub fn radiance(&self) -> Spectrum {
        self.radiance
    }
}

impl Light for AreaLight {
    fn eval(&self, sample: &LightSample) -> Spectrum {
        // Emission is one-sided
        if sample.n.dot_v(-sample.wi) <= 0.0 {
            return Spectrum::zeros();
        }
        self.radiance
    }

    fn sample(&self, sample: &mut LightSample, sampler: &mut dyn Sampler) -> Spectrum {
        let surface = self.shape.sample_surface(sampler.next_2d());

        let to_light = surface.p - sample.ref_p;
        let dist_sqr = to_light.len_sqr();
        let dist = dist_sqr.sqrt();
        let wi = to_light / dist;

        sample.p = surface.p;
        sample.n = surface.n;
        sample.wi = wi;
        sample.dist = dist;

        let cos_theta = surface.n.dot_v(-wi);
        if cos_theta <= 0.0 {
            // Back face of the emitter
            sample.pdf = 0.0;
            return Spectrum::zeros();
        }

        // Area measure to solid angle at the vantage point
        sample.pdf = surface.pdf * dist_sqr / cos_theta;
        self.radiance / sample.pdf
    }

    fn pdf(&self, sample: &LightSample) -> f32 {
        let cos_theta = sample.n.dot_v(-sample.wi);
        if cos_theta <= 0.0 {
            return 0.0;
        }
        self.shape.pdf_surface() * sample.ref_p.dist_sqr(sample.p) / cos_theta
    }

    fn sample_photon(&self, sampler: &mut dyn Sampler) -> (Ray, Spectrum) {
        let surface = self.shape.sample_surface(sampler.next_2d());
        let frame = Frame::from_normal(surface.n);
        let d = frame.to_world(cosine_sample_hemisphere(sampler.next_2d()));

        // Le * cos / (pdf_area * cos/pi) = Le * pi * area
        let weight = self.radiance * std::f32::consts::PI * self.shape.area();
        (Ray::new(surface.p, d), weight)
    }

    fn is_delta(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vec3};
    use crate::sampling::IndependentSampler;
    use crate::shapes::Sphere;
    use approx::assert_abs_diff_eq;

    fn test_light() -> AreaLight {
        AreaLight::new(
            Arc::new(Sphere::new(Point3::new(0.0, 5.0, 0.0), 1.0)),
            Spectrum::from(3.0),
        )
    }

    #[test]
    fn back_faces_are_culled() {
        let light = test_light();
        let mut sampler = IndependentSampler::with_seed(1, 3);
        let mut culled = 0u32;
        let n = 512;
        for _ in 0..n {
            let mut sample = LightSample::new(Point3::zeros());
            let radiance = light.sample(&mut sample, &mut sampler);
            if sample.pdf == 0.0 {
                assert!(radiance.is_black());
                culled += 1;
            } else {
                // Sampled point faces the vantage point
                assert!(sample.n.dot_v(-sample.wi) > 0.0);
                assert!(!radiance.is_black());
            }
        }
        // Uniform sphere sampling lands on the far hemisphere about half the time
        assert!(culled > 0 && culled < n);
    }

    #[test]
    fn pdf_matches_sample() {
        let light = test_light();
        let mut sampler = IndependentSampler::with_seed(1, 4);
        loop {
            let mut sample = LightSample::new(Point3::zeros());
            light.sample(&mut sample, &mut sampler);
            if sample.pdf > 0.0 {
                assert_abs_diff_eq!(light.pdf(&sample), sample.pdf, epsilon = 1e-3);
                break;
            }
        }
    }

    #[test]
    fn eval_is_one_sided() {
        let light = test_light();
        let mut sample = LightSample::new(Point3::zeros());
        sample.p = Point3::new(0.0, 4.0, 0.0);
        sample.n = crate::math::Normal::new(0.0, -1.0, 0.0);
        sample.wi = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(light.eval(&sample), Spectrum::from(3.0));
        sample.n = crate::math::Normal::new(0.0, 1.0, 0.0);
        assert!(light.eval(&sample).is_black());
    }
}
