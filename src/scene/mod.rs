mod load;

pub use load::SceneLoadSettings;

use std::sync::Arc;

use crate::{
    bsdfs::Bsdf,
    camera::CameraParameters,
    interaction::Intersection,
    lights::{Environment, Light, LightSample},
    math::{Ray, Spectrum},
    sampling::Sampler,
    shapes::Shape,
};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// A scene surface: geometry plus its scattering model and optional emitter.
///
/// `light` is an index into the scene's light list; the primitive does not
/// own its emitter so the light can also be drawn through light sampling.
pub struct Primitive {
    pub shape: Arc<dyn Shape>,
    pub bsdf: Arc<dyn Bsdf>,
    pub light: Option<usize>,
}

/// A renderable scene with linear intersection over analytic shapes.
pub struct Scene {
    pub camera_params: CameraParameters,
    pub primitives: Vec<Primitive>,
    pub lights: Vec<Arc<dyn Light>>,
    // The dome is also in `lights` at this index for direct sampling
    environment: Option<(usize, Arc<Environment>)>,
}

impl Scene {
    pub fn new(
        camera_params: CameraParameters,
        primitives: Vec<Primitive>,
        lights: Vec<Arc<dyn Light>>,
        environment: Option<(usize, Arc<Environment>)>,
    ) -> Self {
        Self {
            camera_params,
            primitives,
            lights,
            environment,
        }
    }

    /// Loads a scene from the YAML description at `settings.path`.
    pub fn load(settings: &SceneLoadSettings) -> Result<Scene> {
        load::load(settings)
    }

    /// Returns the nearest surface hit within the ray's span.
    pub fn intersect(&self, mut ray: Ray) -> Option<Intersection> {
        let mut hit = None;
        for (index, primitive) in self.primitives.iter().enumerate() {
            if let Some(surface) = primitive.shape.intersect(ray) {
                // Narrow the span so later primitives only report closer hits
                ray.t_max = surface.t;
                hit = Some(Intersection::new(
                    surface.t,
                    surface.p,
                    surface.n,
                    surface.uv,
                    index,
                ));
            }
        }
        hit
    }

    /// Occlusion-only test, cheaper than a full intersection.
    pub fn intersect_p(&self, ray: Ray) -> bool {
        self.primitives
            .iter()
            .any(|primitive| primitive.shape.intersect_p(ray))
    }

    /// Draws one emitter uniformly and samples it toward `its`, returning
    /// incident radiance pre-divided by the joint selection and direction
    /// density.
    pub fn sample_light(
        &self,
        its: &Intersection,
        sampler: &mut dyn Sampler,
        sample: &mut LightSample,
    ) -> Spectrum {
        if self.lights.is_empty() {
            return Spectrum::zeros();
        }

        let index = ((sampler.next_1d() * self.lights.len() as f32) as usize)
            .min(self.lights.len() - 1);
        sample.ref_p = its.p;
        sample.light = index;

        let radiance = self.lights[index].sample(sample, sampler);
        if sample.pdf == 0.0 {
            return Spectrum::zeros();
        }
        radiance / self.light_pdf()
    }

    /// Probability of any single emitter being drawn by
    /// [`Scene::sample_light`].
    pub fn light_pdf(&self) -> f32 {
        if self.lights.is_empty() {
            0.0
        } else {
            1.0 / self.lights.len() as f32
        }
    }

    pub fn light(&self, index: usize) -> &dyn Light {
        self.lights[index].as_ref()
    }

    /// Radiance from the environment dome along an escaping ray.
    pub fn eval_env(&self, ray: Ray) -> Spectrum {
        match &self.environment {
            Some((_, env)) => env.le(ray),
            None => Spectrum::zeros(),
        }
    }

    /// The environment dome's index in the light list, if the scene has one.
    pub fn environment(&self) -> Option<usize> {
        self.environment.as_ref().map(|(index, _)| *index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bsdfs::Lambertian,
        math::{Point3, Vec3},
        sampling::IndependentSampler,
        shapes::Sphere,
    };

    fn two_sphere_scene() -> Scene {
        let bsdf: Arc<dyn Bsdf> = Arc::new(Lambertian::new(Spectrum::from(0.5)));
        Scene::new(
            CameraParameters::default(),
            vec![
                Primitive {
                    shape: Arc::new(Sphere::new(Point3::new(0.0, 0.0, -5.0), 1.0)),
                    bsdf: Arc::clone(&bsdf),
                    light: None,
                },
                Primitive {
                    shape: Arc::new(Sphere::new(Point3::new(0.0, 0.0, -10.0), 1.0)),
                    bsdf,
                    light: None,
                },
            ],
            Vec::new(),
            None,
        )
    }

    #[test]
    fn nearest_hit_wins() {
        let scene = two_sphere_scene();
        let ray = Ray::new(Point3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let its = scene.intersect(ray).unwrap();
        assert_eq!(its.primitive, 0);
        assert!((its.t - 4.0).abs() < 1e-3);
    }

    #[test]
    fn shadow_test_sees_any_occluder() {
        let scene = two_sphere_scene();
        let ray = Ray::new(Point3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        assert!(scene.intersect_p(ray));
        let miss = Ray::new(Point3::zeros(), Vec3::new(0.0, 1.0, 0.0));
        assert!(!scene.intersect_p(miss));
    }

    #[test]
    fn lightless_scene_samples_nothing() {
        let scene = two_sphere_scene();
        let mut sampler = IndependentSampler::with_seed(1, 1);
        let ray = Ray::new(Point3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let its = scene.intersect(ray).unwrap();
        let mut sample = LightSample::new(its.p);
        assert!(scene
            .sample_light(&its, &mut sampler, &mut sample)
            .is_black());
        assert_eq!(scene.light_pdf(), 0.0);
    }
}
