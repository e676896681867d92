use super::Integrator;
use crate::{
    bsdfs::{cos_theta, Bsdf, BsdfSample, Measure},
    interaction::Intersection,
    lights::LightSample,
    math::{Ray, Spectrum, Vec3},
    sampling::{power_heuristic, Sampler},
    scene::Scene,
};

/// Which importance-sampling strategy the estimator draws from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LightingStrategy {
    /// Draw one emitter sample per pixel sample.
    LightSampled,
    /// Draw one BSDF sample and pick up emitters it happens to hit.
    BsdfSampled,
    /// Both, combined with the power heuristic.
    Mis,
}

/// Single-bounce direct lighting.
pub struct DirectLighting {
    strategy: LightingStrategy,
}

impl DirectLighting {
    pub fn new(strategy: LightingStrategy) -> Self {
        Self { strategy }
    }
}

impl Integrator for DirectLighting {
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: Ray) -> Spectrum {
        let its = match scene.intersect(ray) {
            Some(its) => its,
            None => return scene.eval_env(ray),
        };

        let mut l = emitted(scene, ray, &its);

        let bsdf = scene.primitives[its.primitive].bsdf.as_ref();
        let wi_local = its.to_local(-ray.d);
        let mis = self.strategy == LightingStrategy::Mis;

        if self.strategy != LightingStrategy::BsdfSampled {
            l += light_sampled_term(scene, sampler, &its, wi_local, bsdf, mis);
        }
        if self.strategy != LightingStrategy::LightSampled {
            l += bsdf_sampled_term(scene, sampler, &its, wi_local, bsdf, mis);
        }

        l
    }
}

/// Emission from the hit surface itself toward the ray origin.
pub fn emitted(scene: &Scene, ray: Ray, its: &Intersection) -> Spectrum {
    match scene.primitives[its.primitive].light {
        Some(light_index) => {
            let mut sample = LightSample::new(ray.o);
            sample.p = its.p;
            sample.n = its.n;
            sample.wi = ray.d;
            sample.dist = its.t;
            sample.light = light_index;
            scene.light(light_index).eval(&sample)
        }
        None => Spectrum::zeros(),
    }
}

/// One light-sampled direct lighting term. With `mis` the contribution is
/// weighted against the BSDF strategy's density for the same direction.
pub fn light_sampled_term(
    scene: &Scene,
    sampler: &mut dyn Sampler,
    its: &Intersection,
    wi_local: Vec3,
    bsdf: &dyn Bsdf,
    mis: bool,
) -> Spectrum {
    let mut light_sample = LightSample::new(its.p);
    let radiance = scene.sample_light(its, sampler, &mut light_sample);
    if radiance.is_black() {
        return Spectrum::zeros();
    }
    if scene.intersect_p(light_sample.shadow_ray()) {
        return Spectrum::zeros();
    }

    let bsdf_sample = BsdfSample::with_pair(wi_local, its.to_local(light_sample.wi));
    let f = bsdf.eval(&bsdf_sample);
    if f.is_black() {
        return Spectrum::zeros();
    }

    let contribution = radiance * f * cos_theta(bsdf_sample.wo);
    if !mis {
        return contribution;
    }

    // A delta emitter can't be hit by BSDF sampling so its opposing density
    // is zero, collapsing the weight to one
    let opposing_pdf = if scene.light(light_sample.light).is_delta() {
        0.0
    } else {
        bsdf.pdf(&bsdf_sample)
    };
    contribution * power_heuristic(light_sample.pdf * scene.light_pdf(), opposing_pdf)
}

/// One BSDF-sampled direct lighting term, following the sampled direction to
/// an emitter or out to the environment. With `mis` the contribution is
/// weighted against the light strategy's density for the same direction.
pub fn bsdf_sampled_term(
    scene: &Scene,
    sampler: &mut dyn Sampler,
    its: &Intersection,
    wi_local: Vec3,
    bsdf: &dyn Bsdf,
    mis: bool,
) -> Spectrum {
    let mut bsdf_sample = BsdfSample::new(wi_local);
    let weight = bsdf.sample(&mut bsdf_sample, sampler);
    if weight.is_black() {
        return Spectrum::zeros();
    }

    let next_ray = its.spawn_ray(its.to_world(bsdf_sample.wo));
    match scene.intersect(next_ray) {
        Some(hit) => {
            let light_index = match scene.primitives[hit.primitive].light {
                Some(index) => index,
                None => return Spectrum::zeros(),
            };
            let light = scene.light(light_index);

            let mut light_sample = LightSample::new(its.p);
            light_sample.p = hit.p;
            light_sample.n = hit.n;
            light_sample.wi = next_ray.d;
            light_sample.dist = hit.t;
            light_sample.light = light_index;

            let le = light.eval(&light_sample);
            if le.is_black() {
                return Spectrum::zeros();
            }
            if !mis {
                return weight * le;
            }

            // A delta lobe can't be hit by light sampling
            let opposing_pdf = if bsdf_sample.measure == Measure::Discrete {
                0.0
            } else {
                light.pdf(&light_sample) * scene.light_pdf()
            };
            weight * le * power_heuristic(bsdf_sample.pdf, opposing_pdf)
        }
        None => {
            let le = scene.eval_env(next_ray);
            if le.is_black() {
                return Spectrum::zeros();
            }
            if !mis {
                return weight * le;
            }

            let opposing_pdf = match scene.environment() {
                Some(env_index) if bsdf_sample.measure != Measure::Discrete => {
                    let mut light_sample = LightSample::new(its.p);
                    light_sample.wi = next_ray.d;
                    scene.light(env_index).pdf(&light_sample) * scene.light_pdf()
                }
                _ => 0.0,
            };
            weight * le * power_heuristic(bsdf_sample.pdf, opposing_pdf)
        }
    }
}
