use super::{
    direct::{emitted, light_sampled_term},
    Integrator,
};
use crate::{
    bsdfs::{BsdfSample, Measure},
    lights::LightSample,
    math::{Ray, Spectrum},
    sampling::{power_heuristic, Sampler},
    scene::Scene,
};

// Bounces before Russian roulette starts cutting paths
const MIN_BOUNCES: u32 = 5;

/// Terminates with probability `1 - min(max(T), 0.99)` and compensates the
/// survivors so the estimator stays unbiased. Returns `false` on
/// termination.
fn russian_roulette(throughput: &mut Spectrum, sampler: &mut dyn Sampler) -> bool {
    let q = 1.0 - throughput.max_component().min(0.99);
    if sampler.next_1d() < q {
        return false;
    }
    *throughput /= 1.0 - q;
    true
}

/// Unidirectional path tracer with BSDF-sampled continuation only.
///
/// Emitters contribute when a path happens to hit them, which keeps the
/// estimator simple but noisy for small lights.
pub struct PathTracer {}

impl Integrator for PathTracer {
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: Ray) -> Spectrum {
        let mut l = Spectrum::zeros();
        let mut throughput = Spectrum::ones();
        let mut ray = ray;
        let mut bounces = 0;

        loop {
            let its = match scene.intersect(ray) {
                Some(its) => its,
                None => {
                    l += throughput * scene.eval_env(ray);
                    break;
                }
            };

            l += throughput * emitted(scene, ray, &its);

            let bsdf = scene.primitives[its.primitive].bsdf.as_ref();
            let mut bsdf_sample = BsdfSample::new(its.to_local(-ray.d));
            let weight = bsdf.sample(&mut bsdf_sample, sampler);
            if weight.is_black() {
                break;
            }
            throughput *= weight;

            ray = its.spawn_ray(its.to_world(bsdf_sample.wo));

            bounces += 1;
            if bounces >= MIN_BOUNCES && !russian_roulette(&mut throughput, sampler) {
                break;
            }
        }

        l
    }
}

/// Path tracer with per-bounce MIS-weighted light sampling.
///
/// Directly visible emission is weighted against the light strategy except
/// right after a delta bounce, where light sampling could not have reached
/// the emitter and the full weight applies.
pub struct MisPathTracer {}

impl Integrator for MisPathTracer {
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: Ray) -> Spectrum {
        let mut l = Spectrum::zeros();
        let mut throughput = Spectrum::ones();
        let mut ray = ray;
        let mut bounces = 0;
        // The camera ray counts as a delta bounce: nothing could have light
        // sampled what it sees directly
        let mut last_delta = true;
        let mut last_pdf = 0.0;

        loop {
            let its = match scene.intersect(ray) {
                Some(its) => its,
                None => {
                    let le = scene.eval_env(ray);
                    if !le.is_black() {
                        let weight = match scene.environment() {
                            Some(env_index) if !last_delta => {
                                let mut light_sample = LightSample::new(ray.o);
                                light_sample.wi = ray.d;
                                let pdf_light =
                                    scene.light(env_index).pdf(&light_sample) * scene.light_pdf();
                                power_heuristic(last_pdf, pdf_light)
                            }
                            _ => 1.0,
                        };
                        l += throughput * le * weight;
                    }
                    break;
                }
            };

            if let Some(light_index) = scene.primitives[its.primitive].light {
                let mut light_sample = LightSample::new(ray.o);
                light_sample.p = its.p;
                light_sample.n = its.n;
                light_sample.wi = ray.d;
                light_sample.dist = its.t;
                light_sample.light = light_index;

                let light = scene.light(light_index);
                let le = light.eval(&light_sample);
                if !le.is_black() {
                    let weight = if last_delta {
                        1.0
                    } else {
                        power_heuristic(last_pdf, light.pdf(&light_sample) * scene.light_pdf())
                    };
                    l += throughput * le * weight;
                }
            }

            let bsdf = scene.primitives[its.primitive].bsdf.as_ref();
            let wi_local = its.to_local(-ray.d);

            // Delta BSDFs have no light-sampled contribution, their eval is
            // zero everywhere
            if !bsdf.is_delta() {
                l += throughput * light_sampled_term(scene, sampler, &its, wi_local, bsdf, true);
            }

            let mut bsdf_sample = BsdfSample::new(wi_local);
            let weight = bsdf.sample(&mut bsdf_sample, sampler);
            if weight.is_black() {
                break;
            }
            throughput *= weight;
            last_delta = bsdf_sample.measure == Measure::Discrete;
            last_pdf = bsdf_sample.pdf;

            ray = its.spawn_ray(its.to_world(bsdf_sample.wo));

            bounces += 1;
            if bounces >= MIN_BOUNCES && !russian_roulette(&mut throughput, sampler) {
                break;
            }
        }

        l
    }
}
