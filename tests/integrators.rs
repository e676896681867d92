use std::sync::Arc;

use approx::assert_abs_diff_eq;

use vermeer::{
    bsdfs::{Bsdf, Lambertian},
    camera::CameraParameters,
    integrators::{
        AmbientOcclusion, AoParams, DirectLighting, Integrator, LightingStrategy, MisPathTracer,
        PathTracer,
    },
    lights::{AreaLight, Environment, Light, PointLight},
    math::{Point2, Point3, Ray, Spectrum, Vec3, INV_4_PI, INV_PI},
    sampling::{IndependentSampler, Sampler},
    scene::{Primitive, Scene},
    shapes::{Shape, Sphere},
};

fn lambertian(albedo: f32) -> Arc<dyn Bsdf> {
    Arc::new(Lambertian::new(Spectrum::from(albedo)))
}

/// Camera ray down the z axis, hitting an origin-centered unit sphere at
/// (0, 0, 1) head on.
fn probe_ray() -> Ray {
    Ray::new(Point3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0))
}

fn average_li(integrator: &dyn Integrator, scene: &Scene, seed: u64, n: usize) -> Spectrum {
    let mut sampler = IndependentSampler::with_seed(1, seed);
    let mut sum = Spectrum::zeros();
    for _ in 0..n {
        sum += integrator.li(scene, &mut sampler, probe_ray());
    }
    sum / n as f32
}

#[test]
fn light_sampled_direct_matches_the_closed_form() {
    // Unit sphere lit head on by a point light: the estimator is
    // deterministic and should equal albedo/pi * power/(4 pi d^2)
    let albedo = 0.6;
    let power = Spectrum::from(40.0);
    let scene = Scene::new(
        CameraParameters::default(),
        vec![Primitive {
            shape: Arc::new(Sphere::new(Point3::zeros(), 1.0)),
            bsdf: lambertian(albedo),
            light: None,
        }],
        vec![Arc::new(PointLight::new(Point3::new(0.0, 0.0, 5.0), power)) as Arc<dyn Light>],
        None,
    );

    // Hit at (0, 0, 1), light 4 units straight up the normal
    let expected = power * INV_4_PI / 16.0 * (albedo * INV_PI);

    let integrator = DirectLighting::new(LightingStrategy::LightSampled);
    let mut sampler = IndependentSampler::with_seed(1, 0xE5);
    for _ in 0..16 {
        let li = integrator.li(&scene, &mut sampler, probe_ray());
        assert_abs_diff_eq!(li, expected, epsilon = 1e-5);
    }
}

#[test]
fn ambient_occlusion_extremes() {
    let sphere = Primitive {
        shape: Arc::new(Sphere::new(Point3::zeros(), 1.0)),
        bsdf: lambertian(0.5),
        light: None,
    };
    let integrator = AmbientOcclusion::new(AoParams::default());

    // A lone convex surface never occludes itself
    let open = Scene::new(CameraParameters::default(), vec![sphere], Vec::new(), None);
    let mut sampler = IndependentSampler::with_seed(1, 0xA0);
    for _ in 0..64 {
        let li = integrator.li(&open, &mut sampler, probe_ray());
        assert_eq!(li, Spectrum::ones());
    }

    // Enclosed by a larger sphere every occlusion ray is blocked
    let enclosed = Scene::new(
        CameraParameters::default(),
        vec![
            Primitive {
                shape: Arc::new(Sphere::new(Point3::zeros(), 1.0)),
                bsdf: lambertian(0.5),
                light: None,
            },
            Primitive {
                shape: Arc::new(Sphere::new(Point3::zeros(), 10.0)),
                bsdf: lambertian(0.5),
                light: None,
            },
        ],
        Vec::new(),
        None,
    );
    for _ in 0..64 {
        let li = integrator.li(&enclosed, &mut sampler, probe_ray());
        assert_eq!(li, Spectrum::zeros());
    }
}

#[test]
fn direct_strategies_agree_on_an_area_light() {
    // Light sampling, BSDF sampling and their MIS combination estimate the
    // same integral so their MC means must converge to the same value
    let emitter_shape = Arc::new(Sphere::new(Point3::new(0.0, 0.0, 4.0), 0.5));
    let radiance = Spectrum::from(5.0);
    let scene = Scene::new(
        CameraParameters::default(),
        vec![
            Primitive {
                shape: Arc::new(Sphere::new(Point3::zeros(), 1.0)),
                bsdf: lambertian(0.5),
                light: None,
            },
            Primitive {
                shape: Arc::clone(&emitter_shape) as Arc<dyn Shape>,
                bsdf: lambertian(0.0),
                light: Some(0),
            },
        ],
        vec![Arc::new(AreaLight::new(emitter_shape, radiance)) as Arc<dyn Light>],
        None,
    );

    let n = 200_000;
    let ems = average_li(
        &DirectLighting::new(LightingStrategy::LightSampled),
        &scene,
        0xD1,
        n,
    );
    let mats = average_li(
        &DirectLighting::new(LightingStrategy::BsdfSampled),
        &scene,
        0xD2,
        n,
    );
    let mis = average_li(&DirectLighting::new(LightingStrategy::Mis), &scene, 0xD3, n);

    // BSDF sampling hits the small emitter rarely, so its mean is the
    // noisiest of the three
    assert!(!ems.is_black());
    assert_abs_diff_eq!(ems.r, mats.r, epsilon = 0.05 * ems.r);
    assert_abs_diff_eq!(ems.r, mis.r, epsilon = 0.03 * ems.r);
}

#[test]
fn convex_surface_in_a_furnace_reflects_its_albedo() {
    // A convex lambertian body under a uniform dome: every scattered ray
    // escapes, so the reflected radiance is exactly albedo * dome radiance
    let albedo = 0.8;
    let env = Arc::new(Environment::new(Spectrum::ones()));
    let scene = Scene::new(
        CameraParameters::default(),
        vec![Primitive {
            shape: Arc::new(Sphere::new(Point3::zeros(), 1.0)),
            bsdf: lambertian(albedo),
            light: None,
        }],
        vec![Arc::clone(&env) as Arc<dyn Light>],
        Some((0, env)),
    );

    // BSDF-only path tracing is deterministic here: one bounce, then the
    // continuation escapes into the dome
    let path = average_li(&PathTracer {}, &scene, 0xF1, 64);
    assert_abs_diff_eq!(path, Spectrum::from(albedo), epsilon = 1e-4);

    // The MIS tracer splits the same energy between both strategies
    let mis_path = average_li(&MisPathTracer {}, &scene, 0xF2, 50_000);
    assert_abs_diff_eq!(mis_path.r, albedo, epsilon = 0.01);
}

/// Fixed-value sampler that tallies how many draws each estimator hook
/// consumed.
#[derive(Default)]
struct TallySampler {
    bsdf_draws: u32,
    roulette_draws: u32,
}

impl Sampler for TallySampler {
    fn clone_seeded(&self, _seed: u64) -> Box<dyn Sampler> {
        Box::new(Self::default())
    }

    fn samples_per_pixel(&self) -> u32 {
        1
    }

    fn start_pixel_sample(&mut self, _p: Point2<u16>, _sample: u32) {}

    fn next_1d(&mut self) -> f32 {
        self.roulette_draws += 1;
        0.9
    }

    fn next_2d(&mut self) -> Point2<f32> {
        self.bsdf_draws += 1;
        // Cosine hemisphere sampling maps this to the surface normal
        Point2::new(0.5, 0.5)
    }
}

#[test]
fn roulette_starts_after_the_fifth_bounce() {
    // Two facing spheres ping-pong the path along the axis: every bounce
    // leaves along the normal and lands on the other sphere, so the path
    // only ends when roulette cuts it
    let scene = Scene::new(
        CameraParameters::default(),
        vec![
            Primitive {
                shape: Arc::new(Sphere::new(Point3::zeros(), 1.0)),
                bsdf: lambertian(0.5),
                light: None,
            },
            Primitive {
                shape: Arc::new(Sphere::new(Point3::new(0.0, 0.0, 4.0), 1.0)),
                bsdf: lambertian(0.5),
                light: None,
            },
        ],
        Vec::new(),
        None,
    );

    let mut sampler = TallySampler::default();
    let l = PathTracer {}.li(&scene, &mut sampler, probe_ray());
    assert!(l.is_black());

    // Five bounces at throughput 0.5^k before the first roulette draw,
    // which terminates since 0.9 < 1 - 0.5^5
    assert_eq!(sampler.bsdf_draws, 5);
    assert_eq!(sampler.roulette_draws, 1);
}

#[test]
fn directly_visible_emitter_reads_its_radiance() {
    // A black-bodied emitter seen straight on contributes exactly its
    // radiance under every strategy
    let emitter_shape = Arc::new(Sphere::new(Point3::zeros(), 1.0));
    let radiance = Spectrum::new(2.0, 3.0, 4.0);
    let scene = Scene::new(
        CameraParameters::default(),
        vec![Primitive {
            shape: Arc::clone(&emitter_shape) as Arc<dyn Shape>,
            bsdf: lambertian(0.0),
            light: Some(0),
        }],
        vec![Arc::new(AreaLight::new(emitter_shape, radiance)) as Arc<dyn Light>],
        None,
    );

    let strategies: Vec<Box<dyn Integrator>> = vec![
        Box::new(DirectLighting::new(LightingStrategy::LightSampled)),
        Box::new(DirectLighting::new(LightingStrategy::BsdfSampled)),
        Box::new(DirectLighting::new(LightingStrategy::Mis)),
        Box::new(PathTracer {}),
        Box::new(MisPathTracer {}),
    ];
    let mut sampler = IndependentSampler::with_seed(1, 0xEE);
    for integrator in &strategies {
        let li = integrator.li(&scene, &mut sampler, probe_ray());
        assert_abs_diff_eq!(li, radiance, epsilon = 1e-4);
    }
}
