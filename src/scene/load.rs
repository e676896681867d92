use std::{collections::HashMap, path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

use super::{Primitive, Result, Scene};
use crate::{
    bsdfs::create_bsdf,
    camera::CameraParameters,
    lights::{create_light, AreaLight, Environment, Light},
    math::{Point3, Spectrum, Vec3},
    params::{ParamSet, ParamValue},
    shapes::{Shape, Sphere},
};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SceneLoadSettings {
    pub path: PathBuf,
}

#[derive(Deserialize)]
struct SceneDesc {
    camera: CameraDesc,
    #[serde(default)]
    primitives: Vec<PrimitiveDesc>,
    #[serde(default)]
    lights: Vec<FactoryDesc>,
}

#[derive(Deserialize)]
struct CameraDesc {
    position: [f32; 3],
    target: [f32; 3],
    #[serde(default = "default_up")]
    up: [f32; 3],
    #[serde(default = "default_fov")]
    fov: f32,
}

fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_fov() -> f32 {
    60.0
}

#[derive(Deserialize)]
struct PrimitiveDesc {
    shape: ShapeDesc,
    #[serde(default)]
    bsdf: Option<FactoryDesc>,
    /// Uniform emitted radiance; present marks the primitive as an area light.
    #[serde(default)]
    emission: Option<[f32; 3]>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ShapeDesc {
    Sphere { center: [f32; 3], radius: f32 },
}

/// A factory invocation: type tag plus free-form parameters.
#[derive(Deserialize)]
struct FactoryDesc {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(flatten)]
    params: HashMap<String, ParamValue>,
}

pub fn load(settings: &SceneLoadSettings) -> Result<Scene> {
    let text = std::fs::read_to_string(&settings.path)?;
    from_yaml(&text)
}

pub fn from_yaml(text: &str) -> Result<Scene> {
    let desc: SceneDesc = serde_yaml::from_str(text)?;

    let camera_params = CameraParameters {
        position: Point3::new(
            desc.camera.position[0],
            desc.camera.position[1],
            desc.camera.position[2],
        ),
        target: Point3::new(
            desc.camera.target[0],
            desc.camera.target[1],
            desc.camera.target[2],
        ),
        up: Vec3::new(desc.camera.up[0], desc.camera.up[1], desc.camera.up[2]),
        fov: desc.camera.fov,
    };

    let mut lights = Vec::new();
    let mut environment = None;
    for light_desc in desc.lights {
        let params = ParamSet::from(light_desc.params);
        if light_desc.type_name == "environment" {
            let env = Arc::new(Environment::new(
                params.spectrum("radiance", Spectrum::ones()),
            ));
            environment = Some((lights.len(), Arc::clone(&env)));
            lights.push(env as Arc<dyn Light>);
        } else {
            lights.push(create_light(&light_desc.type_name, &params));
        }
    }

    let mut primitives = Vec::new();
    for primitive_desc in desc.primitives {
        let shape: Arc<dyn Shape> = match primitive_desc.shape {
            ShapeDesc::Sphere { center, radius } => Arc::new(Sphere::new(
                Point3::new(center[0], center[1], center[2]),
                radius,
            )),
        };

        let bsdf = match primitive_desc.bsdf {
            Some(bsdf_desc) => {
                create_bsdf(&bsdf_desc.type_name, &ParamSet::from(bsdf_desc.params))
            }
            None => create_bsdf("lambertian", &ParamSet::new()),
        };

        let light = primitive_desc.emission.map(|emission| {
            lights.push(Arc::new(AreaLight::new(
                Arc::clone(&shape),
                Spectrum::new(emission[0], emission[1], emission[2]),
            )) as Arc<dyn Light>);
            lights.len() - 1
        });

        primitives.push(Primitive { shape, bsdf, light });
    }

    Ok(Scene::new(camera_params, primitives, lights, environment))
}
