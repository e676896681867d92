mod ao;
mod direct;
mod normals;
mod path;

pub use ao::AmbientOcclusion;
pub use direct::{DirectLighting, LightingStrategy};
pub use normals::Normals;
pub use path::{MisPathTracer, PathTracer};

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use crate::{
    camera::{Camera, CameraSample},
    film::FilmTile,
    math::{Point2, Ray, Spectrum, Vec2},
    params::ParamSet,
    sampling::Sampler,
    scene::Scene,
};

pub type AoParams = ao::Params;

#[derive(Copy, Clone, Debug, Deserialize, Serialize, Display, EnumVariantNames, EnumString)]
pub enum IntegratorType {
    Normals,
    AmbientOcclusion(ao::Params),
    EmsDirect,
    MatsDirect,
    MisDirect,
    Path,
    MisPath,
}

impl IntegratorType {
    pub fn instantiate(self) -> Box<dyn Integrator> {
        match self {
            IntegratorType::Normals => Box::new(Normals {}),
            IntegratorType::AmbientOcclusion(params) => Box::new(AmbientOcclusion::new(params)),
            IntegratorType::EmsDirect => {
                Box::new(DirectLighting::new(LightingStrategy::LightSampled))
            }
            IntegratorType::MatsDirect => {
                Box::new(DirectLighting::new(LightingStrategy::BsdfSampled))
            }
            IntegratorType::MisDirect => Box::new(DirectLighting::new(LightingStrategy::Mis)),
            IntegratorType::Path => Box::new(PathTracer {}),
            IntegratorType::MisPath => Box::new(MisPathTracer {}),
        }
    }
}

impl Default for IntegratorType {
    fn default() -> Self {
        IntegratorType::Normals
    }
}

/// Builds an integrator from a type name and named parameters.
///
/// Unknown names fail open to the normals debug integrator with a warning.
pub fn create_integrator(type_name: &str, params: &ParamSet) -> Box<dyn Integrator> {
    let integrator_type = IntegratorType::from_str(type_name).unwrap_or_else(|_| {
        vermeer_warn!(
            "Unknown integrator type '{}', substituting Normals",
            type_name
        );
        IntegratorType::Normals
    });

    match integrator_type {
        IntegratorType::AmbientOcclusion(defaults) => {
            IntegratorType::AmbientOcclusion(ao::Params {
                ray_length: params.float("ray_length", defaults.ray_length),
            })
        }
        other => other,
    }
    .instantiate()
}

/// Public interface for scene integrators.
pub trait Integrator: Send + Sync {
    /// One-time setup against a loaded scene.
    fn preprocess(&mut self, _scene: &Scene) {}

    /// Evaluates the incoming radiance along `ray`.
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: Ray) -> Spectrum;

    /// Renders one progressive sample pass into `tile`, one sample per pixel
    /// at the tile's pass index. Returns `false` if the early termination
    /// predicate cut the pass short, in which case the tile contents must be
    /// discarded.
    fn render(
        &self,
        scene: &Scene,
        camera: &Camera,
        sampler: &Arc<dyn Sampler>,
        tile: &mut FilmTile,
        early_termination: &mut dyn FnMut() -> bool,
    ) -> bool {
        let tile_width = tile.bb.width();

        // Seed from the tile corner so results are deterministic regardless
        // of which worker picks up which tile
        let corner = tile.bb.p_min;
        let mut sampler = sampler.clone_seeded(((corner.y as u64) << 16) | (corner.x as u64));

        for p in tile.bb {
            if early_termination() {
                return false;
            }

            sampler.start_pixel_sample(p, tile.sample);

            let offset = sampler.next_2d();
            let p_film = Point2::new(p.x as f32 + offset.x, p.y as f32 + offset.y);
            let ray = camera.ray(&CameraSample { p_film });

            let color = self.li(scene, sampler.as_mut(), ray);

            let Vec2 {
                x: tile_x,
                y: tile_y,
            } = p - tile.bb.p_min;
            let pixel_offset = (tile_y * tile_width + tile_x) as usize;
            tile.pixels[pixel_offset] = color;
        }
        true
    }
}
