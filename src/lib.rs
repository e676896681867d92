#[macro_use]
mod macros;

pub mod bsdfs;
pub mod camera;
pub mod film;
pub mod integrators;
pub mod interaction;
pub mod lights;
pub mod logging;
pub mod math;
pub mod params;
pub mod renderer;
pub mod sampling;
pub mod scene;
pub mod shapes;
