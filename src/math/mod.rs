mod bounds;
mod common;
mod frame;
mod normal;
mod point;
mod ray;
mod spectrum;
mod vector;

pub use bounds::Bounds2;
pub use common::ValueType;
pub use frame::Frame;
pub use normal::Normal;
pub use point::{Point2, Point3};
pub use ray::{Ray, RAY_EPSILON};
pub use spectrum::Spectrum;
pub use vector::{Vec2, Vec3};

pub const INV_PI: f32 = std::f32::consts::FRAC_1_PI;
pub const INV_2_PI: f32 = 0.159_154_94;
pub const INV_4_PI: f32 = 0.079_577_47;
