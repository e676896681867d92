use super::{point::Point3, vector::Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Rays.html

/// Offset applied to secondary ray origins to shield against self-intersection.
pub const RAY_EPSILON: f32 = 1e-4;

/// A ray with a valid parametric interval `[t_min, t_max]`.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub o: Point3,
    pub d: Vec3,
    pub t_min: f32,
    pub t_max: f32,
}

impl Ray {
    /// Creates a ray with the default `[RAY_EPSILON, inf)` interval.
    pub fn new(o: Point3, d: Vec3) -> Self {
        Self {
            o,
            d,
            t_min: RAY_EPSILON,
            t_max: f32::INFINITY,
        }
    }

    pub fn spanning(o: Point3, d: Vec3, t_min: f32, t_max: f32) -> Self {
        Self { o, d, t_min, t_max }
    }

    pub fn point(&self, t: f32) -> Point3 {
        self.o + self.d * t
    }
}
