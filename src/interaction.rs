use crate::math::{Frame, Normal, Point2, Point3, Ray, Vec3};

/// A ray-surface hit with the local shading geometry resolved.
///
/// `primitive` is a non-owning index into the scene's primitive list and
/// resolves to the surface's BSDF and optional emitter.
#[derive(Copy, Clone, Debug)]
pub struct Intersection {
    pub t: f32,
    pub p: Point3,
    pub n: Normal,
    pub uv: Point2<f32>,
    pub frame: Frame,
    pub primitive: usize,
}

impl Intersection {
    pub fn new(t: f32, p: Point3, n: Normal, uv: Point2<f32>, primitive: usize) -> Self {
        Self {
            t,
            p,
            n,
            uv,
            frame: Frame::from_normal(n),
            primitive,
        }
    }

    pub fn to_local(&self, v: Vec3) -> Vec3 {
        self.frame.to_local(v)
    }

    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.frame.to_world(v)
    }

    /// Continues the path from the hit point along `d`.
    ///
    /// The epsilon floor in [`Ray::new`] shields against self-intersection.
    pub fn spawn_ray(&self, d: Vec3) -> Ray {
        Ray::new(self.p, d)
    }
}
