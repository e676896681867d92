mod sphere;

pub use sphere::Sphere;

use crate::math::{Normal, Point2, Point3, Ray};

/// A point drawn from a shape's surface under the area measure.
#[derive(Copy, Clone, Debug)]
pub struct ShapeSample {
    pub p: Point3,
    pub n: Normal,
    /// Density under the area measure.
    pub pdf: f32,
}

/// A raw geometric hit before the owning primitive is resolved.
#[derive(Copy, Clone, Debug)]
pub struct SurfaceHit {
    pub t: f32,
    pub p: Point3,
    pub n: Normal,
    pub uv: Point2<f32>,
}

/// Analytic scene geometry.
pub trait Shape: Send + Sync {
    /// Returns the nearest hit within the ray's `[t_min, t_max]` span.
    fn intersect(&self, ray: Ray) -> Option<SurfaceHit>;

    /// Occlusion-only test, cheaper than a full intersection.
    fn intersect_p(&self, ray: Ray) -> bool {
        self.intersect(ray).is_some()
    }

    /// Draws a point uniformly from the surface.
    fn sample_surface(&self, u: Point2<f32>) -> ShapeSample;

    /// Density of [`Shape::sample_surface`] under the area measure.
    fn pdf_surface(&self) -> f32 {
        1.0 / self.area()
    }

    fn area(&self) -> f32;
}
