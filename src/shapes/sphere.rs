use super::{Shape, ShapeSample, SurfaceHit};
use crate::{
    math::{Normal, Point2, Point3, Ray, Vec3},
    sampling::uniform_sample_sphere,
};

pub struct Sphere {
    center: Point3,
    radius: f32,
}

impl Sphere {
    pub fn new(center: Point3, radius: f32) -> Self {
        debug_assert!(radius > 0.0);
        Self { center, radius }
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: Ray) -> Option<SurfaceHit> {
        let oc = ray.o - self.center;
        let a = ray.d.len_sqr();
        let b = 2.0 * oc.dot(ray.d);
        let c = oc.len_sqr() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();

        // Nearer root first, fall back to the far one when the origin is
        // inside the sphere
        let mut t = (-b - root) / (2.0 * a);
        if t < ray.t_min || t > ray.t_max {
            t = (-b + root) / (2.0 * a);
            if t < ray.t_min || t > ray.t_max {
                return None;
            }
        }

        let p = ray.point(t);
        let n = Normal::from((p - self.center) / self.radius).normalized();

        let phi = {
            let phi = n.y.atan2(n.x);
            if phi < 0.0 {
                phi + 2.0 * std::f32::consts::PI
            } else {
                phi
            }
        };
        let theta = n.z.clamp(-1.0, 1.0).acos();
        let uv = Point2::new(
            phi / (2.0 * std::f32::consts::PI),
            theta / std::f32::consts::PI,
        );

        Some(SurfaceHit { t, p, n, uv })
    }

    fn sample_surface(&self, u: Point2<f32>) -> ShapeSample {
        let d = uniform_sample_sphere(u);
        ShapeSample {
            p: self.center + d * self.radius,
            n: Normal::from(d),
            pdf: self.pdf_surface(),
        }
    }

    fn area(&self) -> f32 {
        4.0 * std::f32::consts::PI * self.radius * self.radius
    }
}
