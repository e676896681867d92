use crate::math::{Point2, Point3, Ray, Vec2, Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Camera_Models.html

/// Values needed to specify a camera ray.
pub struct CameraSample {
    /// Sample position in raster coordinates.
    pub p_film: Point2<f32>,
}

#[derive(Copy, Clone, Debug)]
pub struct CameraParameters {
    pub position: Point3,
    pub target: Point3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl Default for CameraParameters {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: 60.0,
        }
    }
}

/// A simple pinhole camera.
///
/// The look-at basis is kept directly instead of a full transform stack
/// since rays are all this crate projects.
#[derive(Clone)]
pub struct Camera {
    position: Point3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    res: Vec2<u16>,
    tan_half_fov: f32,
}

impl Camera {
    pub fn new(params: CameraParameters, res: Vec2<u16>) -> Self {
        let forward = (params.target - params.position).normalized();
        let right = forward.cross(params.up).normalized();
        let up = right.cross(forward);

        Self {
            position: params.position,
            right,
            up,
            forward,
            res,
            tan_half_fov: (params.fov.to_radians() / 2.0).tan(),
        }
    }

    /// Creates a new [Ray] at the camera sample with this `Camera`.
    pub fn ray(&self, sample: &CameraSample) -> Ray {
        let ndc_x = (sample.p_film.x / self.res.x as f32) * 2.0 - 1.0;
        let ndc_y = 1.0 - (sample.p_film.y / self.res.y as f32) * 2.0;
        let aspect = (self.res.x as f32) / (self.res.y as f32);

        let d = self.forward
            + self.right * (ndc_x * aspect * self.tan_half_fov)
            + self.up * (ndc_y * self.tan_half_fov);
        Ray::new(self.position, d.normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn center_ray_looks_at_the_target() {
        let camera = Camera::new(
            CameraParameters {
                position: Point3::new(0.0, 0.0, 5.0),
                target: Point3::zeros(),
                up: Vec3::new(0.0, 1.0, 0.0),
                fov: 90.0,
            },
            Vec2::new(64, 64),
        );
        let ray = camera.ray(&CameraSample {
            p_film: Point2::new(32.0, 32.0),
        });
        assert_abs_diff_eq!(ray.d, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn corner_rays_spread_by_the_fov() {
        let camera = Camera::new(
            CameraParameters {
                position: Point3::zeros(),
                target: Point3::new(0.0, 0.0, -1.0),
                up: Vec3::new(0.0, 1.0, 0.0),
                fov: 90.0,
            },
            Vec2::new(64, 64),
        );
        // Right edge, vertical center: 45 degrees off axis at fov 90
        let ray = camera.ray(&CameraSample {
            p_film: Point2::new(64.0, 32.0),
        });
        assert_abs_diff_eq!(ray.d.x, ray.d.z.abs(), epsilon = 1e-5);
    }
}
