use super::{normal::Normal, vector::Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Vectors.html#CoordinateSystemfromaVector

/// An orthonormal shading frame with `n` mapped to the local +z axis.
#[derive(Copy, Clone, Debug)]
pub struct Frame {
    pub s: Vec3,
    pub t: Vec3,
    pub n: Normal,
}

impl Frame {
    /// Builds a frame around `n`, which is expected to be normalized.
    pub fn from_normal(n: Normal) -> Self {
        let nv = Vec3::from(n);
        let s = if n.x.abs() > n.y.abs() {
            Vec3::new(-n.z, 0.0, n.x) / (n.x * n.x + n.z * n.z).sqrt()
        } else {
            Vec3::new(0.0, n.z, -n.y) / (n.y * n.y + n.z * n.z).sqrt()
        };
        let t = nv.cross(s);
        Self { s, t, n }
    }

    pub fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.s), v.dot(self.t), v.dot_n(self.n))
    }

    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.s * v.x + self.t * v.y + Vec3::from(self.n) * v.z
    }
}
