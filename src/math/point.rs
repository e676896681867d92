use std::ops::{Add, Mul, Sub};

use super::{
    common::ValueType,
    vector::{Vec2, Vec3},
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Points.html

/// A two-dimensional point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point2<T>
where
    T: ValueType,
{
    pub x: T,
    pub y: T,
}

impl<T> Point2<T>
where
    T: ValueType,
{
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn zeros() -> Self {
        Self {
            x: T::zero(),
            y: T::zero(),
        }
    }
}

impl<T> Add<Vec2<T>> for Point2<T>
where
    T: ValueType,
{
    type Output = Self;
    fn add(self, v: Vec2<T>) -> Self {
        Self::new(self.x + v.x, self.y + v.y)
    }
}

impl<T> Sub for Point2<T>
where
    T: ValueType,
{
    type Output = Vec2<T>;
    fn sub(self, other: Self) -> Vec2<T> {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl<T> Mul<T> for Point2<T>
where
    T: ValueType,
{
    type Output = Self;
    fn mul(self, s: T) -> Self {
        Self::new(self.x * s, self.y * s)
    }
}

/// A three-dimensional `f32` point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        debug_assert!(!(x.is_nan() || y.is_nan() || z.is_nan()));
        Self { x, y, z }
    }

    pub fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn dist_sqr(self, other: Self) -> f32 {
        (other - self).len_sqr()
    }

    pub fn dist(self, other: Self) -> f32 {
        (other - self).len()
    }
}

impl Add<Vec3> for Point3 {
    type Output = Self;
    fn add(self, v: Vec3) -> Self {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl Sub<Vec3> for Point3 {
    type Output = Self;
    fn sub(self, v: Vec3) -> Self {
        Self::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl Sub for Point3 {
    type Output = Vec3;
    fn sub(self, other: Self) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}
