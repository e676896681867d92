use super::{common::ValueType, point::Point2};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Bounding_Boxes.html

/// An axis-aligned 2d region, `p_min` inclusive, `p_max` exclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds2<T>
where
    T: ValueType,
{
    pub p_min: Point2<T>,
    pub p_max: Point2<T>,
}

impl<T> Bounds2<T>
where
    T: ValueType,
{
    pub fn new(p_min: Point2<T>, p_max: Point2<T>) -> Self {
        Self { p_min, p_max }
    }

    pub fn width(&self) -> T {
        self.p_max.x - self.p_min.x
    }

    pub fn height(&self) -> T {
        self.p_max.y - self.p_min.y
    }

    pub fn area(&self) -> T {
        self.width() * self.height()
    }
}

/// Row-major iterator over the pixel coordinates in a [Bounds2].
pub struct Bounds2Iter {
    bb: Bounds2<u16>,
    p: Point2<u16>,
}

impl IntoIterator for Bounds2<u16> {
    type Item = Point2<u16>;
    type IntoIter = Bounds2Iter;

    fn into_iter(self) -> Bounds2Iter {
        Bounds2Iter {
            bb: self,
            p: self.p_min,
        }
    }
}

impl Iterator for Bounds2Iter {
    type Item = Point2<u16>;

    fn next(&mut self) -> Option<Point2<u16>> {
        if self.p.y >= self.bb.p_max.y {
            return None;
        }
        let ret = self.p;
        self.p.x += 1;
        if self.p.x >= self.bb.p_max.x {
            self.p.x = self.bb.p_min.x;
            self.p.y += 1;
        }
        Some(ret)
    }
}
