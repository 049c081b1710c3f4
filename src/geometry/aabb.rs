use std::borrow::Borrow;
use std::ops::Sub;

use nalgebra::{ClosedAddAssign, ClosedDivAssign, Point, Scalar};
use num_traits::One;

use super::{Axis, FloatType, WorldBox, WorldPoint};

#[derive(Clone, Debug, PartialEq)]
pub struct AABB<Point> {
    pub min: Point,
    pub max: Point,
}

impl<Point> AABB<Point> {
    pub fn new(min: Point, max: Point) -> AABB<Point> {
        AABB { min, max }
    }

    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> AABB<Point2> {
        AABB {
            min: f(&self.min),
            max: f(&self.max),
        }
    }
}

impl<Point: Sub + Copy> AABB<Point> {
    pub fn size(&self) -> Point::Output {
        self.max - self.min
    }
}

impl<T: Scalar + ClosedAddAssign + ClosedDivAssign + One, const D: usize> AABB<Point<T, D>> {
    pub fn center(&self) -> Point<T, D> {
        let two = T::one() + T::one();
        let avg_coords = (&self.min.coords + &self.max.coords) / two;
        Point::from(avg_coords)
    }
}

impl<Point> From<[Point; 2]> for AABB<Point> {
    fn from(value: [Point; 2]) -> Self {
        let [min, max] = value;
        AABB { min, max }
    }
}

impl<Point> From<(Point, Point)> for AABB<Point> {
    fn from(value: (Point, Point)) -> Self {
        let (min, max) = value;
        AABB { min, max }
    }
}

impl AABB<WorldPoint> {
    /// Zero sized box containing a single point.
    pub fn from_point(point: WorldPoint) -> WorldBox {
        AABB::new(point, point)
    }

    /// Smallest box containing all the points, or None if there are no points.
    pub fn from_points(points: impl IntoIterator<Item = impl Borrow<WorldPoint>>) -> Option<WorldBox> {
        let mut points = points.into_iter();
        let first = WorldBox::from_point(*points.next()?.borrow());
        Some(points.fold(first, |b, p| b.union_point(p.borrow())))
    }

    pub fn union(&self, other: &WorldBox) -> WorldBox {
        AABB {
            min: self.min.coords.inf(&other.min.coords).into(),
            max: self.max.coords.sup(&other.max.coords).into(),
        }
    }

    pub fn union_point(&self, point: &WorldPoint) -> WorldBox {
        AABB {
            min: self.min.coords.inf(&point.coords).into(),
            max: self.max.coords.sup(&point.coords).into(),
        }
    }

    /// Axis with the largest extent, ties go to the first of X, Y, Z.
    pub fn longest_axis(&self) -> Axis {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            Axis::X
        } else if size.y >= size.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    pub fn surface_area(&self) -> FloatType {
        let size = self.size();
        2.0 * (size.x * size.y + size.y * size.z + size.z * size.x)
    }

    pub fn contains_point(&self, point: &WorldPoint, tolerance: FloatType) -> bool {
        (0..3).all(|i| {
            point[i] >= self.min[i] - tolerance && point[i] <= self.max[i] + tolerance
        })
    }

    pub fn contains_box(&self, other: &WorldBox) -> bool {
        (0..3).all(|i| other.min[i] >= self.min[i] && other.max[i] <= self.max[i])
    }
}

/// Zero sized box at the origin, used as the bounds of an empty scene.
impl Default for AABB<WorldPoint> {
    fn default() -> Self {
        WorldBox::from_point(WorldPoint::origin())
    }
}
