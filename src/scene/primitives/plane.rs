use nalgebra::Unit;

use crate::geometry::{
    EPSILON, FloatType, HitRecord, MaterialId, Ray, TexturePoint, WorldBox, WorldPoint,
    WorldVector, orthonormal_basis,
};
use crate::scene::{Shape, ShapeError, in_range};

/// Plane through a point, clipped to a large square so that it has a finite bounding box.
/// The clipping also applies when the plane is traced on its own, hits further than
/// `HALF_EXTENT` from the point along either in-plane axis are misses.
#[derive(Clone, Debug)]
pub struct Plane {
    point: WorldPoint,
    normal: Unit<WorldVector>,
    right: Unit<WorldVector>,
    up: Unit<WorldVector>,
    material: MaterialId,
    bounding_box: WorldBox,
}

impl Plane {
    /// Half size of the square the plane gets clipped to, measured along its in-plane basis.
    pub const HALF_EXTENT: FloatType = 1e6;

    pub fn new(
        point: WorldPoint,
        normal: WorldVector,
        material: MaterialId,
    ) -> Result<Plane, ShapeError> {
        let normal = Unit::try_new(normal, EPSILON).ok_or(ShapeError::ZeroNormal)?;
        let (right, up) = orthonormal_basis(&normal);

        let extent = (right.abs() + up.abs()) * Self::HALF_EXTENT;
        let bounding_box = WorldBox::new(point - extent, point + extent);

        Ok(Plane {
            point,
            normal,
            right,
            up,
            material,
            bounding_box,
        })
    }

    pub fn normal(&self) -> Unit<WorldVector> {
        self.normal
    }
}

impl Shape for Plane {
    fn intersect(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        let denominator = ray.direction.dot(self.normal.as_ref());
        if denominator.abs() < EPSILON {
            return None;
        }

        let t = (self.point - ray.origin).dot(self.normal.as_ref()) / denominator;
        if !in_range(t, t_min, t_max) {
            return None;
        }

        let local = ray.point_at(t) - self.point;
        let x = local.dot(self.right.as_ref());
        let y = local.dot(self.up.as_ref());
        if x.abs() > Self::HALF_EXTENT || y.abs() > Self::HALF_EXTENT {
            return None;
        }

        Some(HitRecord::from_outward_normal(
            ray,
            t,
            self.normal,
            self.material,
            Some(TexturePoint::new(x, y)),
        ))
    }

    fn bounding_box(&self) -> WorldBox {
        self.bounding_box.clone()
    }
}
