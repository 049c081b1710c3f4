use std::f64::consts::TAU;

use arrayvec::ArrayVec;
use bon::bon;
use nalgebra::Unit;

use crate::geometry::{
    EPSILON, FloatType, HitRecord, MaterialId, Ray, TexturePoint, WorldBox, WorldPoint,
    WorldVector, orthonormal_basis, solve_quadratic,
};
use crate::scene::{Shape, ShapeError, closest_hit, in_range};

use super::{Disc, disc_bounds};

/// Finite cylinder between two centers, optionally closed with discs at both ends.
#[derive(Clone, Debug)]
pub struct Cylinder {
    base_center: WorldPoint,
    axis: Unit<WorldVector>,
    /// In-plane basis used for the angular texture coordinate
    right: Unit<WorldVector>,
    up: Unit<WorldVector>,
    height: FloatType,
    radius: FloatType,
    caps: ArrayVec<Disc, 2>,
    material: MaterialId,
    bounding_box: WorldBox,
}

#[bon]
impl Cylinder {
    #[builder]
    pub fn new(
        base_center: WorldPoint,
        top_center: WorldPoint,
        radius: FloatType,
        #[builder(default)] capped: bool,
        material: MaterialId,
    ) -> Result<Self, ShapeError> {
        if !(radius > 0.0) {
            return Err(ShapeError::NonPositiveRadius(radius));
        }
        let (axis, height) =
            Unit::try_new_and_get(top_center - base_center, EPSILON).ok_or(ShapeError::ZeroHeight)?;
        let (right, up) = orthonormal_basis(&axis);

        let mut caps = ArrayVec::new();
        if capped {
            caps.push(Disc::new(base_center, -axis.into_inner(), radius, material)?);
            caps.push(Disc::new(top_center, axis.into_inner(), radius, material)?);
        }

        let bounding_box = disc_bounds(&base_center, &axis, radius)
            .union(&disc_bounds(&top_center, &axis, radius));

        Ok(Cylinder {
            base_center,
            axis,
            right,
            up,
            height,
            radius,
            caps,
            material,
            bounding_box,
        })
    }
}

impl Cylinder {
    fn intersect_body(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        let axis = self.axis.as_ref();

        // Only the components perpendicular to the axis matter for the distance from it
        let co = ray.origin - self.base_center;
        let d_perp = ray.direction - axis * ray.direction.dot(axis);
        let co_perp = co - axis * co.dot(axis);

        let a = d_perp.norm_squared();
        let b = 2.0 * d_perp.dot(&co_perp);
        let c = co_perp.norm_squared() - self.radius * self.radius;

        let (t, h) = solve_quadratic(a, b, c)
            .into_iter()
            .filter(|t| in_range(*t, t_min, t_max))
            .map(|t| (t, (ray.point_at(t) - self.base_center).dot(axis)))
            .find(|(_, h)| (0.0..=self.height).contains(h))?;

        let radial = ray.point_at(t) - self.base_center - axis * h;
        let angle = radial
            .dot(self.up.as_ref())
            .atan2(radial.dot(self.right.as_ref()))
            .rem_euclid(TAU);

        Some(HitRecord::from_outward_normal(
            ray,
            t,
            Unit::new_normalize(radial),
            self.material,
            Some(TexturePoint::new(angle / TAU, h / self.height)),
        ))
    }
}

impl Shape for Cylinder {
    fn intersect(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        let body = self.intersect_body(ray, t_min, t_max);
        let limit = body.as_ref().map_or(t_max, |hit| hit.t);
        closest_hit(self.caps.iter(), ray, t_min, limit).or(body)
    }

    fn bounding_box(&self) -> WorldBox {
        self.bounding_box.clone()
    }
}
