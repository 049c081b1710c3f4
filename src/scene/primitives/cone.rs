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

/// Cone or frustum between a base disc and a smaller (possibly zero) top disc.
#[derive(Clone, Debug)]
pub struct Cone {
    base_center: WorldPoint,
    axis: Unit<WorldVector>,
    right: Unit<WorldVector>,
    up: Unit<WorldVector>,
    height: FloatType,
    /// Tip of the cone, for frustums this lies above the top center
    apex: WorldPoint,
    /// Squared ratio of radius to distance from the apex along the axis
    k: FloatType,
    /// Radius decrease per unit of height
    slope: FloatType,
    caps: ArrayVec<Disc, 2>,
    material: MaterialId,
    bounding_box: WorldBox,
}

#[bon]
impl Cone {
    #[builder]
    pub fn new(
        base_center: WorldPoint,
        top_center: WorldPoint,
        base_radius: FloatType,
        #[builder(default)] top_radius: FloatType,
        #[builder(default)] capped: bool,
        material: MaterialId,
    ) -> Result<Self, ShapeError> {
        if !(base_radius > 0.0 && top_radius >= 0.0 && top_radius < base_radius) {
            return Err(ShapeError::InvalidConeRadii {
                base: base_radius,
                top: top_radius,
            });
        }
        let (axis, height) =
            Unit::try_new_and_get(top_center - base_center, EPSILON).ok_or(ShapeError::ZeroHeight)?;
        let (right, up) = orthonormal_basis(&axis);

        let apex_height = height * base_radius / (base_radius - top_radius);
        let apex = base_center + axis.as_ref() * apex_height;
        let k = (base_radius / apex_height).powi(2);

        let mut caps = ArrayVec::new();
        if capped {
            caps.push(Disc::new(base_center, -axis.into_inner(), base_radius, material)?);
            if top_radius > 0.0 {
                caps.push(Disc::new(top_center, axis.into_inner(), top_radius, material)?);
            }
        }

        let bounding_box = disc_bounds(&base_center, &axis, base_radius)
            .union(&disc_bounds(&top_center, &axis, top_radius));

        Ok(Cone {
            base_center,
            axis,
            right,
            up,
            height,
            apex,
            k,
            slope: (base_radius - top_radius) / height,
            caps,
            material,
            bounding_box,
        })
    }
}

impl Cone {
    /// Candidate distances of the infinite double cone, in ascending order.
    fn lateral_roots(&self, ray: &Ray) -> ArrayVec<FloatType, 2> {
        let axis = self.axis.as_ref();
        let m = 1.0 + self.k;

        // |radial|^2 == k * axial^2, relative to the apex
        let co = ray.origin - self.apex;
        let dv = ray.direction.dot(axis);
        let cv = co.dot(axis);

        let a = ray.direction.norm_squared() - m * dv * dv;
        let b = 2.0 * (ray.direction.dot(&co) - m * dv * cv);
        let c = co.norm_squared() - m * cv * cv;

        if a.abs() < EPSILON {
            // Ray parallel to the surface, at most one crossing
            let mut roots = ArrayVec::new();
            if b.abs() >= EPSILON {
                roots.push(-c / b);
            }
            roots
        } else {
            solve_quadratic(a, b, c)
        }
    }

    fn intersect_lateral(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        let axis = self.axis.as_ref();

        let (t, point) = self
            .lateral_roots(ray)
            .into_iter()
            .filter(|t| in_range(*t, t_min, t_max))
            .map(|t| (t, ray.point_at(t)))
            .find(|&(_, point)| {
                let h = (point - self.base_center).dot(axis);
                (0.0..=self.height).contains(&h) && (point - self.apex).dot(axis) <= 0.0
            })?;

        let relative = point - self.apex;
        let radial = relative - axis * relative.dot(axis);
        let normal = match Unit::try_new(radial, EPSILON) {
            Some(radial) => Unit::new_normalize(radial.into_inner() + axis * self.slope),
            None => self.axis,
        };

        let h = (point - self.base_center).dot(axis);
        let angle = radial
            .dot(self.up.as_ref())
            .atan2(radial.dot(self.right.as_ref()))
            .rem_euclid(TAU);

        Some(HitRecord::from_outward_normal(
            ray,
            t,
            normal,
            self.material,
            Some(TexturePoint::new(angle / TAU, h / self.height)),
        ))
    }
}

impl Shape for Cone {
    fn intersect(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        let lateral = self.intersect_lateral(ray, t_min, t_max);
        let limit = lateral.as_ref().map_or(t_max, |hit| hit.t);
        closest_hit(self.caps.iter(), ray, t_min, limit).or(lateral)
    }

    fn bounding_box(&self) -> WorldBox {
        self.bounding_box.clone()
    }
}
