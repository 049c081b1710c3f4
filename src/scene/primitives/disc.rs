use std::f64::consts::PI;

use nalgebra::Unit;
use rand_distr::Distribution as _;

use crate::geometry::{
    EPSILON, FloatType, HitRecord, MaterialId, Ray, TexturePoint, WorldBox, WorldPoint,
    WorldVector, orthonormal_basis,
};
use crate::scene::{Shape, ShapeError, in_range};

/// Flat circle, also used as an area light and as cylinder and cone caps.
#[derive(Clone, Debug)]
pub struct Disc {
    center: WorldPoint,
    normal: Unit<WorldVector>,
    right: Unit<WorldVector>,
    up: Unit<WorldVector>,
    radius: FloatType,
    material: MaterialId,
    bounding_box: WorldBox,
}

impl Disc {
    pub fn new(
        center: WorldPoint,
        normal: WorldVector,
        radius: FloatType,
        material: MaterialId,
    ) -> Result<Disc, ShapeError> {
        if !(radius > 0.0) {
            return Err(ShapeError::NonPositiveRadius(radius));
        }
        let normal = Unit::try_new(normal, EPSILON).ok_or(ShapeError::ZeroNormal)?;
        let (right, up) = orthonormal_basis(&normal);

        Ok(Disc {
            center,
            normal,
            right,
            up,
            radius,
            material,
            bounding_box: disc_bounds(&center, &normal, radius),
        })
    }

    pub fn center(&self) -> WorldPoint {
        self.center
    }

    pub fn normal(&self) -> Unit<WorldVector> {
        self.normal
    }

    pub fn right(&self) -> Unit<WorldVector> {
        self.right
    }

    pub fn up(&self) -> Unit<WorldVector> {
        self.up
    }

    pub fn radius(&self) -> FloatType {
        self.radius
    }

    pub fn area(&self) -> FloatType {
        PI * self.radius * self.radius
    }

    /// Point on the disc, uniformly distributed over its area.
    pub fn sample_uniform(&self, rng: &mut impl rand::Rng) -> WorldPoint {
        let [x, y]: [FloatType; 2] = rand_distr::UnitDisc.sample(rng);
        self.center
            + self.right.as_ref() * (x * self.radius)
            + self.up.as_ref() * (y * self.radius)
    }
}

impl Shape for Disc {
    fn intersect(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        let denominator = ray.direction.dot(self.normal.as_ref());
        if denominator.abs() < EPSILON {
            return None;
        }

        let t = (self.center - ray.origin).dot(self.normal.as_ref()) / denominator;
        if !in_range(t, t_min, t_max) {
            return None;
        }

        let local = ray.point_at(t) - self.center;
        if local.norm_squared() > self.radius * self.radius {
            return None;
        }

        let uv = TexturePoint::new(
            0.5 + 0.5 * local.dot(self.right.as_ref()) / self.radius,
            0.5 + 0.5 * local.dot(self.up.as_ref()) / self.radius,
        );

        Some(HitRecord::from_outward_normal(
            ray,
            t,
            self.normal,
            self.material,
            Some(uv),
        ))
    }

    fn bounding_box(&self) -> WorldBox {
        self.bounding_box.clone()
    }
}

/// Tight box around a disc.
/// Extent along each axis is `radius * sqrt(1 - normal_i^2)`.
pub(crate) fn disc_bounds(
    center: &WorldPoint,
    normal: &Unit<WorldVector>,
    radius: FloatType,
) -> WorldBox {
    let extent = normal.map(|n| radius * (1.0 - n * n).max(0.0).sqrt());
    WorldBox::new(*center - extent, *center + extent)
}
