use std::f64::consts::PI;

use nalgebra::Unit;

use crate::geometry::{
    FloatType, HitRecord, MaterialId, Ray, TexturePoint, WorldBox, WorldPoint, WorldVector,
};
use crate::scene::{Shape, ShapeError, in_range};

#[derive(Clone, Debug)]
pub struct Sphere {
    center: WorldPoint,
    radius: FloatType,
    material: MaterialId,
}

impl Sphere {
    pub fn new(
        center: WorldPoint,
        radius: FloatType,
        material: MaterialId,
    ) -> Result<Sphere, ShapeError> {
        if !(radius > 0.0) {
            return Err(ShapeError::NonPositiveRadius(radius));
        }

        Ok(Sphere {
            center,
            radius,
            material,
        })
    }

    pub fn center(&self) -> WorldPoint {
        self.center
    }

    pub fn radius(&self) -> FloatType {
        self.radius
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        // Ray direction is normalized, the quadratic has a == 1 and we work with b / 2
        let oc = ray.origin - self.center;
        let b = oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;
        let discriminant = b * b - c;

        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let t = [-b - sqrt_disc, -b + sqrt_disc]
            .into_iter()
            .find(|t| in_range(*t, t_min, t_max))?;

        let point = ray.point_at(t);
        let normal = Unit::new_normalize(point - self.center);
        let uv = sphere_uv(&normal);

        Some(HitRecord::from_outward_normal(
            ray,
            t,
            normal,
            self.material,
            Some(uv),
        ))
    }

    fn bounding_box(&self) -> WorldBox {
        let r_vec = WorldVector::repeat(self.radius);
        WorldBox {
            min: self.center - r_vec,
            max: self.center + r_vec,
        }
    }
}

/// Spherical texture coordinates of a point given by its unit normal.
fn sphere_uv(normal: &Unit<WorldVector>) -> TexturePoint {
    let theta = (-normal.y).clamp(-1.0, 1.0).acos();
    let phi = (-normal.z).atan2(normal.x) + PI;
    TexturePoint::new(phi / (2.0 * PI), theta / PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{assert, let_assert};
    use test_case::test_case;

    fn example() -> Sphere {
        Sphere::new([1.0, 2.0, 3.0].into(), 1.0, 7).unwrap()
    }

    #[test]
    fn direct_hit_through_center() {
        let ray = Ray::new([1.0, 2.0, 0.0].into(), [0.0, 0.0, 1.0].into());

        let_assert!(Some(h) = example().intersect(&ray, 0.0, FloatType::INFINITY));
        assert!((h.t - 2.0).abs() < 1e-6);
        assert!(h.material == 7);
    }

    #[test]
    fn grazing_hit() {
        let ray = Ray::new([2.0, 2.0, 0.0].into(), [0.0, 0.0, 1.0].into());

        let_assert!(Some(h) = example().intersect(&ray, 0.0, FloatType::INFINITY));
        assert!((h.t - 3.0).abs() < 1e-6);
    }

    #[test]
    fn narrow_miss() {
        let ray = Ray::new([2.0, 2.01, 0.0].into(), [0.0, 0.0, 1.0].into());
        assert!(example().intersect(&ray, 0.0, FloatType::INFINITY).is_none());
    }

    #[test]
    fn hit_from_outside() {
        let sphere = Sphere::new(WorldPoint::origin(), 1.0, 0).unwrap();
        let ray = Ray::new(WorldPoint::new(0.0, 0.0, 2.0), WorldVector::new(0.0, 0.0, -1.0));

        let_assert!(Some(h) = sphere.intersect(&ray, 1e-3, FloatType::INFINITY));
        assert!((h.t - 1.0).abs() < 1e-12);
        assert!(h.front_face);
        assert!((h.normal.into_inner() - WorldVector::z()).norm() < 1e-12);
    }

    #[test]
    fn hit_from_inside() {
        let sphere = Sphere::new(WorldPoint::origin(), 1.0, 0).unwrap();
        let ray = Ray::new(WorldPoint::origin(), WorldVector::new(0.0, 0.0, 1.0));

        let_assert!(Some(h) = sphere.intersect(&ray, 1e-3, FloatType::INFINITY));
        assert!((h.t - 1.0).abs() < 1e-12);
        assert!(!h.front_face);
        assert!((h.normal.into_inner() + WorldVector::z()).norm() < 1e-12);
    }

    #[test]
    fn far_root_used_when_near_root_out_of_range() {
        let sphere = Sphere::new(WorldPoint::origin(), 1.0, 0).unwrap();
        let ray = Ray::new(WorldPoint::new(0.0, 0.0, 2.0), WorldVector::new(0.0, 0.0, -1.0));

        let_assert!(Some(h) = sphere.intersect(&ray, 1.5, FloatType::INFINITY));
        assert!((h.t - 3.0).abs() < 1e-12);
        assert!(!h.front_face);

        assert!(sphere.intersect(&ray, 1.5, 2.5).is_none());
    }

    #[test_case(WorldVector::new(0.0, -1.0, 0.0), 0.0 ; "bottom_pole")]
    #[test_case(WorldVector::new(0.0, 1.0, 0.0), 1.0 ; "top_pole")]
    #[test_case(WorldVector::new(1.0, 0.0, 0.0), 0.5 ; "equator")]
    fn texture_v(normal: WorldVector, expected_v: FloatType) {
        let uv = sphere_uv(&Unit::new_normalize(normal));
        assert!((uv.y - expected_v).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&uv.x));
    }

    #[test_case(0.0 ; "zero")]
    #[test_case(-1.0 ; "negative")]
    #[test_case(FloatType::NAN ; "nan")]
    fn invalid_radius(radius: FloatType) {
        let_assert!(Err(ShapeError::NonPositiveRadius(_)) = Sphere::new(WorldPoint::origin(), radius, 0));
    }

    #[test]
    fn bounding_box() {
        let b = example().bounding_box();
        assert!(b.min == WorldPoint::new(0.0, 1.0, 2.0));
        assert!(b.max == WorldPoint::new(2.0, 3.0, 4.0));
    }
}
