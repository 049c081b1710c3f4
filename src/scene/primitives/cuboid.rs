use arrayvec::ArrayVec;
use bon::bon;
use itertools::iproduct;
use nalgebra::Rotation3;

use crate::geometry::{FloatType, HitRecord, MaterialId, Ray, WorldBox, WorldPoint, WorldVector};
use crate::scene::{Shape, ShapeError, closest_hit};

use super::Quad;

/// Faces of the `[-1, 1]^3` cube as (corner, u, v), with `u x v` pointing outwards.
const UNIT_CUBE_FACES: [([FloatType; 3], [FloatType; 3], [FloatType; 3]); 6] = [
    ([1.0, -1.0, -1.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]),
    ([-1.0, -1.0, -1.0], [0.0, 0.0, 2.0], [0.0, 2.0, 0.0]),
    ([-1.0, 1.0, -1.0], [0.0, 0.0, 2.0], [2.0, 0.0, 0.0]),
    ([-1.0, -1.0, -1.0], [2.0, 0.0, 0.0], [0.0, 0.0, 2.0]),
    ([-1.0, -1.0, 1.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]),
    ([-1.0, -1.0, -1.0], [0.0, 2.0, 0.0], [2.0, 0.0, 0.0]),
];

/// Oriented box made of six quads.
#[derive(Clone, Debug)]
pub struct Cuboid {
    faces: ArrayVec<Quad, 6>,
    bounding_box: WorldBox,
}

#[bon]
impl Cuboid {
    /// Rotation is given as angles in radians around X, Y and Z, applied in this order.
    #[builder]
    pub fn new(
        center: WorldPoint,
        half_extents: WorldVector,
        rotation: Option<WorldVector>,
        material: MaterialId,
    ) -> Result<Self, ShapeError> {
        if !half_extents.iter().all(|x| *x > 0.0) {
            return Err(ShapeError::NonPositiveHalfExtents(half_extents));
        }

        let rotation = rotation.unwrap_or_else(WorldVector::zeros);
        let rotation = Rotation3::from_euler_angles(rotation.x, rotation.y, rotation.z);
        let to_world_vector = |v: WorldVector| rotation * half_extents.component_mul(&v);
        let to_world_point = |p: WorldVector| center + to_world_vector(p);

        let faces = UNIT_CUBE_FACES
            .iter()
            .map(|(corner, u, v)| {
                Quad::new(
                    to_world_point((*corner).into()),
                    to_world_vector((*u).into()),
                    to_world_vector((*v).into()),
                    material,
                )
            })
            .collect::<Result<ArrayVec<_, 6>, _>>()?;

        let bounding_box = WorldBox::from_points(
            iproduct!([-1.0, 1.0], [-1.0, 1.0], [-1.0, 1.0])
                .map(|(x, y, z)| to_world_point(WorldVector::new(x, y, z))),
        )
        .unwrap_or_default();

        Ok(Cuboid {
            faces,
            bounding_box,
        })
    }
}

impl Shape for Cuboid {
    fn intersect(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        closest_hit(self.faces.iter(), ray, t_min, t_max)
    }

    fn bounding_box(&self) -> WorldBox {
        self.bounding_box.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::{assert, let_assert};
    use std::f64::consts::FRAC_PI_4;
    use test_case::test_case;

    fn unit_box() -> Cuboid {
        Cuboid::builder()
            .center(WorldPoint::origin())
            .half_extents(WorldVector::new(1.0, 1.0, 1.0))
            .material(2)
            .build()
            .unwrap()
    }

    #[test]
    fn hit_from_outside() {
        let ray = Ray::new(WorldPoint::new(0.0, 0.0, -3.0), WorldVector::new(0.0, 0.0, 1.0));

        let_assert!(Some(hit) = unit_box().intersect(&ray, 1e-3, FloatType::INFINITY));
        assert!((hit.t - 2.0).abs() < 1e-12);
        assert!(hit.front_face);
        assert!((hit.normal.into_inner() + WorldVector::z()).norm() < 1e-12);
        assert!(hit.material == 2);
    }

    #[test_case(WorldVector::x() ; "plus_x")]
    #[test_case(-WorldVector::x() ; "minus_x")]
    #[test_case(WorldVector::y() ; "plus_y")]
    #[test_case(-WorldVector::y() ; "minus_y")]
    #[test_case(WorldVector::z() ; "plus_z")]
    #[test_case(-WorldVector::z() ; "minus_z")]
    fn every_face_points_outwards(direction: WorldVector) {
        let ray = Ray::new(WorldPoint::origin() + direction * 5.0, -direction);

        let_assert!(Some(hit) = unit_box().intersect(&ray, 0.0, FloatType::INFINITY));
        assert!((hit.t - 4.0).abs() < 1e-12);
        assert!(hit.front_face);
        assert!((hit.normal.into_inner() - direction).norm() < 1e-12);
    }

    #[test]
    fn hit_from_inside_is_back_face() {
        let ray = Ray::new(WorldPoint::new(0.2, 0.1, 0.0), WorldVector::new(0.0, 1.0, 0.0));

        let_assert!(Some(hit) = unit_box().intersect(&ray, 0.0, FloatType::INFINITY));
        assert!((hit.t - 0.9).abs() < 1e-12);
        assert!(!hit.front_face);
        assert!((hit.normal.into_inner() + WorldVector::y()).norm() < 1e-12);
    }

    #[test]
    fn rotated_box_bounds() {
        let cuboid = Cuboid::builder()
            .center(WorldPoint::new(1.0, 0.0, 0.0))
            .half_extents(WorldVector::new(1.0, 1.0, 1.0))
            .rotation(WorldVector::new(0.0, 0.0, FRAC_PI_4))
            .material(0)
            .build()
            .unwrap();
        let b = cuboid.bounding_box();
        let diagonal = 2.0f64.sqrt();

        assert!((b.min.x - (1.0 - diagonal)).abs() < 1e-12);
        assert!((b.max.y - diagonal).abs() < 1e-12);
        assert!((b.max.z - 1.0).abs() < 1e-12);

        // Corner of the unrotated box is now outside
        let ray = Ray::new(WorldPoint::new(2.0, 1.0, 5.0), WorldVector::new(0.0, 0.0, -1.0));
        assert!(cuboid.intersect(&ray, 0.0, FloatType::INFINITY).is_none());

        let ray = Ray::new(WorldPoint::new(1.0 + 1.4, 0.0, 5.0), WorldVector::new(0.0, 0.0, -1.0));
        assert!(cuboid.intersect(&ray, 0.0, FloatType::INFINITY).is_some());
    }

    #[test_case(WorldVector::new(0.0, 1.0, 1.0) ; "zero")]
    #[test_case(WorldVector::new(1.0, -1.0, 1.0) ; "negative")]
    fn invalid_half_extents(half_extents: WorldVector) {
        let result = Cuboid::builder()
            .center(WorldPoint::origin())
            .half_extents(half_extents)
            .material(0)
            .build();
        let_assert!(Err(ShapeError::NonPositiveHalfExtents(_)) = result);
    }
}
