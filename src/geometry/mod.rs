mod aabb;
mod quadratic;
mod ray_box_intersection;
mod ray_triangle_intersection;
mod triangle;

pub use aabb::AABB;
pub use quadratic::solve_quadratic;
pub use ray_box_intersection::RayIntersectionExt;
pub use triangle::{BarycentricCoordinates, Triangle};

use nalgebra::{Point2, Point3, Unit, Vector3};

pub type FloatType = f64;
pub type WorldPoint = Point3<FloatType>;
pub type WorldVector = Vector3<FloatType>;
pub type WorldBox = AABB<WorldPoint>;
pub type TexturePoint = Point2<FloatType>;

/// Opaque handle of a material owned by the renderer.
/// Shapes only carry it around and copy it into hit records.
pub type MaterialId = usize;

/// Magnitude under which denominators, determinants and leading coefficients count as zero.
pub const EPSILON: FloatType = 1e-9;

/// Conservative bound on the relative rounding error of `n` chained floating point operations.
pub fn gamma(n: u32) -> FloatType {
    let n = n as FloatType;
    let machine_epsilon = FloatType::EPSILON * 0.5;
    (n * machine_epsilon) / (1.0 - n * machine_epsilon)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Normalized direction of the ray
    pub direction: WorldVector,

    /// Componentwise inverse of the ray direction
    /// Zeros in direction get turned into positive infinity regardless of the sign of the zero
    pub inv_direction: WorldVector,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        let direction = direction.normalize();
        let inv_direction = direction.map(|x| if x == 0.0 { FloatType::INFINITY } else { 1.0 / x });

        Ray {
            origin,
            direction,
            inv_direction,
        }
    }

    pub fn point_at(&self, distance: FloatType) -> WorldPoint {
        self.origin + self.direction * distance
    }
}

/// Result of a successful ray intersection.
#[derive(Clone, Debug)]
pub struct HitRecord {
    /// Distance along the ray
    pub t: FloatType,
    pub point: WorldPoint,
    /// Unit normal, always facing against the incoming ray
    pub normal: Unit<WorldVector>,
    /// True if the ray arrived from the side the outward normal points to
    pub front_face: bool,
    pub material: MaterialId,
    pub uv: Option<TexturePoint>,
}

impl HitRecord {
    /// Builds the record from the geometric outward normal of the surface.
    /// This is the only place where front/back faces get classified.
    pub fn from_outward_normal(
        ray: &Ray,
        t: FloatType,
        outward_normal: Unit<WorldVector>,
        material: MaterialId,
        uv: Option<TexturePoint>,
    ) -> HitRecord {
        let front_face = ray.direction.dot(outward_normal.as_ref()) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            Unit::new_unchecked(-outward_normal.into_inner())
        };

        HitRecord {
            t,
            point: ray.point_at(t),
            normal,
            front_face,
            material,
            uv,
        }
    }
}

/// Returns two unit vectors `(right, up)` that together with `normal` form a right handed
/// orthonormal basis (`right x up == normal`).
pub fn orthonormal_basis(normal: &Unit<WorldVector>) -> (Unit<WorldVector>, Unit<WorldVector>) {
    let helper = if normal.x.abs() > 0.9 {
        WorldVector::y()
    } else {
        WorldVector::x()
    };
    let right = Unit::new_normalize(helper.cross(normal.as_ref()));
    let up = Unit::new_normalize(normal.cross(right.as_ref()));
    (right, up)
}

#[cfg(test)]
pub mod test {
    use super::*;
    use assert2::assert;
    use proptest::prelude::*;
    use test_case::test_case;
    use test_strategy::proptest;

    /// Helper macro that creates a wrapper arnound a type that implemetns Deref and Arbitary
    macro_rules! arbitrary_wrapper {
        ( $wrapper_name:ident ( $type:ty ) -> $block:block ) => {
            #[derive(Copy, Clone, Debug)]
            pub struct $wrapper_name(pub $type);

            impl std::ops::Deref for $wrapper_name {
                type Target = $type;
                fn deref(&self) -> &$type {
                    &self.0
                }
            }

            impl Arbitrary for $wrapper_name {
                type Parameters = ();
                type Strategy = proptest::strategy::BoxedStrategy<Self>;
                fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
                    $block.prop_map(|x| $wrapper_name(x)).boxed()
                }
            }
        };
    }

    /// Floats on a fixed grid in [-100, 100]
    fn simple_float() -> BoxedStrategy<FloatType> {
        (-100_000i32..=100_000)
            .prop_map(|n| n as FloatType * 1e-3)
            .boxed()
    }

    arbitrary_wrapper! {
        NonzeroWorldVectorWrapper(WorldVector) -> {
            (simple_float(), simple_float(), simple_float())
                .prop_filter_map(
                    "vector is zero",
                    |coords| {
                        let vector = WorldVector::new(coords.0, coords.1, coords.2);
                        if vector.norm() < 1e-3 {
                            None
                        } else {
                            Some(vector)
                        }
                    })
        }
    }

    arbitrary_wrapper! {
        WorldPointWrapper(WorldPoint) -> {
            (simple_float(), simple_float(), simple_float())
                .prop_map(|coords| {
                    WorldPoint::new(coords.0, coords.1, coords.2)
                })
        }
    }

    arbitrary_wrapper! {
        RayWrapper(Ray) -> {
            (any::<WorldPointWrapper>(), any::<NonzeroWorldVectorWrapper>())
                .prop_map(|(origin, direction)| Ray::new(*origin, *direction))
        }
    }

    #[test]
    fn ray_direction_is_normalized() {
        let ray = Ray::new(WorldPoint::new(1.0, 2.0, 3.0), WorldVector::new(0.0, 0.0, -5.0));
        assert!(ray.direction == WorldVector::new(0.0, 0.0, -1.0));
        assert!(ray.point_at(2.0) == WorldPoint::new(1.0, 2.0, 1.0));
    }

    #[test_case(0.0 ; "positive_zero")]
    #[test_case(-0.0 ; "negative_zero")]
    fn zero_direction_component_inverts_to_positive_infinity(zero: FloatType) {
        let ray = Ray::new(WorldPoint::origin(), WorldVector::new(zero, 1.0, zero));
        assert!(ray.inv_direction.x == FloatType::INFINITY);
        assert!(ray.inv_direction.y == 1.0);
        assert!(ray.inv_direction.z == FloatType::INFINITY);
    }

    #[test_case(WorldVector::new(0.0, 0.0, 1.0), true ; "facing_the_ray")]
    #[test_case(WorldVector::new(0.0, 0.0, -1.0), false ; "facing_away")]
    #[test_case(WorldVector::new(1.0, 0.0, 0.0), false ; "perpendicular")]
    fn front_face_classification(outward: WorldVector, expected_front: bool) {
        let ray = Ray::new(WorldPoint::new(0.0, 0.0, 5.0), WorldVector::new(0.0, 0.0, -1.0));
        let hit = HitRecord::from_outward_normal(&ray, 5.0, Unit::new_normalize(outward), 3, None);

        assert!(hit.front_face == expected_front);
        assert!(hit.material == 3);
        assert!(hit.point == WorldPoint::origin());
        if expected_front {
            assert!(hit.normal.into_inner() == outward);
        } else {
            assert!(hit.normal.into_inner() == -outward);
        }
    }

    #[proptest]
    fn stored_normal_opposes_ray_iff_front_face(
        ray: RayWrapper,
        outward: NonzeroWorldVectorWrapper,
    ) {
        let hit = HitRecord::from_outward_normal(&ray, 1.0, Unit::new_normalize(*outward), 0, None);
        prop_assert_eq!(hit.front_face, ray.direction.dot(hit.normal.as_ref()) < 0.0);
    }

    #[proptest]
    fn basis_is_orthonormal_and_right_handed(normal: NonzeroWorldVectorWrapper) {
        let normal = Unit::new_normalize(*normal);
        let (right, up) = orthonormal_basis(&normal);

        prop_assert!((right.norm() - 1.0).abs() < 1e-9);
        prop_assert!((up.norm() - 1.0).abs() < 1e-9);
        prop_assert!(right.dot(normal.as_ref()).abs() < 1e-9);
        prop_assert!(up.dot(normal.as_ref()).abs() < 1e-9);
        prop_assert!(right.dot(up.as_ref()).abs() < 1e-9);
        prop_assert!((right.cross(up.as_ref()) - normal.into_inner()).norm() < 1e-9);
    }

    #[test]
    fn gamma_is_small_and_increasing() {
        assert!(gamma(1) > 0.0);
        assert!(gamma(3) > gamma(1));
        assert!(gamma(3) < 1e-15);
    }

    #[test]
    fn axis_indices() {
        let indices: Vec<usize> = Axis::ALL.iter().map(|axis| axis.index()).collect();
        assert!(indices == vec![0, 1, 2]);
    }
}
