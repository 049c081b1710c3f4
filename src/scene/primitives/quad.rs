use nalgebra::Unit;

use crate::geometry::{
    EPSILON, FloatType, HitRecord, MaterialId, Ray, TexturePoint, WorldBox, WorldPoint,
    WorldVector,
};
use crate::scene::{Shape, ShapeError, in_range};

/// Parallelogram spanned by two edges from a corner.
/// Front side is the one `u x v` points to.
#[derive(Clone, Debug)]
pub struct Quad {
    corner: WorldPoint,
    u: WorldVector,
    v: WorldVector,
    normal: Unit<WorldVector>,
    /// Plane equation offset, `normal . x == offset` for points on the quad
    offset: FloatType,
    /// `n / (n . n)` for the unnormalized normal, maps plane points to edge coordinates
    w: WorldVector,
    material: MaterialId,
    bounding_box: WorldBox,
}

impl Quad {
    pub fn new(
        corner: WorldPoint,
        u: WorldVector,
        v: WorldVector,
        material: MaterialId,
    ) -> Result<Quad, ShapeError> {
        let n = u.cross(&v);
        let normal = Unit::try_new(n, EPSILON * u.norm() * v.norm())
            .ok_or(ShapeError::DegenerateQuad)?;

        let corners = [corner, corner + u, corner + v, corner + u + v];
        let bounding_box = WorldBox::from_points(corners).unwrap_or_default();

        Ok(Quad {
            corner,
            u,
            v,
            normal,
            offset: normal.dot(&corner.coords),
            w: n / n.norm_squared(),
            material,
            bounding_box,
        })
    }

    pub fn normal(&self) -> Unit<WorldVector> {
        self.normal
    }
}

impl Shape for Quad {
    fn intersect(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        let denominator = self.normal.dot(&ray.direction);
        if denominator.abs() < EPSILON {
            return None;
        }

        let t = (self.offset - self.normal.dot(&ray.origin.coords)) / denominator;
        if !in_range(t, t_min, t_max) {
            return None;
        }

        let p = ray.point_at(t) - self.corner;
        let alpha = self.w.dot(&p.cross(&self.v));
        let beta = self.w.dot(&self.u.cross(&p));
        if !(0.0..=1.0).contains(&alpha) || !(0.0..=1.0).contains(&beta) {
            return None;
        }

        Some(HitRecord::from_outward_normal(
            ray,
            t,
            self.normal,
            self.material,
            Some(TexturePoint::new(alpha, beta)),
        ))
    }

    fn bounding_box(&self) -> WorldBox {
        self.bounding_box.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::{assert, let_assert};
    use test_case::test_case;

    fn example() -> Quad {
        Quad::new(
            WorldPoint::new(0.0, 0.0, 1.0),
            WorldVector::new(2.0, 0.0, 0.0),
            WorldVector::new(0.0, 4.0, 0.0),
            9,
        )
        .unwrap()
    }

    #[test_case(1.0, 2.0, Some((0.5, 0.5)) ; "center")]
    #[test_case(0.0, 0.0, Some((0.0, 0.0)) ; "corner")]
    #[test_case(2.0, 4.0, Some((1.0, 1.0)) ; "opposite_corner")]
    #[test_case(2.5, 2.0, None ; "past_u_edge")]
    #[test_case(1.0, -0.5, None ; "before_v_edge")]
    fn edge_coordinates(x: FloatType, y: FloatType, expected: Option<(FloatType, FloatType)>) {
        let ray = Ray::new(WorldPoint::new(x, y, 5.0), WorldVector::new(0.0, 0.0, -1.0));
        let hit = example().intersect(&ray, 0.0, FloatType::INFINITY);

        match expected {
            Some((alpha, beta)) => {
                let_assert!(Some(hit) = hit);
                let_assert!(Some(uv) = hit.uv);
                assert!((uv.x - alpha).abs() < 1e-12);
                assert!((uv.y - beta).abs() < 1e-12);
                assert!((hit.t - 4.0).abs() < 1e-12);
                assert!(hit.front_face);
                assert!(hit.material == 9);
            }
            None => assert!(hit.is_none()),
        }
    }

    #[test]
    fn hit_from_behind_is_back_face() {
        let ray = Ray::new(WorldPoint::new(1.0, 1.0, -1.0), WorldVector::new(0.0, 0.0, 1.0));
        let_assert!(Some(hit) = example().intersect(&ray, 0.0, FloatType::INFINITY));
        assert!(!hit.front_face);
        assert!(hit.normal.into_inner() == -WorldVector::z());
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray::new(WorldPoint::new(-1.0, 1.0, 1.0), WorldVector::new(1.0, 0.0, 0.0));
        assert!(example().intersect(&ray, 0.0, FloatType::INFINITY).is_none());
    }

    #[test]
    fn bounding_box_covers_all_corners() {
        let b = example().bounding_box();
        assert!(b.min == WorldPoint::new(0.0, 0.0, 1.0));
        assert!(b.max == WorldPoint::new(2.0, 4.0, 1.0));
    }

    #[test_case(WorldVector::new(1.0, 0.0, 0.0), WorldVector::new(2.0, 0.0, 0.0) ; "parallel_edges")]
    #[test_case(WorldVector::zeros(), WorldVector::new(0.0, 1.0, 0.0) ; "zero_edge")]
    fn degenerate_quad(u: WorldVector, v: WorldVector) {
        let_assert!(Err(ShapeError::DegenerateQuad) = Quad::new(WorldPoint::origin(), u, v, 0));
    }
}
