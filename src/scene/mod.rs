pub mod bvh;
pub mod primitives;
pub mod triangle_mesh;

use std::sync::Arc;

use thiserror::Error;

use crate::geometry::{FloatType, HitRecord, Ray, WorldBox, WorldVector};

/// Anything a ray can be intersected with.
/// Shapes are immutable once built, so a single tree can be traced from many threads.
pub trait Shape: Send + Sync {
    /// Closest intersection with distance in `(t_min, t_max]`.
    fn intersect(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord>;

    /// Box containing every point this shape can report as a hit.
    fn bounding_box(&self) -> WorldBox;
}

pub type SharedShape = Arc<dyn Shape>;

impl<S: Shape + ?Sized> Shape for Arc<S> {
    fn intersect(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        (**self).intersect(ray, t_min, t_max)
    }

    fn bounding_box(&self) -> WorldBox {
        (**self).bounding_box()
    }
}

impl<S: Shape + ?Sized> Shape for Box<S> {
    fn intersect(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        (**self).intersect(ray, t_min, t_max)
    }

    fn bounding_box(&self) -> WorldBox {
        (**self).bounding_box()
    }
}

/// Invalid parameters passed when constructing a shape.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("Radius must be positive, got {0}")]
    NonPositiveRadius(FloatType),

    #[error("Cone radii must satisfy 0 <= top < base and base > 0, got base {base}, top {top}")]
    InvalidConeRadii { base: FloatType, top: FloatType },

    #[error("Base and top centers must be distinct")]
    ZeroHeight,

    #[error("Quad edges must not be parallel or zero")]
    DegenerateQuad,

    #[error("Box half extents must be positive, got {0:?}")]
    NonPositiveHalfExtents(WorldVector),

    #[error("Normal vector must be finite and non-zero")]
    ZeroNormal,

    #[error("Index count {0} is not a multiple of three")]
    IndexCountNotMultipleOfThree(usize),

    #[error("Vertex index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: usize, vertex_count: usize },

    #[error("Expected {expected} per-triangle {name}, got {actual}")]
    PerTriangleLengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Accepted hit distances are in `(t_min, t_max]`.
pub(crate) fn in_range(t: FloatType, t_min: FloatType, t_max: FloatType) -> bool {
    t > t_min && t <= t_max
}

/// Intersects all the shapes, shrinking the search range with every hit.
pub fn closest_hit<'a, S: Shape + 'a>(
    shapes: impl IntoIterator<Item = &'a S>,
    ray: &Ray,
    t_min: FloatType,
    t_max: FloatType,
) -> Option<HitRecord> {
    shapes.into_iter().fold(None, |best: Option<HitRecord>, shape| {
        let limit = best.as_ref().map_or(t_max, |hit| hit.t);
        shape.intersect(ray, t_min, limit).or(best)
    })
}
