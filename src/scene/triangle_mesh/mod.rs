mod loading;

use std::sync::Arc;

use bon::bon;
use index_vec::IndexVec;
use itertools::Itertools as _;

use crate::geometry::{FloatType, HitRecord, MaterialId, Ray, TexturePoint, WorldBox, WorldPoint, WorldVector};
use crate::scene::bvh::{BuildSettings, Bvh};
use crate::scene::primitives::Triangle;
use crate::scene::{Shape, ShapeError, SharedShape};

pub use loading::ObjOpenError;

index_vec::define_index_type! {
    pub struct VertexIdx = usize;
}

/// Indexed triangles sharing a vertex array, traced through their own hierarchy.
#[derive(Debug)]
pub struct TriangleMesh {
    vertices: IndexVec<VertexIdx, WorldPoint>,
    triangle_count: usize,
    bvh: Bvh,
}

#[bon]
impl TriangleMesh {
    /// Every three consecutive `indices` form a triangle. Optional arrays hold one entry per
    /// triangle, `material` is used for triangles without an entry in `materials`.
    #[builder]
    pub fn new(
        vertices: Vec<WorldPoint>,
        indices: Vec<usize>,
        normals: Option<Vec<WorldVector>>,
        materials: Option<Vec<MaterialId>>,
        uvs: Option<Vec<[TexturePoint; 3]>>,
        material: MaterialId,
        settings: Option<BuildSettings>,
    ) -> Result<Self, ShapeError> {
        if indices.len() % 3 != 0 {
            return Err(ShapeError::IndexCountNotMultipleOfThree(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&index| index >= vertices.len()) {
            return Err(ShapeError::IndexOutOfBounds {
                index,
                vertex_count: vertices.len(),
            });
        }

        let triangle_count = indices.len() / 3;
        check_length("normals", normals.as_deref(), triangle_count)?;
        check_length("materials", materials.as_deref(), triangle_count)?;
        check_length("uvs", uvs.as_deref(), triangle_count)?;

        let vertices: IndexVec<VertexIdx, WorldPoint> = IndexVec::from_vec(vertices);
        let triangles: Vec<SharedShape> = indices
            .into_iter()
            .map(VertexIdx::from_usize)
            .tuples()
            .enumerate()
            .map(|(i, (a, b, c))| {
                let triangle = Triangle::builder()
                    .vertices([vertices[a], vertices[b], vertices[c]])
                    .maybe_normal(normals.as_ref().map(|normals| normals[i]))
                    .maybe_uvs(uvs.as_ref().map(|uvs| uvs[i]))
                    .material(materials.as_ref().map_or(material, |materials| materials[i]))
                    .build()?;
                Ok(Arc::new(triangle) as SharedShape)
            })
            .collect::<Result<_, ShapeError>>()?;

        let bvh = Bvh::build_with_settings(triangles, &settings.unwrap_or_default());

        Ok(TriangleMesh {
            vertices,
            triangle_count,
            bvh,
        })
    }
}

impl TriangleMesh {
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }
}

fn check_length<T>(name: &'static str, values: Option<&[T]>, expected: usize) -> Result<(), ShapeError> {
    match values {
        Some(values) if values.len() != expected => Err(ShapeError::PerTriangleLengthMismatch {
            name,
            expected,
            actual: values.len(),
        }),
        _ => Ok(()),
    }
}

impl Shape for TriangleMesh {
    fn intersect(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        self.bvh.intersect(ray, t_min, t_max)
    }

    fn bounding_box(&self) -> WorldBox {
        self.bvh.bounding_box()
    }
}
