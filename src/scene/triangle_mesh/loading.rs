use std::{fs, path::Path};

use indexmap::IndexMap;
use thiserror::Error;
use wavefront_obj::obj::{ObjSet, Primitive};

use crate::geometry::{EPSILON, MaterialId, TexturePoint, WorldPoint, WorldVector};
use crate::scene::ShapeError;

use super::TriangleMesh;

impl TriangleMesh {
    pub fn with_obj(p: impl AsRef<Path>, material: MaterialId) -> Result<TriangleMesh, ObjOpenError> {
        let content = fs::read_to_string(p)?;
        Self::parse_obj(content, material)
    }

    pub fn from_obj_str(content: &str, material: MaterialId) -> Result<TriangleMesh, ObjOpenError> {
        Self::parse_obj(content.to_owned(), material)
    }

    fn parse_obj(content: String, material: MaterialId) -> Result<TriangleMesh, ObjOpenError> {
        let parsed = wavefront_obj::obj::parse(content)?;
        let data = load_obj(parsed);

        Ok(TriangleMesh::builder()
            .vertices(data.vertices.into_iter().map(|v| v.position).collect())
            .indices(data.indices)
            .maybe_normals(data.normals)
            .maybe_uvs(data.uvs)
            .material(material)
            .build()?)
    }
}

#[derive(Debug, Error)]
pub enum ObjOpenError {
    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse file: {0}")]
    ParseError(#[from] wavefront_obj::ParseError),

    #[error("Invalid mesh: {0}")]
    InvalidMesh(#[from] ShapeError),
}

/// Deduplicated vertex of the file.
#[derive(Clone, Copy, Debug)]
struct VertexData {
    position: WorldPoint,
    uv: Option<TexturePoint>,
    normal: Option<WorldVector>,
}

struct ObjData {
    vertices: Vec<VertexData>,
    indices: Vec<usize>,
    /// Only present if every triangle has them
    normals: Option<Vec<WorldVector>>,
    uvs: Option<Vec<[TexturePoint; 3]>>,
}

fn load_obj(obj: ObjSet) -> ObjData {
    let mut indices = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    // Vertex indices are local to each object
    let mut vertices = IndexMap::new();
    let mut skipped = 0usize;

    for (object_index, o) in obj.objects.iter().enumerate() {
        for geometry in &o.geometry {
            for shape in &geometry.shapes {
                let Primitive::Triangle(a, b, c) = shape.primitive else {
                    skipped += 1;
                    continue;
                };

                let mut handle_vertex = |vtindex: (usize, Option<usize>, Option<usize>)| {
                    let entry = vertices.entry((object_index, vtindex));
                    let index = entry.index();
                    entry.or_insert_with(|| {
                        let vertex = &o.vertices[vtindex.0];
                        VertexData {
                            position: WorldPoint::new(vertex.x, vertex.y, vertex.z),
                            uv: vtindex
                                .1
                                .map(|i| TexturePoint::new(o.tex_vertices[i].u, o.tex_vertices[i].v)),
                            normal: vtindex.2.map(|i| {
                                let n = &o.normals[i];
                                WorldVector::new(n.x, n.y, n.z)
                            }),
                        }
                    });
                    index
                };

                let triangle = [handle_vertex(a), handle_vertex(b), handle_vertex(c)];
                let data = triangle.map(|index| vertices[index]);

                indices.extend(triangle);
                normals.push(average_normal(&data));
                uvs.push(
                    data[0]
                        .uv
                        .zip(data[1].uv)
                        .zip(data[2].uv)
                        .map(|((a, b), c)| [a, b, c]),
                );
            }
        }
    }

    if skipped > 0 {
        println!("Skipped {} non-triangle primitives", skipped);
    }

    ObjData {
        vertices: vertices.into_values().collect(),
        indices,
        normals: normals.into_iter().collect(),
        uvs: uvs.into_iter().collect(),
    }
}

/// Smooth shading normals collapsed to a single normal per triangle.
/// None if a vertex has no normal or if the normals cancel out.
fn average_normal(data: &[VertexData; 3]) -> Option<WorldVector> {
    data.iter()
        .map(|vertex| vertex.normal.and_then(|n| n.try_normalize(0.0)))
        .sum::<Option<WorldVector>>()?
        .try_normalize(EPSILON)
}
