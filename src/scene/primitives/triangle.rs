use bon::bon;
use nalgebra::Unit;

use crate::geometry::{
    self, EPSILON, FloatType, HitRecord, MaterialId, Ray, TexturePoint, WorldBox, WorldPoint,
    WorldVector,
};
use crate::scene::{Shape, ShapeError, in_range};

/// Single two sided triangle.
#[derive(Clone, Debug)]
pub struct Triangle {
    vertices: geometry::Triangle<WorldPoint>,
    /// None for zero area triangles without a custom normal, these never get hit
    normal: Option<Unit<WorldVector>>,
    uvs: Option<[TexturePoint; 3]>,
    material: MaterialId,
    bounding_box: WorldBox,
}

#[bon]
impl Triangle {
    /// Front side follows the custom normal if given, otherwise the counter clockwise winding
    /// of the vertices. A custom normal must be finite and non-zero.
    #[builder]
    pub fn new(
        #[builder(into)] vertices: geometry::Triangle<WorldPoint>,
        normal: Option<WorldVector>,
        uvs: Option<[TexturePoint; 3]>,
        material: MaterialId,
    ) -> Result<Self, ShapeError> {
        let normal = match normal {
            Some(normal) if normal.iter().all(|x| x.is_finite()) => {
                Some(Unit::try_new(normal, EPSILON).ok_or(ShapeError::ZeroNormal)?)
            }
            Some(_) => return Err(ShapeError::ZeroNormal),
            None => Unit::try_new(vertices.normal(), 0.0),
        };

        let bounding_box = WorldBox::from_points(vertices.iter()).unwrap_or_default();

        Ok(Triangle {
            vertices,
            normal,
            uvs,
            material,
            bounding_box,
        })
    }
}

impl Triangle {
    pub fn vertices(&self) -> &geometry::Triangle<WorldPoint> {
        &self.vertices
    }
}

impl Shape for Triangle {
    fn intersect(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        let normal = self.normal?;
        let (t, barycentric) = self.vertices.intersect(ray)?;
        if !in_range(t, t_min, t_max) {
            return None;
        }

        let uv = match &self.uvs {
            Some(uvs) => barycentric
                .interpolate(&uvs[0].coords, &uvs[1].coords, &uvs[2].coords)
                .into(),
            None => TexturePoint::new(barycentric.u, barycentric.v),
        };

        Some(HitRecord::from_outward_normal(
            ray,
            t,
            normal,
            self.material,
            Some(uv),
        ))
    }

    fn bounding_box(&self) -> WorldBox {
        self.bounding_box.clone()
    }
}
