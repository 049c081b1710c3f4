use crate::geometry::{FloatType, HitRecord, Ray, RayIntersectionExt as _, WorldBox};
use crate::scene::{Shape, closest_hit};

use super::{Bvh, BvhNode};

impl Shape for BvhNode {
    fn intersect(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        if !self.bounds().hit(ray, t_min, t_max) {
            return None;
        }

        match self {
            BvhNode::Leaf { shapes, .. } => closest_hit(shapes.iter(), ray, t_min, t_max),
            BvhNode::Inner { left, right, .. } => {
                let left_hit = left.intersect(ray, t_min, t_max);
                // Right subtree only has to beat what the left one found
                let t_max = left_hit.as_ref().map_or(t_max, |hit| hit.t);
                right.intersect(ray, t_min, t_max).or(left_hit)
            }
        }
    }

    fn bounding_box(&self) -> WorldBox {
        self.bounds().clone()
    }
}

impl Shape for Bvh {
    fn intersect(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        self.root.as_ref()?.intersect(ray, t_min, t_max)
    }

    /// Zero sized box at the origin for an empty scene.
    fn bounding_box(&self) -> WorldBox {
        self.root
            .as_ref()
            .map_or_else(WorldBox::default, |root| root.bounds().clone())
    }
}
