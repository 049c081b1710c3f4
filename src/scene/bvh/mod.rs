mod building;
mod printing;
mod ray_bvh_intersection;

use std::num::NonZeroUsize;

use crate::geometry::{FloatType, WorldBox, WorldPoint};

use super::SharedShape;

pub use printing::BvhStatistics;

/// Nodes with at most this many shapes are not split any further.
pub const DEFAULT_LEAF_THRESHOLD: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(threshold) => threshold,
    None => panic!("leaf threshold must be non-zero"),
};

/// Radius reported for a scene with no shapes.
pub const DEFAULT_WORLD_RADIUS: FloatType = 100.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BuildSettings {
    pub leaf_threshold: NonZeroUsize,
}

impl Default for BuildSettings {
    fn default() -> Self {
        BuildSettings {
            leaf_threshold: DEFAULT_LEAF_THRESHOLD,
        }
    }
}

/// Binary tree of shapes, every node knows the box of everything below it.
pub enum BvhNode {
    Leaf {
        bounding_box: WorldBox,
        shapes: Vec<SharedShape>,
    },
    Inner {
        bounding_box: WorldBox,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    pub fn bounds(&self) -> &WorldBox {
        match self {
            BvhNode::Leaf { bounding_box, .. } => bounding_box,
            BvhNode::Inner { bounding_box, .. } => bounding_box,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }

    /// Number of levels of the tree, a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Inner { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl std::fmt::Debug for BvhNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BvhNode::Leaf {
                bounding_box,
                shapes,
            } => f
                .debug_struct("Leaf")
                .field("bounding_box", bounding_box)
                .field("<shape count>", &shapes.len())
                .finish(),
            BvhNode::Inner {
                bounding_box,
                left,
                right,
            } => f
                .debug_struct("Inner")
                .field("bounding_box", bounding_box)
                .field("left", left)
                .field("right", right)
                .finish(),
        }
    }
}

/// Top level hierarchy of a scene.
#[derive(Debug)]
pub struct Bvh {
    root: Option<BvhNode>,
    center: WorldPoint,
    radius: FloatType,
}

impl Bvh {
    pub fn build(shapes: Vec<SharedShape>) -> Bvh {
        Self::build_with_settings(shapes, &BuildSettings::default())
    }

    pub fn build_with_settings(shapes: Vec<SharedShape>, settings: &BuildSettings) -> Bvh {
        let root = BvhNode::build(shapes, settings);

        let (center, radius) = match &root {
            Some(root) => {
                let bounding_box = root.bounds();
                let center = bounding_box.center();
                (center, (bounding_box.max - center).norm())
            }
            None => (WorldPoint::origin(), DEFAULT_WORLD_RADIUS),
        };

        Bvh {
            root,
            center,
            radius,
        }
    }

    /// Builds from a snapshot of the shape handles, the slice itself is left alone.
    pub fn from_slice(shapes: &[SharedShape]) -> Bvh {
        Self::build(shapes.to_vec())
    }

    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    /// Center of the scene bounds
    pub fn center(&self) -> WorldPoint {
        self.center
    }

    /// Radius of a sphere around `center()` that contains the whole scene
    pub fn radius(&self) -> FloatType {
        self.radius
    }
}
