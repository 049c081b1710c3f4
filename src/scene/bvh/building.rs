use assert2::debug_assert;

use crate::geometry::{FloatType, WorldBox, WorldPoint};
use crate::scene::SharedShape;

use super::{BuildSettings, BvhNode};

/// Shape together with the data the split needs, computed once per build.
struct BuildItem {
    shape: SharedShape,
    bounding_box: WorldBox,
    center: WorldPoint,
}

impl BuildItem {
    fn new(shape: SharedShape) -> BuildItem {
        let bounding_box = shape.bounding_box();
        let center = bounding_box.center();
        BuildItem {
            shape,
            bounding_box,
            center,
        }
    }
}

impl BvhNode {
    /// Builds a tree over the shapes, returns None if there are no shapes.
    pub fn build(shapes: Vec<SharedShape>, settings: &BuildSettings) -> Option<BvhNode> {
        let mut items: Vec<BuildItem> = shapes.into_iter().map(BuildItem::new).collect();
        build_recursive(&mut items, settings)
    }
}

fn build_recursive(items: &mut [BuildItem], settings: &BuildSettings) -> Option<BvhNode> {
    let bounding_box = items
        .iter()
        .map(|item| item.bounding_box.clone())
        .reduce(|a, b| a.union(&b))?;

    if items.len() <= settings.leaf_threshold.get() {
        return Some(build_leaf(items, bounding_box));
    }

    let axis = bounding_box.longest_axis().index();
    let Some(split) = split_position(&bounding_box, axis) else {
        return Some(build_leaf(items, bounding_box));
    };

    let left_count = itertools::partition(items.iter_mut(), |item| item.center[axis] < split);
    if left_count == 0 || left_count == items.len() {
        // All centers on one side, splitting here would recurse forever
        return Some(build_leaf(items, bounding_box));
    }

    let (left_items, right_items) = items.split_at_mut(left_count);
    let left = build_recursive(left_items, settings)?;
    let right = build_recursive(right_items, settings)?;
    debug_assert!(bounding_box.contains_box(left.bounds()) && bounding_box.contains_box(right.bounds()));

    Some(BvhNode::Inner {
        bounding_box: left.bounds().union(right.bounds()),
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// Midpoint of the box along the axis, None if there is nothing to split.
fn split_position(bounding_box: &WorldBox, axis: usize) -> Option<FloatType> {
    let extent = bounding_box.max[axis] - bounding_box.min[axis];
    if !(extent > 0.0) {
        return None;
    }

    let split = bounding_box.min[axis] + extent * 0.5;
    split.is_finite().then_some(split)
}

fn build_leaf(items: &[BuildItem], bounding_box: WorldBox) -> BvhNode {
    BvhNode::Leaf {
        bounding_box,
        shapes: items.iter().map(|item| item.shape.clone()).collect(),
    }
}
