use crate::scene::Shape as _;
use crate::util::Stats;

use super::{Bvh, BvhNode};

/// Shape of a built tree, for tuning the leaf threshold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BvhStatistics {
    pub inner_count: usize,
    pub leaf_count: usize,
    /// Depth at which each leaf sits, root leaf has depth 1
    pub depth: Stats,
    /// Number of shapes per leaf
    pub leaf_fill: Stats,
}

impl Bvh {
    pub fn print_tree(&self) {
        match &self.root {
            Some(root) => print_recursive(0, root),
            None => println!("<EMPTY>"),
        }
    }

    pub fn print_statistics(&self) {
        let statistics = self.statistics();
        let bounding_box = self.bounding_box();
        println!(
            "Bounds: {:?}; surface area {:.1}",
            bounding_box.size(),
            bounding_box.surface_area()
        );
        println!(
            "Nodes: {} inner, {} leaf",
            statistics.inner_count, statistics.leaf_count
        );
        println!("Depth: {}", statistics.depth);
        println!("Leaf nodes fill: {}", statistics.leaf_fill);
    }

    pub fn statistics(&self) -> BvhStatistics {
        let Some(root) = &self.root else {
            return BvhStatistics::default();
        };

        let mut leaf_fills = Vec::new();
        let inner_count = count_recursive(root, &mut leaf_fills);

        let mut leaf_fill = Stats::default();
        leaf_fill.add_samples(leaf_fills.iter().copied());

        BvhStatistics {
            inner_count,
            leaf_count: leaf_fills.len(),
            depth: depth_statistics_recursive(root),
            leaf_fill,
        }
    }
}

fn depth_statistics_recursive(node: &BvhNode) -> Stats {
    let BvhNode::Inner { left, right, .. } = node else {
        return Stats::new_single(1);
    };

    let mut ret = depth_statistics_recursive(left).merge(&depth_statistics_recursive(right));

    ret.min += 1;
    ret.max += 1;
    ret.avg += 1.0;

    ret
}

/// Returns the number of inner nodes, shape counts of the leaves go to `leaf_fills`.
fn count_recursive(node: &BvhNode, leaf_fills: &mut Vec<usize>) -> usize {
    match node {
        BvhNode::Leaf { shapes, .. } => {
            leaf_fills.push(shapes.len());
            0
        }
        BvhNode::Inner { left, right, .. } => {
            1 + count_recursive(left, leaf_fills) + count_recursive(right, leaf_fills)
        }
    }
}

fn print_recursive(indent: usize, node: &BvhNode) {
    let bounding_box = node.bounds();
    match node {
        BvhNode::Leaf { shapes, .. } => println!(
            "{}- L{}: {:?}-{:?}",
            "  ".repeat(indent),
            shapes.len(),
            bounding_box.min,
            bounding_box.max,
        ),
        BvhNode::Inner { left, right, .. } => {
            println!(
                "{}- I: {:?}-{:?}",
                "  ".repeat(indent),
                bounding_box.min,
                bounding_box.max,
            );
            print_recursive(indent + 1, left);
            print_recursive(indent + 1, right);
        }
    }
}
