pub mod geometry;
pub mod scene;
mod util;

pub use scene::bvh::{BuildSettings, Bvh, BvhNode, BvhStatistics};
pub use scene::primitives::{Cone, Cuboid, Cylinder, Disc, Plane, Quad, Sphere, Triangle};
pub use scene::triangle_mesh::{ObjOpenError, TriangleMesh};
pub use scene::{Shape, ShapeError, SharedShape, closest_hit};
pub use util::Stats;
