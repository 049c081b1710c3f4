mod cone;
mod cuboid;
mod cylinder;
mod disc;
mod plane;
mod quad;
mod sphere;
mod triangle;

pub use cone::Cone;
pub use cuboid::Cuboid;
pub use cylinder::Cylinder;
pub use disc::Disc;
pub use plane::Plane;
pub use quad::Quad;
pub use sphere::Sphere;
pub use triangle::Triangle;

pub(crate) use disc::disc_bounds;
