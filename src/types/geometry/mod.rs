mod bounding_box;
mod mesh;
mod normals;
mod vec3f;

pub use bounding_box::*;
pub use mesh::*;
pub use normals::*;
pub use vec3f::*;
