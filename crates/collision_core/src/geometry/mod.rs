//! Geometric primitives used by the reference collision backends
//!
//! - [`primitives`] - Bounding spheres and triangles
//! - [`mesh`] - Triangle meshes in model and world space
//! - [`shape`] - The shape attached to a frame

pub mod mesh;
pub mod primitives;
pub mod shape;

pub use mesh::{CollisionMeshTemplate, WorldSpaceCollisionMesh};
pub use primitives::{BoundingSphere, PrimitiveContact, Triangle};
pub use shape::{CollisionShape, ShapeKind, WorldSpaceShape};
