//! Reference collision backends
//!
//! Both backends read geometry straight from the frame's [`CollisionShape`] and
//! reject the same degenerate shapes at construction time.

mod bounding_sphere;
mod primitive;

pub use bounding_sphere::BoundingSphereBackend;
pub use primitive::PrimitiveBackend;

use super::error::CollisionError;
use crate::dynamics::ShapeFrame;
use crate::geometry::CollisionShape;

/// Reject shapes no backend can build an object from
fn validate_shape(frame: &ShapeFrame) -> Result<(), CollisionError> {
    match frame.shape() {
        CollisionShape::Sphere(radius) if !radius.is_finite() || *radius <= 0.0 => {
            Err(CollisionError::InvalidRadius {
                frame: frame.name().to_string(),
                radius: *radius,
            })
        }
        CollisionShape::Mesh(template) if template.is_empty() => Err(CollisionError::EmptyMesh {
            frame: frame.name().to_string(),
        }),
        _ => Ok(()),
    }
}
