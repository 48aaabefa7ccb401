//! Exact primitive backend
//!
//! Keeps the model-space shape per object and tests world-space copies of it:
//! sphere/sphere, sphere/mesh and mesh/mesh (triangle SAT after a bounding
//! sphere rejection).

use super::validate_shape;
use crate::collision::detector::CollisionBackend;
use crate::collision::error::CollisionError;
use crate::collision::object::CollisionObject;
use crate::dynamics::ShapeFrame;
use crate::geometry::{CollisionShape, PrimitiveContact};

/// Backend testing the actual sphere and triangle mesh shapes
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveBackend;

impl PrimitiveBackend {
    /// Create the backend
    pub fn new() -> Self {
        Self
    }
}

impl CollisionBackend for PrimitiveBackend {
    type Geometry = CollisionShape;

    fn backend_type(&self) -> &'static str {
        "primitive"
    }

    fn create_geometry(&self, frame: &ShapeFrame) -> Result<CollisionShape, CollisionError> {
        validate_shape(frame)?;
        Ok(frame.shape().clone())
    }

    fn contact(&self, a: &CollisionObject<Self>, b: &CollisionObject<Self>) -> Option<PrimitiveContact> {
        let world_a = a.geometry().to_world_space(&a.world_transform());
        let world_b = b.geometry().to_world_space(&b.world_transform());

        // Broad phase
        if !world_a.bounding_sphere().intersects(&world_b.bounding_sphere()) {
            return None;
        }

        world_a.contact(&world_b)
    }
}
