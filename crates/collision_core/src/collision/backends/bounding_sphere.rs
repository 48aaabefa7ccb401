//! Bounding sphere backend
//!
//! The cheapest broad-phase style backend: every shape is reduced to the
//! sphere around its frame origin that encloses it.

use super::validate_shape;
use crate::collision::detector::CollisionBackend;
use crate::collision::error::CollisionError;
use crate::collision::object::CollisionObject;
use crate::dynamics::ShapeFrame;
use crate::geometry::{BoundingSphere, PrimitiveContact};

/// Backend testing frames by their bounding spheres only
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingSphereBackend;

impl BoundingSphereBackend {
    /// Create the backend
    pub fn new() -> Self {
        Self
    }

    fn world_sphere(object: &CollisionObject<Self>) -> BoundingSphere {
        let transform = object.world_transform();
        BoundingSphere::new(transform.position, object.geometry() * transform.max_scale())
    }
}

impl CollisionBackend for BoundingSphereBackend {
    /// Model-space bounding radius
    type Geometry = f32;

    fn backend_type(&self) -> &'static str {
        "bounding_sphere"
    }

    fn create_geometry(&self, frame: &ShapeFrame) -> Result<f32, CollisionError> {
        validate_shape(frame)?;
        Ok(frame.shape().local_bounding_radius())
    }

    fn contact(&self, a: &CollisionObject<Self>, b: &CollisionObject<Self>) -> Option<PrimitiveContact> {
        Self::world_sphere(a).contact(&Self::world_sphere(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionDetector, SharingPolicy};
    use crate::foundation::math::{Transform, Vec3};
    use crate::geometry::CollisionShape;
    use approx::assert_relative_eq;

    #[test]
    fn test_geometry_is_local_radius() {
        let backend = BoundingSphereBackend::new();
        let frame = ShapeFrame::new("box", CollisionShape::cuboid(Vec3::new(1.0, 2.0, 2.0)), Transform::identity());

        let radius = backend.create_geometry(&frame).unwrap();
        assert_relative_eq!(radius, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_overlapping_spheres_collide() {
        let detector = CollisionDetector::new(BoundingSphereBackend::new(), SharingPolicy::Shared);
        let a = ShapeFrame::new("a", CollisionShape::sphere(1.0), Transform::identity());
        let b = ShapeFrame::new(
            "b",
            CollisionShape::sphere(1.0),
            Transform::from_translation(Vec3::new(1.5, 0.0, 0.0)),
        );

        let obj_a = detector.claim_collision_object(&a).unwrap();
        let obj_b = detector.claim_collision_object(&b).unwrap();

        let contact = detector.backend().contact(&obj_a, &obj_b).unwrap();
        assert_relative_eq!(contact.depth, 0.5, epsilon = 1e-5);
        // Normal points from b towards a
        assert!(contact.normal.x < 0.0);
    }

    #[test]
    fn test_moving_frame_changes_result() {
        let detector = CollisionDetector::new(BoundingSphereBackend::new(), SharingPolicy::Shared);
        let a = ShapeFrame::new("a", CollisionShape::sphere(1.0), Transform::identity());
        let b = ShapeFrame::new(
            "b",
            CollisionShape::sphere(1.0),
            Transform::from_translation(Vec3::new(5.0, 0.0, 0.0)),
        );

        let obj_a = detector.claim_collision_object(&a).unwrap();
        let obj_b = detector.claim_collision_object(&b).unwrap();
        assert!(detector.backend().contact(&obj_a, &obj_b).is_none());

        b.set_world_transform(Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        assert!(detector.backend().contact(&obj_a, &obj_b).is_some());
    }
}
