//! Shape frames: the handles collision detectors key their objects by
//!
//! A frame owns a model-space [`CollisionShape`] and a world transform that the
//! kinematics side updates between queries. Collision code treats a frame as
//! an opaque identity ([`ShapeFrameId`]) and only the backends read its
//! geometry.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::foundation::math::Transform;
use crate::geometry::CollisionShape;

static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`ShapeFrame`]
///
/// Ids are never reused, so two frames with identical shapes and transforms
/// still compare unequal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeFrameId(u64);

impl ShapeFrameId {
    fn next() -> Self {
        Self(NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShapeFrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// A collidable shape placed in the world
pub struct ShapeFrame {
    id: ShapeFrameId,
    name: String,
    shape: CollisionShape,
    world_transform: RwLock<Transform>,
}

impl ShapeFrame {
    /// Create a new frame and return the shared handle to it
    pub fn new(name: impl Into<String>, shape: CollisionShape, world_transform: Transform) -> Arc<Self> {
        let frame = Arc::new(Self {
            id: ShapeFrameId::next(),
            name: name.into(),
            shape,
            world_transform: RwLock::new(world_transform),
        });
        log::trace!("Created shape frame '{}' ({})", frame.name, frame.id);
        frame
    }

    /// Identity used as the collision cache key
    pub fn id(&self) -> ShapeFrameId {
        self.id
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Model-space shape
    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    /// Current world transform
    pub fn world_transform(&self) -> Transform {
        *self.world_transform.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the frame
    pub fn set_world_transform(&self, transform: Transform) {
        *self.world_transform.write().unwrap_or_else(PoisonError::into_inner) = transform;
    }
}

impl fmt::Debug for ShapeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeFrame")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("shape", &self.shape.kind())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_ids_are_unique_for_identical_frames() {
        let a = ShapeFrame::new("a", CollisionShape::sphere(1.0), Transform::identity());
        let b = ShapeFrame::new("a", CollisionShape::sphere(1.0), Transform::identity());

        assert_ne!(a.id(), b.id());
        assert_eq!(a.shape(), b.shape());
    }

    #[test]
    fn test_set_world_transform() {
        let frame = ShapeFrame::new("mover", CollisionShape::sphere(1.0), Transform::identity());
        let target = Transform::from_translation(Vec3::new(0.0, 3.0, 0.0));

        frame.set_world_transform(target);
        assert_eq!(frame.world_transform(), target);
    }

    #[test]
    fn test_debug_output_names_frame() {
        let frame = ShapeFrame::new("crate", CollisionShape::sphere(1.0), Transform::identity());
        let debug = format!("{frame:?}");
        assert!(debug.contains("crate"));
        assert!(debug.contains("Sphere"));
    }
}
