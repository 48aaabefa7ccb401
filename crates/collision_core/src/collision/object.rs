//! Backend-specific collision objects

use std::fmt;
use std::sync::Arc;

use super::detector::{CollisionBackend, CollisionDetector};
use crate::dynamics::{ShapeFrame, ShapeFrameId};
use crate::foundation::math::Transform;

/// The collision representation of one shape frame for one detector
///
/// Objects are only created by their detector and only handed out as
/// `Arc<CollisionObject<B>>`. Dropping the last `Arc` tears the object down:
/// the backend is notified first, then the detector's cache forgets it.
pub struct CollisionObject<B: CollisionBackend> {
    detector: Arc<CollisionDetector<B>>,
    frame: Arc<ShapeFrame>,
    geometry: B::Geometry,
}

impl<B: CollisionBackend> CollisionObject<B> {
    pub(crate) fn new(detector: Arc<CollisionDetector<B>>, frame: Arc<ShapeFrame>, geometry: B::Geometry) -> Self {
        Self {
            detector,
            frame,
            geometry,
        }
    }

    /// The frame this object was built from
    pub fn shape_frame(&self) -> &Arc<ShapeFrame> {
        &self.frame
    }

    /// Identity of the frame this object was built from
    pub fn frame_id(&self) -> ShapeFrameId {
        self.frame.id()
    }

    /// Current world transform of the frame
    pub fn world_transform(&self) -> Transform {
        self.frame.world_transform()
    }

    /// Backend data built when the object was created
    pub fn geometry(&self) -> &B::Geometry {
        &self.geometry
    }

    /// Detector that created this object
    pub fn detector(&self) -> &Arc<CollisionDetector<B>> {
        &self.detector
    }
}

impl<B: CollisionBackend> Drop for CollisionObject<B> {
    fn drop(&mut self) {
        self.detector.release_collision_object(self);
    }
}

impl<B: CollisionBackend> fmt::Debug for CollisionObject<B>
where
    B::Geometry: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionObject")
            .field("backend", &self.detector.backend_type())
            .field("frame", &self.frame)
            .field("geometry", &self.geometry)
            .finish()
    }
}
