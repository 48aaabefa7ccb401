//! Collision groups
//!
//! A group is the set of collision objects tested together in one query. It
//! owns its objects: adding a frame claims an object from the detector,
//! removing it (or dropping the group) gives that ownership back.

use std::fmt;
use std::sync::Arc;

use super::detector::{CollisionBackend, CollisionDetector};
use super::error::CollisionError;
use super::object::CollisionObject;
use super::query::{CollisionOption, CollisionResult};
use crate::dynamics::ShapeFrame;

/// A set of shape frames tested together
pub struct CollisionGroup<B: CollisionBackend> {
    detector: Arc<CollisionDetector<B>>,
    objects: Vec<Arc<CollisionObject<B>>>,
}

impl<B: CollisionBackend> CollisionGroup<B> {
    pub(crate) fn new(detector: Arc<CollisionDetector<B>>) -> Self {
        Self {
            detector,
            objects: Vec::new(),
        }
    }

    /// Detector this group claims its objects from
    pub fn detector(&self) -> &Arc<CollisionDetector<B>> {
        &self.detector
    }

    /// Add a frame; does nothing if the frame is already in the group
    pub fn add_shape_frame(&mut self, frame: &Arc<ShapeFrame>) -> Result<(), CollisionError> {
        if self.has_shape_frame(frame) {
            return Ok(());
        }

        let object = self.detector.claim_collision_object(frame)?;
        self.objects.push(object);
        Ok(())
    }

    /// Add several frames, stopping at the first construction failure
    ///
    /// Frames added before the failure stay in the group.
    pub fn add_shape_frames<'a, I>(&mut self, frames: I) -> Result<(), CollisionError>
    where
        I: IntoIterator<Item = &'a Arc<ShapeFrame>>,
    {
        frames.into_iter().try_for_each(|frame| self.add_shape_frame(frame))
    }

    /// Remove a frame, releasing the group's object for it
    ///
    /// Returns whether the frame was in the group.
    pub fn remove_shape_frame(&mut self, frame: &ShapeFrame) -> bool {
        let id = frame.id();
        match self.objects.iter().position(|object| object.frame_id() == id) {
            Some(index) => {
                self.objects.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every frame
    pub fn remove_all_shape_frames(&mut self) {
        self.objects.clear();
    }

    /// Whether the frame is in the group
    pub fn has_shape_frame(&self, frame: &ShapeFrame) -> bool {
        let id = frame.id();
        self.objects.iter().any(|object| object.frame_id() == id)
    }

    /// Number of frames in the group
    pub fn num_shape_frames(&self) -> usize {
        self.objects.len()
    }

    /// Whether the group holds no frames
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Frames in the group
    pub fn shape_frames(&self) -> impl Iterator<Item = &Arc<ShapeFrame>> {
        self.objects.iter().map(|object| object.shape_frame())
    }

    /// Collision objects owned by the group
    pub fn collision_objects(&self) -> impl Iterator<Item = &Arc<CollisionObject<B>>> {
        self.objects.iter()
    }

    pub(crate) fn objects(&self) -> &[Arc<CollisionObject<B>>] {
        &self.objects
    }

    /// Test the frames of this group against each other
    pub fn collide(&self, option: &CollisionOption, result: &mut CollisionResult) -> bool {
        self.detector.collide(self, option, result)
    }

    /// Test the frames of this group against those of `other`
    pub fn collide_with(&self, other: &Self, option: &CollisionOption, result: &mut CollisionResult) -> bool {
        self.detector.collide_groups(self, other, option, result)
    }
}

impl<B: CollisionBackend> fmt::Debug for CollisionGroup<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionGroup")
            .field("backend", &self.detector.backend_type())
            .field("frames", &self.objects.iter().map(|o| o.frame_id()).collect::<Vec<_>>())
            .finish()
    }
}
