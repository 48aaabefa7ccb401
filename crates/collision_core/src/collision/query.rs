//! Collision query option and result types

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dynamics::ShapeFrameId;
use crate::foundation::math::Vec3;

/// Caller-supplied settings for a collision query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionOption {
    /// Record full contact data; when false only the colliding frames are kept
    pub enable_contact: bool,
    /// Stop the query once this many colliding pairs were found (0 runs nothing)
    pub max_num_contacts: usize,
}

impl Default for CollisionOption {
    fn default() -> Self {
        Self {
            enable_contact: true,
            max_num_contacts: 1000,
        }
    }
}

impl CollisionOption {
    /// Create an option
    pub fn new(enable_contact: bool, max_num_contacts: usize) -> Self {
        Self {
            enable_contact,
            max_num_contacts,
        }
    }

    /// Stop at the first colliding pair and skip contact data
    pub fn binary_check() -> Self {
        Self::new(false, 1)
    }
}

/// A single contact between two frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact point in world space
    pub point: Vec3,
    /// Unit normal pointing from `frame2` towards `frame1`
    pub normal: Vec3,
    /// Overlap along the normal
    pub penetration_depth: f32,
    /// First frame of the pair
    pub frame1: ShapeFrameId,
    /// Second frame of the pair
    pub frame2: ShapeFrameId,
}

/// Accumulated output of one or more collision queries
#[derive(Debug, Clone, Default)]
pub struct CollisionResult {
    contacts: Vec<Contact>,
    colliding_frames: HashSet<ShapeFrameId>,
}

impl CollisionResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a contact; its frames are marked as colliding
    pub fn add_contact(&mut self, contact: Contact) {
        self.add_colliding_pair(contact.frame1, contact.frame2);
        self.contacts.push(contact);
    }

    /// Mark a pair as colliding without contact data
    pub fn add_colliding_pair(&mut self, frame1: ShapeFrameId, frame2: ShapeFrameId) {
        self.colliding_frames.insert(frame1);
        self.colliding_frames.insert(frame2);
    }

    /// Number of recorded contacts
    pub fn num_contacts(&self) -> usize {
        self.contacts.len()
    }

    /// Recorded contacts in query order
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Whether any pair collided
    pub fn is_collision(&self) -> bool {
        !self.colliding_frames.is_empty()
    }

    /// Whether the given frame took part in any collision
    pub fn in_collision(&self, frame: ShapeFrameId) -> bool {
        self.colliding_frames.contains(&frame)
    }

    /// Frames that took part in any collision
    pub fn colliding_frames(&self) -> impl Iterator<Item = ShapeFrameId> + '_ {
        self.colliding_frames.iter().copied()
    }

    /// Forget everything recorded so far
    pub fn clear(&mut self) {
        self.contacts.clear();
        self.colliding_frames.clear();
    }
}
