//! Collision object cache
//!
//! Every [`CollisionDetector`](super::CollisionDetector) owns exactly one
//! [`ObjectCache`]. Its only job is to decide, for a claimed shape frame,
//! whether an existing collision object can be handed out again or a new one
//! has to be built by the backend.
//!
//! Two policies exist and one is picked when the detector is constructed:
//!
//! - [`SharingPolicy::Exclusive`]: every claim builds a fresh object. Nothing
//!   is remembered, so teardown has no map to clean up.
//! - [`SharingPolicy::Shared`]: objects are deduplicated by
//!   [`ShapeFrameId`]. The cache keeps a `Weak` per frame, so it observes
//!   liveness without keeping anything alive; ownership stays entirely with
//!   the collision groups.
//!
//! # Teardown
//!
//! When the last `Arc<CollisionObject>` goes away the object's `Drop` routes
//! to [`ObjectCache::release`]. Under the shared policy that removes the map
//! entry, but only if the entry still points at the dying object. Between the
//! strong count reaching zero and `Drop` running, a concurrent (or re-entrant)
//! claim cannot upgrade the dying entry, treats it as a miss and installs a
//! successor; the late release must leave that successor alone.
//!
//! Claim (lookup, maybe construct, insert) and release (check, remove) each run
//! under the same mutex, so they are atomic with respect to each other.

use std::collections::HashMap;
use std::fmt;
use std::ptr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};

use super::detector::CollisionBackend;
use super::error::CollisionError;
use super::object::CollisionObject;
use crate::dynamics::{ShapeFrame, ShapeFrameId};

/// Ownership policy of an [`ObjectCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharingPolicy {
    /// One object per claim, never shared between groups
    Exclusive,
    /// One object per live frame, shared by every group that claims it
    #[default]
    Shared,
}

impl fmt::Display for SharingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exclusive => f.write_str("exclusive"),
            Self::Shared => f.write_str("shared"),
        }
    }
}

/// How a claim was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClaimOutcome {
    /// The backend built a new object
    Created,
    /// A live object was handed out again
    Reused,
}

/// The object cache of one detector, fixed to a single policy
pub enum ObjectCache<B: CollisionBackend> {
    /// No deduplication
    Exclusive,
    /// Deduplication by frame identity
    Shared(SharedObjectCache<B>),
}

impl<B: CollisionBackend> ObjectCache<B> {
    /// Create an empty cache for the given policy
    pub fn new(policy: SharingPolicy) -> Self {
        match policy {
            SharingPolicy::Exclusive => Self::Exclusive,
            SharingPolicy::Shared => Self::Shared(SharedObjectCache::new()),
        }
    }

    /// The policy this cache was built with
    pub fn policy(&self) -> SharingPolicy {
        match self {
            Self::Exclusive => SharingPolicy::Exclusive,
            Self::Shared(_) => SharingPolicy::Shared,
        }
    }

    /// Number of frames with a map entry (always 0 for the exclusive policy)
    pub fn len(&self) -> usize {
        match self {
            Self::Exclusive => 0,
            Self::Shared(cache) => cache.len(),
        }
    }

    /// Whether no map entries exist
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Claim the object for `frame`, calling `create` on a miss
    ///
    /// `create` must not drop a `CollisionObject` of this detector or claim
    /// through it: under the shared policy it runs with the map locked.
    pub(crate) fn claim<F>(
        &self,
        frame: &ShapeFrame,
        create: F,
    ) -> Result<(Arc<CollisionObject<B>>, ClaimOutcome), CollisionError>
    where
        F: FnOnce() -> Result<Arc<CollisionObject<B>>, CollisionError>,
    {
        match self {
            Self::Exclusive => create().map(|object| (object, ClaimOutcome::Created)),
            Self::Shared(cache) => cache.claim(frame.id(), create),
        }
    }

    /// Teardown hook, called once from the dying object's `Drop`
    pub(crate) fn release(&self, object: &CollisionObject<B>) {
        if let Self::Shared(cache) = self {
            cache.release(object);
        }
    }
}

impl<B: CollisionBackend> fmt::Debug for ObjectCache<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectCache")
            .field("policy", &self.policy())
            .field("entries", &self.len())
            .finish()
    }
}

/// Canonicalizing weak map from frame identity to its live collision object
pub struct SharedObjectCache<B: CollisionBackend> {
    objects: Mutex<HashMap<ShapeFrameId, Weak<CollisionObject<B>>>>,
}

impl<B: CollisionBackend> SharedObjectCache<B> {
    fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
        }
    }

    // Every critical section leaves the map consistent, so a poisoned lock
    // is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashMap<ShapeFrameId, Weak<CollisionObject<B>>>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn claim<F>(
        &self,
        frame: ShapeFrameId,
        create: F,
    ) -> Result<(Arc<CollisionObject<B>>, ClaimOutcome), CollisionError>
    where
        F: FnOnce() -> Result<Arc<CollisionObject<B>>, CollisionError>,
    {
        let mut objects = self.lock();

        if let Some(existing) = objects.get(&frame).and_then(Weak::upgrade) {
            log::trace!("Reusing collision object for {}", frame);
            return Ok((existing, ClaimOutcome::Reused));
        }

        // A failed construction returns here with the old entry untouched
        let object = create()?;

        if objects.insert(frame, Arc::downgrade(&object)).is_some() {
            log::trace!("Replaced dying collision object entry for {}", frame);
        }

        Ok((object, ClaimOutcome::Created))
    }

    fn release(&self, object: &CollisionObject<B>) {
        let frame = object.frame_id();
        let mut objects = self.lock();

        match objects.get(&frame) {
            Some(entry) if ptr::eq(entry.as_ptr(), object) => {
                debug_assert_eq!(
                    entry.strong_count(),
                    0,
                    "released collision object for {frame} still has owners"
                );
                objects.remove(&frame);
                log::trace!("Removed collision object entry for {}", frame);
            }
            Some(_) => {
                log::trace!("Collision object for {} was superseded, keeping entry", frame);
            }
            None => {
                log::trace!("No collision object entry left for {}", frame);
            }
        }
    }
}
