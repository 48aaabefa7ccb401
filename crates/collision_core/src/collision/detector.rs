//! Collision detectors and the backend contract
//!
//! A [`CollisionDetector`] pairs one [`CollisionBackend`] (the engine that knows
//! how to build and test geometry) with one [`ObjectCache`] whose sharing
//! policy is fixed at construction. Groups claim collision objects through the
//! detector and never see the policy.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::cache::{ClaimOutcome, ObjectCache, SharingPolicy};
use super::error::CollisionError;
use super::group::CollisionGroup;
use super::object::CollisionObject;
use super::query::{CollisionOption, CollisionResult, Contact};
use crate::config::{Config, DetectorConfig};
use crate::dynamics::ShapeFrame;
use crate::geometry::PrimitiveContact;

/// A collision detection engine
///
/// Implementations build backend geometry for frames and test pairs of
/// objects. They hold no cache logic of their own; deduplication and
/// lifetime are handled by the owning [`CollisionDetector`].
pub trait CollisionBackend: Send + Sync + Sized + 'static {
    /// Per-object data built from a frame
    type Geometry: Send + Sync + 'static;

    /// Engine type string, e.g. `"bounding_sphere"`
    fn backend_type(&self) -> &'static str;

    /// Build the geometry for `frame`
    ///
    /// Must be a pure construction: it runs while the shared cache is locked,
    /// so it must not claim or drop collision objects of the same detector.
    fn create_geometry(&self, frame: &ShapeFrame) -> Result<Self::Geometry, CollisionError>;

    /// Called when an object is about to be destroyed, before the cache
    /// forgets it. Does nothing by default.
    fn notify_object_destroying(&self, _object: &CollisionObject<Self>) {}

    /// Test two objects at their frames' current transforms
    ///
    /// The contact normal points from `b` towards `a`.
    fn contact(&self, a: &CollisionObject<Self>, b: &CollisionObject<Self>) -> Option<PrimitiveContact>;
}

/// Snapshot of a detector's object bookkeeping
///
/// A creation is counted before the new object is handed out, and snapshots
/// read the destroyed counter first, so `objects_created` never trails
/// `objects_destroyed` even while other threads claim and drop concurrently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectorStats {
    /// Objects built by the backend
    pub objects_created: u64,
    /// Objects torn down
    pub objects_destroyed: u64,
    /// Claims answered with an existing object
    pub cache_hits: u64,
    /// Claims that failed in the backend
    pub construction_failures: u64,
}

impl DetectorStats {
    /// Objects currently alive
    pub fn live_objects(&self) -> u64 {
        self.objects_created.saturating_sub(self.objects_destroyed)
    }
}

#[derive(Default)]
struct StatCounters {
    objects_created: AtomicU64,
    objects_destroyed: AtomicU64,
    cache_hits: AtomicU64,
    construction_failures: AtomicU64,
}

impl StatCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::AcqRel);
    }

    fn snapshot(&self) -> DetectorStats {
        let objects_destroyed = self.objects_destroyed.load(Ordering::Acquire);
        DetectorStats {
            objects_created: self.objects_created.load(Ordering::Acquire),
            objects_destroyed,
            cache_hits: self.cache_hits.load(Ordering::Acquire),
            construction_failures: self.construction_failures.load(Ordering::Acquire),
        }
    }
}

/// A backend together with the object cache it owns
pub struct CollisionDetector<B: CollisionBackend> {
    backend: B,
    cache: ObjectCache<B>,
    default_option: CollisionOption,
    stats: StatCounters,
}

impl<B: CollisionBackend> CollisionDetector<B> {
    /// Create a detector whose cache uses `sharing_policy` for its whole lifetime
    pub fn new(backend: B, sharing_policy: SharingPolicy) -> Arc<Self> {
        Self::from_config(backend, &DetectorConfig::new(sharing_policy))
    }

    /// Create a detector from loaded settings
    pub fn from_config(backend: B, config: &DetectorConfig) -> Arc<Self> {
        log::info!(
            "Creating {} collision detector with {} object sharing",
            backend.backend_type(),
            config.sharing_policy
        );
        Arc::new(Self {
            backend,
            cache: ObjectCache::new(config.sharing_policy),
            default_option: config.collision,
            stats: StatCounters::default(),
        })
    }

    /// Create a detector from a TOML or RON settings file
    pub fn from_config_file(backend: B, path: impl AsRef<Path>) -> Result<Arc<Self>, CollisionError> {
        let config = DetectorConfig::load_from_file(path)?;
        Ok(Self::from_config(backend, &config))
    }

    /// The backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Engine type string of the backend
    pub fn backend_type(&self) -> &'static str {
        self.backend.backend_type()
    }

    /// Sharing policy chosen at construction
    pub fn sharing_policy(&self) -> SharingPolicy {
        self.cache.policy()
    }

    /// Query option from the detector's configuration
    pub fn default_option(&self) -> &CollisionOption {
        &self.default_option
    }

    /// Bookkeeping counters
    pub fn stats(&self) -> DetectorStats {
        self.stats.snapshot()
    }

    /// Number of frames the cache currently maps (0 for exclusive sharing)
    pub fn cached_object_count(&self) -> usize {
        self.cache.len()
    }

    /// Claim the collision object for `frame`
    ///
    /// Under shared sharing a live object for the same frame is returned
    /// again; otherwise the backend builds a new one. Backend failures are
    /// returned as-is and leave the cache untouched.
    pub fn claim_collision_object(
        self: &Arc<Self>,
        frame: &Arc<ShapeFrame>,
    ) -> Result<Arc<CollisionObject<B>>, CollisionError> {
        // The object is only assembled once the geometry exists: dropping a
        // half-built object here would re-enter the locked cache.
        let claimed = self.cache.claim(frame, || {
            let geometry = self.backend.create_geometry(frame)?;
            StatCounters::bump(&self.stats.objects_created);
            Ok(Arc::new(CollisionObject::new(
                Arc::clone(self),
                Arc::clone(frame),
                geometry,
            )))
        });

        match claimed {
            Ok((object, ClaimOutcome::Created)) => {
                log::debug!(
                    "Created {} collision object for '{}' ({})",
                    self.backend_type(),
                    frame.name(),
                    frame.id()
                );
                Ok(object)
            }
            Ok((object, ClaimOutcome::Reused)) => {
                StatCounters::bump(&self.stats.cache_hits);
                Ok(object)
            }
            Err(err) => {
                StatCounters::bump(&self.stats.construction_failures);
                log::warn!("Failed to create collision object for '{}': {}", frame.name(), err);
                Err(err)
            }
        }
    }

    /// Create an empty collision group bound to this detector
    pub fn create_collision_group(self: &Arc<Self>) -> CollisionGroup<B> {
        CollisionGroup::new(Arc::clone(self))
    }

    /// Create a collision group holding the given frames
    ///
    /// Only the frames passed now are added; later changes to the caller's
    /// collection do not affect the group.
    pub fn create_collision_group_from<'a, I>(self: &Arc<Self>, frames: I) -> Result<CollisionGroup<B>, CollisionError>
    where
        I: IntoIterator<Item = &'a Arc<ShapeFrame>>,
    {
        let mut group = self.create_collision_group();
        group.add_shape_frames(frames)?;
        Ok(group)
    }

    /// Test every distinct pair inside `group`
    ///
    /// Returns whether this call found any collision. Contacts are appended to
    /// `result`; at most `option.max_num_contacts` pairs are recorded.
    pub fn collide(&self, group: &CollisionGroup<B>, option: &CollisionOption, result: &mut CollisionResult) -> bool {
        if !self.owns(group) {
            log::warn!("Collision group belongs to another detector, skipping query");
            return false;
        }

        let objects = group.objects();
        let pairs = objects
            .iter()
            .enumerate()
            .flat_map(move |(i, a)| objects[i + 1..].iter().map(move |b| (a, b)));

        self.collide_pairs(pairs, option, result)
    }

    /// Test every pair made of one object from each group
    ///
    /// A frame present in both groups is never tested against itself.
    pub fn collide_groups(
        &self,
        group1: &CollisionGroup<B>,
        group2: &CollisionGroup<B>,
        option: &CollisionOption,
        result: &mut CollisionResult,
    ) -> bool {
        if !self.owns(group1) || !self.owns(group2) {
            log::warn!("Collision group belongs to another detector, skipping query");
            return false;
        }

        let pairs = group1
            .objects()
            .iter()
            .flat_map(move |a| group2.objects().iter().map(move |b| (a, b)));

        self.collide_pairs(pairs, option, result)
    }

    fn collide_pairs<'a, I>(&self, pairs: I, option: &CollisionOption, result: &mut CollisionResult) -> bool
    where
        I: Iterator<Item = (&'a Arc<CollisionObject<B>>, &'a Arc<CollisionObject<B>>)>,
    {
        let mut found = 0;

        for (a, b) in pairs {
            if found >= option.max_num_contacts {
                break;
            }
            if a.frame_id() == b.frame_id() {
                continue;
            }

            let Some(contact) = self.backend.contact(a, b) else {
                continue;
            };

            found += 1;
            if option.enable_contact {
                result.add_contact(Contact {
                    point: contact.point,
                    normal: contact.normal,
                    penetration_depth: contact.depth,
                    frame1: a.frame_id(),
                    frame2: b.frame_id(),
                });
            } else {
                result.add_colliding_pair(a.frame_id(), b.frame_id());
            }
        }

        found > 0
    }

    fn owns(&self, group: &CollisionGroup<B>) -> bool {
        std::ptr::eq(Arc::as_ptr(group.detector()), self)
    }

    /// Teardown path of a collision object: notify, count, then forget
    pub(crate) fn release_collision_object(&self, object: &CollisionObject<B>) {
        self.backend.notify_object_destroying(object);
        StatCounters::bump(&self.stats.objects_destroyed);
        self.cache.release(object);
        log::debug!(
            "Destroyed {} collision object for '{}' ({})",
            self.backend_type(),
            object.shape_frame().name(),
            object.frame_id()
        );
    }
}

impl<B: CollisionBackend> fmt::Debug for CollisionDetector<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionDetector")
            .field("backend", &self.backend_type())
            .field("cache", &self.cache)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{BoundingSphereBackend, PrimitiveBackend};
    use crate::config::ConfigError;
    use crate::foundation::math::{Transform, Vec3};
    use crate::geometry::CollisionShape;
    use approx::assert_relative_eq;

    fn ball_at(name: &str, x: f32) -> Arc<ShapeFrame> {
        ShapeFrame::new(
            name,
            CollisionShape::sphere(1.0),
            Transform::from_translation(Vec3::new(x, 0.0, 0.0)),
        )
    }

    /// Three balls in a row: a-b and b-c overlap, a-c do not
    fn row() -> Vec<Arc<ShapeFrame>> {
        vec![ball_at("a", 0.0), ball_at("b", 1.5), ball_at("c", 3.0)]
    }

    #[test]
    fn test_backend_type() {
        let spheres = CollisionDetector::new(BoundingSphereBackend::new(), SharingPolicy::Shared);
        let primitives = CollisionDetector::new(PrimitiveBackend::new(), SharingPolicy::Exclusive);

        assert_eq!(spheres.backend_type(), "bounding_sphere");
        assert_eq!(primitives.backend_type(), "primitive");
    }

    #[test]
    fn test_from_config() {
        let config = DetectorConfig::new(SharingPolicy::Exclusive).with_collision_option(CollisionOption::binary_check());
        let detector = CollisionDetector::from_config(BoundingSphereBackend::new(), &config);

        assert_eq!(detector.sharing_policy(), SharingPolicy::Exclusive);
        assert_eq!(*detector.default_option(), CollisionOption::binary_check());
    }

    #[test]
    fn test_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detector.ron");
        DetectorConfig::new(SharingPolicy::Exclusive).save_to_file(&path).unwrap();

        let detector = CollisionDetector::from_config_file(BoundingSphereBackend::new(), &path).unwrap();
        assert_eq!(detector.sharing_policy(), SharingPolicy::Exclusive);
    }

    #[test]
    fn test_from_config_file_reports_config_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = CollisionDetector::from_config_file(BoundingSphereBackend::new(), dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(CollisionError::Config(ConfigError::Io(_)))));

        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "sharing_policy = \"sometimes\"").unwrap();
        let broken = CollisionDetector::from_config_file(BoundingSphereBackend::new(), &path);
        assert!(matches!(broken, Err(CollisionError::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn test_created_never_trails_destroyed_under_contention() {
        const THREADS: usize = 4;
        const ROUNDS: usize = 2_000;

        let detector = CollisionDetector::new(BoundingSphereBackend::new(), SharingPolicy::Shared);
        let frame = ball_at("contended", 0.0);
        let done = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                let detector = Arc::clone(&detector);
                let frame = Arc::clone(&frame);
                std::thread::spawn(move || {
                    for _ in 0..ROUNDS {
                        drop(detector.claim_collision_object(&frame).unwrap());
                    }
                })
            })
            .collect();

        let watcher = {
            let detector = Arc::clone(&detector);
            let done = Arc::clone(&done);
            std::thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let stats = detector.stats();
                    assert!(stats.objects_created >= stats.objects_destroyed, "{stats:?}");
                }
            })
        };

        for worker in workers {
            worker.join().unwrap();
        }
        done.store(true, Ordering::Release);
        watcher.join().unwrap();

        let stats = detector.stats();
        assert_eq!(stats.objects_created, stats.objects_destroyed);
        assert_eq!(detector.cached_object_count(), 0);
    }

    #[test]
    fn test_collide_reports_contacts() {
        let detector = CollisionDetector::new(BoundingSphereBackend::new(), SharingPolicy::Shared);
        let frames = row();
        let group = detector.create_collision_group_from(&frames).unwrap();

        let mut result = CollisionResult::new();
        assert!(detector.collide(&group, &CollisionOption::default(), &mut result));

        assert_eq!(result.num_contacts(), 2);
        assert_eq!(result.colliding_frames().count(), 3);
        for contact in result.contacts() {
            assert_relative_eq!(contact.penetration_depth, 0.5, epsilon = 1e-5);
            assert_ne!(contact.frame1, contact.frame2);
        }
    }

    #[test]
    fn test_collide_respects_max_contacts() {
        let detector = CollisionDetector::new(BoundingSphereBackend::new(), SharingPolicy::Shared);
        let frames = row();
        let group = detector.create_collision_group_from(&frames).unwrap();

        let mut result = CollisionResult::new();
        assert!(detector.collide(&group, &CollisionOption::new(true, 1), &mut result));
        assert_eq!(result.num_contacts(), 1);

        result.clear();
        assert!(!detector.collide(&group, &CollisionOption::new(true, 0), &mut result));
        assert!(!result.is_collision());
    }

    #[test]
    fn test_binary_check_skips_contact_data() {
        let detector = CollisionDetector::new(BoundingSphereBackend::new(), SharingPolicy::Shared);
        let frames = row();
        let group = detector.create_collision_group_from(&frames).unwrap();

        let mut result = CollisionResult::new();
        assert!(detector.collide(&group, &CollisionOption::binary_check(), &mut result));
        assert_eq!(result.num_contacts(), 0);
        assert!(result.is_collision());
    }

    #[test]
    fn test_collide_groups_skips_common_frames() {
        let detector = CollisionDetector::new(BoundingSphereBackend::new(), SharingPolicy::Shared);
        let frames = row();
        let left = detector.create_collision_group_from(&frames[..2]).unwrap();
        let right = detector.create_collision_group_from(&frames[1..]).unwrap();

        let mut result = CollisionResult::new();
        assert!(detector.collide_groups(&left, &right, &CollisionOption::default(), &mut result));

        // a-b, b-c; b-b is the same frame and a-c are apart
        assert_eq!(result.num_contacts(), 2);
        assert!(result
            .contacts()
            .iter()
            .all(|contact| contact.frame1 != contact.frame2));
    }

    #[test]
    fn test_separated_frames_do_not_collide() {
        let detector = CollisionDetector::new(PrimitiveBackend::new(), SharingPolicy::Exclusive);
        let frames = vec![ball_at("a", 0.0), ball_at("b", 10.0)];
        let group = detector.create_collision_group_from(&frames).unwrap();

        let mut result = CollisionResult::new();
        assert!(!detector.collide(&group, &CollisionOption::default(), &mut result));
        assert!(!result.is_collision());
    }

    #[test]
    fn test_foreign_group_is_rejected() {
        let detector = CollisionDetector::new(BoundingSphereBackend::new(), SharingPolicy::Shared);
        let other = CollisionDetector::new(BoundingSphereBackend::new(), SharingPolicy::Shared);
        let frames = row();
        let foreign = other.create_collision_group_from(&frames).unwrap();
        let own = detector.create_collision_group_from(&frames).unwrap();

        let mut result = CollisionResult::new();
        assert!(!detector.collide(&foreign, &CollisionOption::default(), &mut result));
        assert!(!detector.collide_groups(&own, &foreign, &CollisionOption::default(), &mut result));
        assert!(!result.is_collision());
    }

    #[test]
    fn test_group_creation_failure_is_propagated() {
        let detector = CollisionDetector::new(PrimitiveBackend::new(), SharingPolicy::Shared);
        let good = ball_at("good", 0.0);
        let bad = ShapeFrame::new("bad", CollisionShape::sphere(-1.0), Transform::identity());

        let err = detector.create_collision_group_from([&good, &bad]).unwrap_err();
        assert!(matches!(err, CollisionError::InvalidRadius { .. }));

        // The partially built group was dropped with its objects
        assert_eq!(detector.cached_object_count(), 0);
        let stats = detector.stats();
        assert_eq!(stats.objects_created, 1);
        assert_eq!(stats.objects_destroyed, 1);
        assert_eq!(stats.construction_failures, 1);
    }

    #[test]
    fn test_objects_keep_detector_alive() {
        let detector = CollisionDetector::new(BoundingSphereBackend::new(), SharingPolicy::Shared);
        let frame = ball_at("a", 0.0);
        let object = detector.claim_collision_object(&frame).unwrap();

        drop(detector);
        assert_eq!(object.detector().cached_object_count(), 1);
        assert_eq!(object.detector().stats().live_objects(), 1);
    }
}
