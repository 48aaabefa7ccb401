//! # Collision Core
//!
//! Identity and lifetime management for collision objects.
//!
//! A [`CollisionDetector`](collision::CollisionDetector) turns shape frames into
//! backend-specific collision objects and hands them to collision groups.
//! Depending on the [`SharingPolicy`](collision::SharingPolicy) picked at
//! construction, every group gets its own object or all groups share one object
//! per live frame.
//!
//! ## Features
//!
//! - **Shared or exclusive objects**: deduplication by frame identity, with
//!   weak entries that never keep an object alive
//! - **Drop-driven teardown**: the last owner going away notifies the backend
//!   and cleans up the cache
//! - **Pluggable backends**: implement [`CollisionBackend`](collision::CollisionBackend)
//!   to provide geometry and pair tests
//! - **Config files**: detector settings in TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use collision_core::prelude::*;
//!
//! fn main() -> Result<(), CollisionError> {
//!     let detector = CollisionDetector::new(BoundingSphereBackend::new(), SharingPolicy::Shared);
//!
//!     let a = ShapeFrame::new("a", CollisionShape::sphere(1.0), Transform::identity());
//!     let b = ShapeFrame::new(
//!         "b",
//!         CollisionShape::sphere(1.0),
//!         Transform::from_translation(Vec3::new(1.5, 0.0, 0.0)),
//!     );
//!
//!     let group = detector.create_collision_group_from([&a, &b])?;
//!     let mut result = CollisionResult::new();
//!     assert!(group.collide(&CollisionOption::default(), &mut result));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod collision;
pub mod config;
pub mod dynamics;
pub mod foundation;
pub mod geometry;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        collision::{
            BoundingSphereBackend, CollisionBackend, CollisionDetector, CollisionError, CollisionGroup,
            CollisionObject, CollisionOption, CollisionResult, Contact, PrimitiveBackend, SharingPolicy,
        },
        config::{Config, DetectorConfig},
        dynamics::{ShapeFrame, ShapeFrameId},
        foundation::math::{Mat4, Quat, Transform, Vec3},
        geometry::CollisionShape,
    };
}
