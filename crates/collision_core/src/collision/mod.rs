//! Collision detection layer
//!
//! - [`detector`] - Detectors and the backend contract
//! - [`cache`] - Exclusive and shared collision object caches
//! - [`object`] - Collision objects and their teardown
//! - [`group`] - Sets of frames tested together
//! - [`query`] - Query options and results
//! - [`backends`] - Reference backends

pub mod backends;
pub mod cache;
pub mod detector;
pub mod error;
pub mod group;
pub mod object;
pub mod query;

pub use backends::{BoundingSphereBackend, PrimitiveBackend};
pub use cache::{ObjectCache, SharingPolicy};
pub use detector::{CollisionBackend, CollisionDetector, DetectorStats};
pub use error::CollisionError;
pub use group::CollisionGroup;
pub use object::CollisionObject;
pub use query::{CollisionOption, CollisionResult, Contact};
