//! Kinematic side of the collision boundary
//!
//! Only the shape frame is modeled here; frame hierarchies and skeletons live
//! outside this crate.

pub mod shape_frame;

pub use shape_frame::{ShapeFrame, ShapeFrameId};
