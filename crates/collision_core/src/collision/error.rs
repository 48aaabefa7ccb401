//! Collision layer errors

use thiserror::Error;

use crate::config::ConfigError;
use crate::geometry::ShapeKind;

/// Errors reported by collision detectors and their backends
///
/// Construction failures are returned from the claim that triggered them;
/// the object cache is left exactly as it was before the claim.
#[derive(Debug, Error)]
pub enum CollisionError {
    /// The backend has no representation for this kind of shape
    #[error("{backend} backend cannot represent {shape} shape of frame '{frame}'")]
    UnsupportedShape {
        /// Backend type string
        backend: &'static str,
        /// Offending shape kind
        shape: ShapeKind,
        /// Frame name
        frame: String,
    },

    /// A mesh shape without any triangles
    #[error("Mesh of frame '{frame}' has no triangles")]
    EmptyMesh {
        /// Frame name
        frame: String,
    },

    /// A sphere whose radius is not a positive finite number
    #[error("Sphere of frame '{frame}' has invalid radius {radius}")]
    InvalidRadius {
        /// Frame name
        frame: String,
        /// Rejected radius
        radius: f32,
    },

    /// Detector configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
