//! High-level collision shape abstractions
//!
//! Shapes live in model space; a [`WorldSpaceShape`] is produced for the
//! duration of a single test.

use std::fmt;

use super::mesh::{CollisionMeshTemplate, WorldSpaceCollisionMesh};
use super::primitives::{BoundingSphere, PrimitiveContact};
use crate::foundation::math::{Transform, Vec3};

/// Collision shape types (stored in MODEL SPACE)
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    /// Sphere centered on the frame origin
    Sphere(f32),
    /// Triangle mesh template
    Mesh(CollisionMeshTemplate),
}

/// Discriminant of [`CollisionShape`], used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// [`CollisionShape::Sphere`]
    Sphere,
    /// [`CollisionShape::Mesh`]
    Mesh,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sphere => f.write_str("sphere"),
            Self::Mesh => f.write_str("mesh"),
        }
    }
}

impl CollisionShape {
    /// Creates a spherical collision shape with given radius
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere(radius)
    }

    /// Creates a mesh collision shape from model-space vertices and indices
    pub fn mesh(vertices: &[Vec3], indices: &[u32]) -> Self {
        Self::Mesh(CollisionMeshTemplate::from_vertices(vertices, indices))
    }

    /// Creates a box mesh with the given half extents
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Mesh(CollisionMeshTemplate::cuboid(half_extents))
    }

    /// Which variant this is
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere(_) => ShapeKind::Sphere,
            Self::Mesh(_) => ShapeKind::Mesh,
        }
    }

    /// Get the bounding radius in model space
    pub fn local_bounding_radius(&self) -> f32 {
        match self {
            Self::Sphere(radius) => *radius,
            Self::Mesh(template) => template.local_bounding_radius,
        }
    }

    /// Transform this shape to world space
    ///
    /// Sphere radii are scaled by the largest scale component.
    pub fn to_world_space(&self, transform: &Transform) -> WorldSpaceShape {
        match self {
            Self::Sphere(radius) => WorldSpaceShape::Sphere(BoundingSphere::new(
                transform.position,
                radius * transform.max_scale(),
            )),
            Self::Mesh(template) => WorldSpaceShape::Mesh(template.to_world_space(transform)),
        }
    }
}

/// World-space collision shape (temporary, for testing only)
#[derive(Debug)]
pub enum WorldSpaceShape {
    /// World-space sphere
    Sphere(BoundingSphere),
    /// World-space mesh
    Mesh(WorldSpaceCollisionMesh),
}

impl WorldSpaceShape {
    /// Get bounding sphere
    pub fn bounding_sphere(&self) -> BoundingSphere {
        match self {
            Self::Sphere(sphere) => *sphere,
            Self::Mesh(mesh) => mesh.bounding_sphere(),
        }
    }

    /// Contact with another shape, if they intersect
    ///
    /// The normal always points from `other` towards `self`.
    pub fn contact(&self, other: &Self) -> Option<PrimitiveContact> {
        match (self, other) {
            (Self::Sphere(a), Self::Sphere(b)) => a.contact(b),
            (Self::Sphere(sphere), Self::Mesh(mesh)) => mesh.intersect_sphere(sphere),
            (Self::Mesh(mesh), Self::Sphere(sphere)) => {
                mesh.intersect_sphere(sphere).map(|contact| PrimitiveContact {
                    normal: -contact.normal,
                    ..contact
                })
            }
            (Self::Mesh(a), Self::Mesh(b)) => a.intersect_mesh(b),
        }
    }

    /// Test if this shape intersects with another shape
    pub fn intersects(&self, other: &Self) -> bool {
        self.contact(other).is_some()
    }
}
