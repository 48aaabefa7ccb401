//! Collision mesh representations
//!
//! Meshes are stored once in model space and transformed to world space
//! on demand for each test.

use super::primitives::{BoundingSphere, PrimitiveContact, Triangle};
use crate::foundation::math::{Point3, Transform, Vec3};

/// A collision mesh template stored in MODEL SPACE (local coordinates)
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionMeshTemplate {
    /// Triangles in model space, never modified
    pub local_triangles: Vec<Triangle>,
    /// Radius of the model-space bounding sphere centered on the origin
    pub local_bounding_radius: f32,
}

impl CollisionMeshTemplate {
    /// Build a template from model-space vertices and triangle indices
    ///
    /// Trailing indices that do not form a full triangle are ignored, as are
    /// triangles referencing vertices out of range.
    pub fn from_vertices(vertices: &[Vec3], indices: &[u32]) -> Self {
        let local_triangles: Vec<Triangle> = indices
            .chunks_exact(3)
            .filter_map(|chunk| {
                let v0 = *vertices.get(chunk[0] as usize)?;
                let v1 = *vertices.get(chunk[1] as usize)?;
                let v2 = *vertices.get(chunk[2] as usize)?;
                Some(Triangle::new(v0, v1, v2))
            })
            .collect();

        let local_bounding_radius = local_triangles
            .iter()
            .flat_map(|tri| [tri.v0, tri.v1, tri.v2])
            .map(|vertex| vertex.magnitude_squared())
            .fold(0.0f32, f32::max)
            .sqrt();

        Self {
            local_triangles,
            local_bounding_radius,
        }
    }

    /// Axis-aligned box centered on the origin with the given half extents
    pub fn cuboid(half_extents: Vec3) -> Self {
        let (x, y, z) = (half_extents.x, half_extents.y, half_extents.z);
        let vertices = [
            Vec3::new(-x, -y, -z),
            Vec3::new(x, -y, -z),
            Vec3::new(x, y, -z),
            Vec3::new(-x, y, -z),
            Vec3::new(-x, -y, z),
            Vec3::new(x, -y, z),
            Vec3::new(x, y, z),
            Vec3::new(-x, y, z),
        ];
        let indices = [
            0, 2, 1, 0, 3, 2, // -z
            4, 5, 6, 4, 6, 7, // +z
            0, 1, 5, 0, 5, 4, // -y
            3, 6, 2, 3, 7, 6, // +y
            0, 4, 7, 0, 7, 3, // -x
            1, 2, 6, 1, 6, 5, // +x
        ];

        Self::from_vertices(&vertices, &indices)
    }

    /// Whether the template contains no triangles
    pub fn is_empty(&self) -> bool {
        self.local_triangles.is_empty()
    }

    /// Transform this template to world space
    pub fn to_world_space(&self, transform: &Transform) -> WorldSpaceCollisionMesh {
        let to_world = |v: Vec3| transform.transform_point(Point3::from(v)).coords;

        let triangles = self
            .local_triangles
            .iter()
            .map(|tri| Triangle::new(to_world(tri.v0), to_world(tri.v1), to_world(tri.v2)))
            .collect();

        WorldSpaceCollisionMesh {
            triangles,
            center: transform.position,
            bounding_radius: self.local_bounding_radius * transform.max_scale(),
        }
    }
}

/// World-space collision mesh, recreated for each collision test
#[derive(Debug)]
pub struct WorldSpaceCollisionMesh {
    /// Triangles in world space
    pub triangles: Vec<Triangle>,
    /// Center position in world space
    pub center: Vec3,
    /// Bounding sphere radius in world space
    pub bounding_radius: f32,
}

impl WorldSpaceCollisionMesh {
    /// Bounding sphere of the mesh
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center, self.bounding_radius)
    }

    /// Test sphere intersection against the mesh
    ///
    /// Returns the first touching triangle's contact; the normal is the
    /// triangle normal. A sphere entirely inside a closed mesh touches no
    /// triangle; it is pushed out through the nearest surface point instead.
    pub fn intersect_sphere(&self, sphere: &BoundingSphere) -> Option<PrimitiveContact> {
        if !self.bounding_sphere().intersects(sphere) {
            return None;
        }

        let surface = self.triangles.iter().find_map(|triangle| {
            if triangle.distance_to_point(sphere.center).abs() > sphere.radius {
                return None;
            }

            let closest = triangle.closest_point(sphere.center);
            let dist_sq = (closest - sphere.center).magnitude_squared();
            (dist_sq <= sphere.radius * sphere.radius).then(|| PrimitiveContact {
                point: closest,
                normal: triangle.normal(),
                depth: sphere.radius - dist_sq.sqrt(),
            })
        });
        if surface.is_some() || !self.contains_point(sphere.center) {
            return surface;
        }

        let closest = self
            .triangles
            .iter()
            .map(|triangle| triangle.closest_point(sphere.center))
            .min_by(|a, b| {
                let da = (a - sphere.center).magnitude_squared();
                let db = (b - sphere.center).magnitude_squared();
                da.total_cmp(&db)
            })?;
        let offset = closest - sphere.center;

        Some(PrimitiveContact {
            point: closest,
            normal: offset.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y),
            depth: sphere.radius + offset.magnitude(),
        })
    }

    /// Whether `point` lies inside the mesh
    ///
    /// Counts crossings of a ray from the point; only meaningful for closed
    /// meshes.
    pub fn contains_point(&self, point: Vec3) -> bool {
        // Skewed so the ray avoids the edges of axis-aligned faces
        let direction = Vec3::new(0.827, 0.465, 0.316);

        let crossings = self
            .triangles
            .iter()
            .filter(|triangle| triangle.ray_intersection(point, direction).is_some())
            .count();
        crossings % 2 == 1
    }

    /// Test mesh-mesh intersection
    ///
    /// The contact is approximated from the first intersecting triangle pair:
    /// centroid midpoint, center-to-center normal, bounding sphere overlap.
    pub fn intersect_mesh(&self, other: &Self) -> Option<PrimitiveContact> {
        let sphere_a = self.bounding_sphere();
        let sphere_b = other.bounding_sphere();
        if !sphere_a.intersects(&sphere_b) {
            return None;
        }

        let crossing = self.triangles.iter().find_map(|tri_a| {
            other
                .triangles
                .iter()
                .find(|tri_b| tri_a.intersects_triangle(tri_b))
                .map(|tri_b| (tri_a.centroid() + tri_b.centroid()) * 0.5)
        });

        // No surfaces cross: one mesh may still enclose the other
        let point = match crossing {
            Some(point) => point,
            None if self.encloses(other) => other.center,
            None if other.encloses(self) => self.center,
            None => return None,
        };

        let offset = self.center - other.center;
        let normal = offset.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y);

        Some(PrimitiveContact {
            point,
            normal,
            depth: sphere_a.penetration_depth(&sphere_b),
        })
    }

    fn encloses(&self, other: &Self) -> bool {
        other
            .triangles
            .first()
            .is_some_and(|triangle| self.contains_point(triangle.v0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_template_bounding_radius() {
        let template = CollisionMeshTemplate::cuboid(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(template.local_triangles.len(), 12);
        assert_relative_eq!(template.local_bounding_radius, 3.0f32.sqrt());
    }

    #[test]
    fn test_out_of_range_indices_are_skipped() {
        let vertices = [Vec3::zeros(), Vec3::x(), Vec3::y()];
        let template = CollisionMeshTemplate::from_vertices(&vertices, &[0, 1, 2, 0, 1, 9, 2]);
        assert_eq!(template.local_triangles.len(), 1);

        let empty = CollisionMeshTemplate::from_vertices(&vertices, &[]);
        assert!(empty.is_empty());
        assert_relative_eq!(empty.local_bounding_radius, 0.0);
    }

    #[test]
    fn test_world_space_translation() {
        let template = CollisionMeshTemplate::cuboid(Vec3::new(0.5, 0.5, 0.5));
        let world = template.to_world_space(&Transform::from_translation(Vec3::new(10.0, 0.0, 0.0)));

        assert_relative_eq!(world.center.x, 10.0);
        assert!(world.triangles.iter().all(|tri| tri.v0.x >= 9.5 && tri.v0.x <= 10.5));
    }

    #[test]
    fn test_sphere_against_box() {
        let world = CollisionMeshTemplate::cuboid(Vec3::new(1.0, 1.0, 1.0))
            .to_world_space(&Transform::identity());

        let touching = BoundingSphere::new(Vec3::new(1.5, 0.0, 0.0), 0.75);
        let contact = world.intersect_sphere(&touching).unwrap();
        assert_relative_eq!(contact.point.x, 1.0);
        assert_relative_eq!(contact.depth, 0.25, epsilon = 1e-5);

        let apart = BoundingSphere::new(Vec3::new(4.0, 0.0, 0.0), 0.75);
        assert!(world.intersect_sphere(&apart).is_none());
    }

    #[test]
    fn test_box_against_box() {
        let template = CollisionMeshTemplate::cuboid(Vec3::new(1.0, 1.0, 1.0));
        let a = template.to_world_space(&Transform::identity());
        let b = template.to_world_space(&Transform::from_translation(Vec3::new(1.5, 0.0, 0.0)));
        let c = template.to_world_space(&Transform::from_translation(Vec3::new(5.0, 0.0, 0.0)));

        assert!(a.intersect_mesh(&b).is_some());
        assert!(a.intersect_mesh(&c).is_none());
    }

    #[test]
    fn test_sphere_inside_box() {
        let world = CollisionMeshTemplate::cuboid(Vec3::new(2.0, 2.0, 2.0))
            .to_world_space(&Transform::identity());
        assert!(world.contains_point(Vec3::zeros()));
        assert!(!world.contains_point(Vec3::new(3.0, 0.0, 0.0)));

        let ball = BoundingSphere::new(Vec3::zeros(), 0.5);
        let contact = world.intersect_sphere(&ball).unwrap();
        assert_relative_eq!(contact.depth, 2.5, epsilon = 1e-5);
        assert_relative_eq!(contact.normal.magnitude(), 1.0, epsilon = 1e-5);

        let off_center = BoundingSphere::new(Vec3::new(1.0, 0.0, 0.0), 0.5);
        let contact = world.intersect_sphere(&off_center).unwrap();
        assert_relative_eq!(contact.point.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(contact.normal.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(contact.depth, 1.5, epsilon = 1e-5);
    }

    #[test]
    fn test_box_inside_box() {
        let outer = CollisionMeshTemplate::cuboid(Vec3::new(3.0, 3.0, 3.0)).to_world_space(&Transform::identity());
        let inner = CollisionMeshTemplate::cuboid(Vec3::new(0.5, 0.5, 0.5))
            .to_world_space(&Transform::from_translation(Vec3::new(0.5, 0.0, 0.0)));

        assert!(outer.intersect_mesh(&inner).is_some());
        assert!(inner.intersect_mesh(&outer).is_some());
    }
}
