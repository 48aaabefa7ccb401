//! Primitive collision shapes and intersection algorithms

use crate::foundation::math::Vec3;

const EPSILON: f32 = 0.000_001;

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

/// Contact between two overlapping primitives
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveContact {
    /// Contact point in world space
    pub point: Vec3,
    /// Unit normal pointing from the second primitive towards the first
    pub normal: Vec3,
    /// Overlap along the normal
    pub depth: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another (touching counts)
    pub fn intersects(&self, other: &Self) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Get the penetration depth if intersecting (0.0 if not intersecting)
    pub fn penetration_depth(&self, other: &Self) -> f32 {
        let distance = (self.center - other.center).magnitude();
        let radius_sum = self.radius + other.radius;
        (radius_sum - distance).max(0.0)
    }

    /// Contact with another sphere, if they intersect
    ///
    /// Concentric spheres report the +Y axis as normal.
    pub fn contact(&self, other: &Self) -> Option<PrimitiveContact> {
        if !self.intersects(other) {
            return None;
        }

        let offset = self.center - other.center;
        let distance = offset.magnitude();
        let normal = if distance > EPSILON {
            offset / distance
        } else {
            Vec3::y()
        };

        // Midpoint of the overlapping segment
        let point = other.center + normal * (other.radius - (self.radius + other.radius - distance) * 0.5);

        Some(PrimitiveContact {
            point,
            normal,
            depth: self.penetration_depth(other),
        })
    }
}

/// A triangle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Calculates the normal of the triangle (right-hand rule)
    pub fn normal(&self) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).normalize()
    }

    /// Calculates the centroid of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Get the closest point on the triangle to a given point
    ///
    /// Voronoi-region walk from Ericson, Real-Time Collision Detection 5.1.5.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let v0_to_point = point - self.v0;
        let d1 = edge1.dot(&v0_to_point);
        let d2 = edge2.dot(&v0_to_point);
        if d1 <= 0.0 && d2 <= 0.0 {
            return self.v0;
        }

        let v1_to_point = point - self.v1;
        let d3 = edge1.dot(&v1_to_point);
        let d4 = edge2.dot(&v1_to_point);
        if d3 >= 0.0 && d4 <= d3 {
            return self.v1;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            return self.v0 + edge1 * (d1 / (d1 - d3));
        }

        let v2_to_point = point - self.v2;
        let d5 = edge1.dot(&v2_to_point);
        let d6 = edge2.dot(&v2_to_point);
        if d6 >= 0.0 && d5 <= d6 {
            return self.v2;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            return self.v0 + edge2 * (d2 / (d2 - d6));
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return self.v1 + (self.v2 - self.v1) * w;
        }

        // Inside the face
        let denom = 1.0 / (va + vb + vc);
        self.v0 + edge1 * (vb * denom) + edge2 * (vc * denom)
    }

    /// Signed distance from a point to the triangle plane
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal().dot(&(point - self.v0))
    }

    /// Distance along `direction` at which a ray from `origin` hits the triangle
    ///
    /// Moller-Trumbore; rays parallel to the plane and hits behind the origin
    /// return `None`.
    pub fn ray_intersection(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let p = direction.cross(&edge2);
        let det = edge1.dot(&p);
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let to_origin = origin - self.v0;
        let u = to_origin.dot(&p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = to_origin.cross(&edge1);
        let v = direction.dot(&q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(&q) * inv_det;
        (t > EPSILON).then_some(t)
    }

    /// Separating axis test against another triangle
    ///
    /// Tests both face normals and the nine edge-edge cross products.
    pub fn intersects_triangle(&self, other: &Self) -> bool {
        fn project(tri: &Triangle, axis: &Vec3) -> (f32, f32) {
            let p0 = axis.dot(&tri.v0);
            let p1 = axis.dot(&tri.v1);
            let p2 = axis.dot(&tri.v2);
            (p0.min(p1).min(p2), p0.max(p1).max(p2))
        }

        // false if `axis` separates the triangles
        fn overlaps_on(a: &Triangle, b: &Triangle, axis: Vec3) -> bool {
            if axis.magnitude_squared() < EPSILON {
                return true;
            }
            let (min_a, max_a) = project(a, &axis);
            let (min_b, max_b) = project(b, &axis);
            max_a >= min_b && max_b >= min_a
        }

        let edges_a = [self.v1 - self.v0, self.v2 - self.v1, self.v0 - self.v2];
        let edges_b = [other.v1 - other.v0, other.v2 - other.v1, other.v0 - other.v2];

        if !overlaps_on(self, other, edges_a[0].cross(&edges_a[1]))
            || !overlaps_on(self, other, edges_b[0].cross(&edges_b[1]))
        {
            return false;
        }

        edges_a
            .iter()
            .all(|edge_a| edges_b.iter().all(|edge_b| overlaps_on(self, other, edge_a.cross(edge_b))))
    }
}
