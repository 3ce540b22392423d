//! Discrete sphere-vs-polygon and sphere-vs-sphere intersection tests.
//!
//! Polygons are tested in priority order: plane distance reject, corners,
//! edges, then the face itself. The first feature that touches the sphere
//! wins.

use crate::shapes::{Quad, Sphere, Triangle};
use crate::types::{constants, Vec3};

/// Tolerance for the "closest point lies on the segment" check
pub const EDGE_TOLERANCE: f64 = 0.01;

/// Tolerance on the out-of-plane coordinate for the quad face test
const PLANE_TOLERANCE: f64 = 0.01;

/// Which polygon feature the sphere touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Vertex,
    Edge,
    Face,
}

/// A detected contact between a sphere and a static polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub kind: ContactKind,
    /// Unit vector from the touched feature towards the sphere centre
    pub normal: Vec3,
    /// Distance from the sphere centre to the touched feature
    pub distance: f64,
}

impl Contact {
    /// How far the sphere reaches into the feature
    pub fn penetration(&self, radius: f64) -> f64 {
        radius - self.distance
    }
}

/// Sphere against a quad whose corners are already in world space.
pub fn sphere_quad(sphere: &Sphere, corners: &[Vec3; 4]) -> Option<Contact> {
    let normal = corners[0].plane_normal(&corners[1], &corners[2]);
    let center = sphere.world_position();
    let signed = normal.dot(&(center - corners[0]));
    if signed.abs() > sphere.radius {
        return None;
    }

    if let Some(contact) = corner_contact(center, sphere.radius, corners) {
        return Some(contact);
    }
    if let Some(contact) = edge_contact(center, sphere.radius, corners) {
        return Some(contact);
    }

    let projected = center - normal * signed;
    if !inside_quad(projected, corners) {
        return None;
    }
    Some(face_contact(center, projected, normal, signed))
}

/// Sphere against a triangle whose corners are already in world space.
pub fn sphere_triangle(
    sphere: &Sphere,
    corners: &[Vec3; 3],
    face_collision_only: bool,
) -> Option<Contact> {
    let normal = corners[0].plane_normal(&corners[1], &corners[2]);
    let center = sphere.world_position();
    let signed = normal.dot(&(center - corners[0]));
    if signed.abs() > sphere.radius {
        return None;
    }

    if !face_collision_only {
        if let Some(contact) = corner_contact(center, sphere.radius, corners) {
            return Some(contact);
        }
        if let Some(contact) = edge_contact(center, sphere.radius, corners) {
            return Some(contact);
        }
    }

    let projected = center - normal * signed;
    if !inside_triangle(projected, corners) {
        return None;
    }
    Some(face_contact(center, projected, normal, signed))
}

/// True if two spheres overlap.
pub fn spheres_overlap(a: &Sphere, b: &Sphere) -> bool {
    a.world_position().distance(&b.world_position()) < a.radius + b.radius
}

fn corner_contact(center: Vec3, radius: f64, corners: &[Vec3]) -> Option<Contact> {
    corners.iter().find_map(|corner| {
        let to_center = center - *corner;
        let distance = to_center.magnitude();
        if distance >= radius {
            return None;
        }
        Some(Contact {
            kind: ContactKind::Vertex,
            normal: to_center.try_normalized()?,
            distance,
        })
    })
}

fn edge_contact(center: Vec3, radius: f64, corners: &[Vec3]) -> Option<Contact> {
    let n = corners.len();
    (0..n).find_map(|i| {
        let a = corners[i];
        let b = corners[(i + 1) % n];
        let dir = (b - a).try_normalized()?;

        // Closest point on the infinite line through the edge
        let along = dir.dot(&(center - a));
        let closest = a + dir * along;
        let distance = closest.distance(&center);
        if distance > radius {
            return None;
        }

        // Reject points beyond the segment ends
        if closest.distance(&a) + closest.distance(&b) > a.distance(&b) + EDGE_TOLERANCE {
            return None;
        }

        Some(Contact {
            kind: ContactKind::Edge,
            normal: (center - closest).try_normalized()?,
            distance,
        })
    })
}

fn face_contact(center: Vec3, projected: Vec3, normal: Vec3, signed: f64) -> Contact {
    // The face normal flipped to the side the sphere is on
    let oriented = (center - projected)
        .try_normalized()
        .unwrap_or(normal);
    Contact {
        kind: ContactKind::Face,
        normal: oriented,
        distance: signed.abs(),
    }
}

/// Express the point in the quad's 2D basis and check the unit square.
fn inside_quad(p: Vec3, corners: &[Vec3; 4]) -> bool {
    let origin = corners[0];
    let (Some(u), Some(v)) = (
        (corners[1] - origin).try_normalized(),
        (corners[3] - origin).try_normalized(),
    ) else {
        return false;
    };
    let w = u.cross(&v).normalized();

    let far = corners[2] - origin;
    let width = u.dot(&far);
    let height = v.dot(&far);
    if width.abs() < constants::EPSILON || height.abs() < constants::EPSILON {
        return false;
    }

    let rel = p - origin;
    let px = u.dot(&rel) / width;
    let py = v.dot(&rel) / height;
    let pz = w.dot(&rel);

    pz.abs() <= PLANE_TOLERANCE && (0.0..=1.0).contains(&px) && (0.0..=1.0).contains(&py)
}

/// Barycentric point-in-triangle test.
fn inside_triangle(p: Vec3, corners: &[Vec3; 3]) -> bool {
    let [a, b, c] = *corners;
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = v0.dot(&v0);
    let dot01 = v0.dot(&v1);
    let dot02 = v0.dot(&v2);
    let dot11 = v1.dot(&v1);
    let dot12 = v1.dot(&v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < constants::EPSILON {
        return false;
    }
    let inv = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;

    u >= 0.0 && v >= 0.0 && u + v <= 1.0
}

/// Convenience wrappers taking shapes in local space plus a world offset.
impl Quad {
    pub fn contact(&self, offset: Vec3, sphere: &Sphere) -> Option<Contact> {
        sphere_quad(sphere, &self.world_corners(offset))
    }
}

impl Triangle {
    pub fn contact(&self, offset: Vec3, sphere: &Sphere) -> Option<Contact> {
        sphere_triangle(sphere, &self.world_corners(offset), self.face_collision_only)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_quad() -> Quad {
        Quad::new(
            Vec3::new(-2.0, 0.0, -2.0),
            Vec3::new(2.0, 0.0, -2.0),
            Vec3::new(2.0, 0.0, 2.0),
            Vec3::new(-2.0, 0.0, 2.0),
        )
    }

    fn ball_at(x: f64, y: f64, z: f64) -> Sphere {
        Sphere::new(Vec3::new(x, y, z), 0.4)
    }

    #[test]
    fn test_far_from_plane_is_rejected() {
        let quad = floor_quad();
        assert!(quad.contact(Vec3::ZERO, &ball_at(0.0, 1.0, 0.0)).is_none());
    }

    #[test]
    fn test_face_contact_normal_points_to_ball() {
        let quad = floor_quad();
        let contact = quad
            .contact(Vec3::ZERO, &ball_at(0.5, 0.3, 0.5))
            .expect("ball overlaps the face");

        assert_eq!(contact.kind, ContactKind::Face);
        assert!((contact.normal.y - 1.0).abs() < 1e-10);
        assert!((contact.distance - 0.3).abs() < 1e-10);
        assert!((contact.penetration(0.4) - 0.1).abs() < 1e-10);

        let below = quad
            .contact(Vec3::ZERO, &ball_at(0.5, -0.3, 0.5))
            .expect("ball overlaps from below");
        assert!((below.normal.y + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_outside_face_bounds_is_missed() {
        let quad = floor_quad();
        assert!(quad.contact(Vec3::ZERO, &ball_at(3.0, 0.3, 0.0)).is_none());
    }

    #[test]
    fn test_world_offset_moves_quad() {
        let quad = floor_quad();
        let offset = Vec3::new(10.0, 0.0, 0.0);
        assert!(quad.contact(offset, &ball_at(0.0, 0.3, 0.0)).is_none());
        assert!(quad.contact(offset, &ball_at(10.0, 0.3, 0.0)).is_some());
    }

    #[test]
    fn test_corner_has_priority() {
        let quad = floor_quad();
        let contact = quad
            .contact(Vec3::ZERO, &ball_at(2.1, 0.1, 2.1))
            .expect("ball touches the corner");
        assert_eq!(contact.kind, ContactKind::Vertex);
        let expected = Vec3::new(0.1, 0.1, 0.1).normalized();
        assert!((contact.normal - expected).magnitude() < 1e-10);
    }

    #[test]
    fn test_edge_contact() {
        let quad = floor_quad();
        let contact = quad
            .contact(Vec3::ZERO, &ball_at(2.2, 0.1, 0.0))
            .expect("ball touches the edge");
        assert_eq!(contact.kind, ContactKind::Edge);
        assert!(contact.normal.x > 0.0 && contact.normal.y > 0.0);
    }

    #[test]
    fn test_edge_beyond_segment_is_ignored() {
        // Ball near the line through the top edge but past its end, and too
        // far from the corner
        let wall = Quad::wall(0.0, 0.0, 4.0, 0.0);
        assert!(wall.contact(Vec3::ZERO, &ball_at(4.35, 2.0, 0.25)).is_none());
    }

    #[test]
    fn test_triangle_face_and_bounds() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
        );
        let hit = tri.contact(Vec3::ZERO, &ball_at(1.0, 0.2, 1.0));
        assert_eq!(hit.map(|c| c.kind), Some(ContactKind::Face));

        // Beyond the hypotenuse
        assert!(tri.contact(Vec3::ZERO, &ball_at(3.0, 0.2, 3.0)).is_none());
    }

    #[test]
    fn test_face_only_triangle_ignores_edges() {
        let mut tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
        );
        let ball = ball_at(-0.2, 0.1, 1.0);
        assert_eq!(
            tri.contact(Vec3::ZERO, &ball).map(|c| c.kind),
            Some(ContactKind::Edge)
        );

        tri.face_collision_only = true;
        assert!(tri.contact(Vec3::ZERO, &ball).is_none());
    }

    #[test]
    fn test_spheres_overlap() {
        let a = ball_at(0.0, 0.0, 0.0);
        let b = ball_at(0.7, 0.0, 0.0);
        let c = ball_at(0.9, 0.0, 0.0);
        assert!(spheres_overlap(&a, &b));
        assert!(!spheres_overlap(&a, &c));
    }
}
