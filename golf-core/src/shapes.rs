//! Concrete bodies: the ball sphere, planar quads and triangles, the walled
//! box and the infinite plane.
//!
//! Polygon corners are stored in the owning node's local frame; collision
//! code offsets them by the node's world position (translation only).

use std::f64::consts::PI;

use crate::types::{Mat3, Material, Vec3};

/// Height of walls built from a 2D outline
pub const WALL_HEIGHT: f64 = 2.0;

// =============================================================================
// Sphere
// =============================================================================

/// A rolling ball.
///
/// Balls are root bodies, so their local position is also their world
/// position.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Mat3,
    pub color: Vec3,
    pub material: Material,
    pub radius: f64,
    /// Normal of the surface the ball last rolled on; zero while airborne.
    pub floor_normal: Vec3,
}

impl Sphere {
    pub fn new(position: Vec3, radius: f64) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            rotation: Mat3::IDENTITY,
            color: Vec3::new(1.0, 1.0, 1.0),
            material: Material::ball(),
            radius,
            floor_normal: Vec3::UP,
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn world_position(&self) -> Vec3 {
        self.position
    }

    /// Mass from volume: (4/3)·π·r³·density
    pub fn mass(&self) -> f64 {
        4.0 / 3.0 * PI * self.radius.powi(3) * self.material.density
    }

    /// Translate the ball by `delta`, turning the translation into a roll
    /// around `normalize(delta) × floor_normal`.
    ///
    /// The rotation only affects how the ball is drawn.
    pub fn translate(&mut self, delta: Vec3) {
        if delta.magnitude_squared() == 0.0 {
            return;
        }
        self.position += delta;

        let floor = self.floor_normal;
        if floor.magnitude_squared() < 0.01 {
            return;
        }
        let dir = delta.normalized();
        let axis = dir.cross(&floor);
        if axis.magnitude_squared() < 0.00001 {
            return;
        }

        let angle = -delta.magnitude() * (1.0 - dir.dot(&floor)) / self.radius;
        self.rotation = Mat3::from_axis_angle(axis.normalized(), angle) * self.rotation;
    }

    /// Put the ball at rest at `position` with a fresh orientation.
    pub fn place(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.rotation = Mat3::IDENTITY;
        self.floor_normal = Vec3::UP;
    }
}

// =============================================================================
// Planar polygons
// =============================================================================

/// A finite rectangle ("wall") given by four coplanar corners.
///
/// Corner order matters: corners 1 and 3 must be adjacent to corner 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    pub corners: [Vec3; 4],
}

impl Quad {
    pub fn new(c0: Vec3, c1: Vec3, c2: Vec3, c3: Vec3) -> Self {
        Self {
            corners: [c0, c1, c2, c3],
        }
    }

    /// Vertical wall of `WALL_HEIGHT` standing on the segment (x1,z1)-(x2,z2).
    pub fn wall(x1: f64, z1: f64, x2: f64, z2: f64) -> Self {
        Self::new(
            Vec3::new(x1, 0.0, z1),
            Vec3::new(x1, WALL_HEIGHT, z1),
            Vec3::new(x2, WALL_HEIGHT, z2),
            Vec3::new(x2, 0.0, z2),
        )
    }

    /// Normal from the first three corners
    pub fn normal(&self) -> Vec3 {
        let [c0, c1, c2, _] = self.corners;
        c0.plane_normal(&c1, &c2)
    }

    pub fn world_corners(&self, offset: Vec3) -> [Vec3; 4] {
        self.corners.map(|c| c + offset)
    }
}

impl Default for Quad {
    fn default() -> Self {
        Self::new(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 1.0),
        )
    }
}

/// A planar triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub corners: [Vec3; 3],
    /// Only the face is collidable; edges and corners are ignored so balls
    /// don't snag on the seams between floor tiles.
    pub face_collision_only: bool,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            corners: [a, b, c],
            face_collision_only: false,
        }
    }

    /// Floor tile triangle that only collides on its face
    pub fn floor(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            corners: [a, b, c],
            face_collision_only: true,
        }
    }

    pub fn normal(&self) -> Vec3 {
        let [a, b, c] = self.corners;
        a.plane_normal(&b, &c)
    }

    /// Twice the triangle area; zero for collinear corners.
    pub fn doubled_area(&self) -> f64 {
        let [a, b, c] = self.corners;
        (b - a).cross(&(c - a)).magnitude()
    }

    pub fn world_corners(&self, offset: Vec3) -> [Vec3; 3] {
        self.corners.map(|c| c + offset)
    }
}

// =============================================================================
// Box
// =============================================================================

/// A closed ring of walls plus a triangle-fan floor.
///
/// Walls appended with [`BoxShape::add_wall`] after construction are
/// free-standing and not counted as outer walls. Walls collide with the
/// owning node's material, the floor with `floor_material`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShape {
    walls: Vec<Quad>,
    floor: Vec<Triangle>,
    outer_wall_count: usize,
    pub floor_material: Material,
}

impl BoxShape {
    /// Build from an outline of `(x, z)` points; consecutive points (wrapping
    /// around) become walls.
    pub fn from_outline(outline: &[[f64; 2]]) -> Self {
        let n = outline.len();
        let walls: Vec<Quad> = (0..n)
            .map(|i| {
                let [x1, z1] = outline[i];
                let [x2, z2] = outline[(i + 1) % n];
                Quad::wall(x1, z1, x2, z2)
            })
            .collect();

        let mut shape = Self {
            outer_wall_count: walls.len(),
            walls,
            floor: Vec::new(),
            floor_material: Material::turf(),
        };
        shape.floor = shape.build_floor();
        shape
    }

    /// Fan of floor triangles around the outline centroid. Triangles that
    /// degenerate to a line are skipped.
    fn build_floor(&self) -> Vec<Triangle> {
        let n = self.outer_wall_count;
        if n < 3 {
            return Vec::new();
        }
        let outline: Vec<Vec3> = self.walls[..n].iter().map(|w| w.corners[0]).collect();
        let centroid = outline.iter().fold(Vec3::ZERO, |acc, &p| acc + p) / n as f64;

        (0..n)
            .map(|i| Triangle::floor(centroid, outline[i], outline[(i + 1) % n]))
            .filter(|t| t.doubled_area() > 1e-6)
            .collect()
    }

    /// Drop the generated floor, for boxes laid over separate floor tiles
    pub fn without_floor(mut self) -> Self {
        self.floor.clear();
        self
    }

    pub fn with_floor_material(mut self, material: Material) -> Self {
        self.floor_material = material;
        self
    }

    pub fn add_wall(&mut self, wall: Quad) {
        self.walls.push(wall);
    }

    pub fn walls(&self) -> &[Quad] {
        &self.walls
    }

    pub fn floor(&self) -> &[Triangle] {
        &self.floor
    }

    pub fn outer_wall_count(&self) -> usize {
        self.outer_wall_count
    }

    /// Outline corners in ring order, used as the floor fan rim.
    pub fn outline(&self) -> Vec<Vec3> {
        self.walls[..self.outer_wall_count]
            .iter()
            .map(|w| w.corners[0])
            .collect()
    }
}

impl Default for BoxShape {
    fn default() -> Self {
        Self::from_outline(&[])
    }
}

// =============================================================================
// Plane
// =============================================================================

/// An infinite plane defined by a unit normal and a point on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

impl Plane {
    pub fn new(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal: normal.try_normalized().unwrap_or(Vec3::UP),
            point,
        }
    }

    /// Horizontal ground plane at height `y`
    pub fn ground(y: f64) -> Self {
        Self::new(Vec3::UP, Vec3::new(0.0, y, 0.0))
    }

    /// Signed distance; positive on the side the normal points to.
    pub fn signed_distance(&self, p: &Vec3) -> f64 {
        (*p - self.point).dot(&self.normal)
    }

    pub fn distance(&self, p: &Vec3) -> f64 {
        self.signed_distance(p).abs()
    }

    /// Mirror a velocity about the plane
    pub fn reflect(&self, v: &Vec3) -> Vec3 {
        v.reflect(&self.normal)
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::ground(0.0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_mass_from_volume() {
        let ball = Sphere::new(Vec3::ZERO, 1.0);
        assert!((ball.mass() - 4.0 / 3.0 * PI).abs() < 1e-10);

        let dense = Sphere::new(Vec3::ZERO, 0.5).with_material(Material {
            density: 8.0,
            ..Material::ball()
        });
        // 8 * (0.5)^3 == 1
        assert!((dense.mass() - 4.0 / 3.0 * PI).abs() < 1e-10);
    }

    #[test]
    fn test_translate_rolls_on_floor() {
        let mut ball = Sphere::new(Vec3::new(0.0, 0.4, 0.0), 0.4);
        ball.translate(Vec3::new(0.1, 0.0, 0.0));

        assert!((ball.position.x - 0.1).abs() < 1e-12);
        assert_ne!(ball.rotation, Mat3::IDENTITY, "rolling should rotate the ball");
    }

    #[test]
    fn test_translate_straight_fall_does_not_rotate() {
        let mut ball = Sphere::new(Vec3::new(0.0, 3.0, 0.0), 0.4);
        ball.translate(Vec3::new(0.0, -0.5, 0.0));
        assert_eq!(ball.rotation, Mat3::IDENTITY);

        ball.floor_normal = Vec3::ZERO;
        ball.translate(Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(ball.rotation, Mat3::IDENTITY, "airborne balls don't roll");
        assert!((ball.position.x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_wall_corners_and_normal() {
        let wall = Quad::wall(0.0, 0.0, 4.0, 0.0);
        assert_eq!(wall.corners[1], Vec3::new(0.0, WALL_HEIGHT, 0.0));
        let n = wall.normal();
        assert!((n.z.abs() - 1.0).abs() < 1e-10, "wall along x faces z, got {:?}", n);
    }

    #[test]
    fn test_box_ring_and_floor() {
        let mut b = BoxShape::from_outline(&[[-2.0, -2.0], [-2.0, 2.0], [2.0, 2.0], [2.0, -2.0]]);
        assert_eq!(b.outer_wall_count(), 4);
        assert_eq!(b.walls().len(), 4);
        assert_eq!(b.floor().len(), 4);
        assert!(b.floor().iter().all(|t| t.face_collision_only));

        b.add_wall(Quad::wall(0.0, -1.0, 0.0, 1.0));
        assert_eq!(b.walls().len(), 5);
        assert_eq!(b.outer_wall_count(), 4);
        assert_eq!(b.outline().len(), 4);

        let open = b.without_floor();
        assert!(open.floor().is_empty());
        assert_eq!(open.walls().len(), 5);
    }

    #[test]
    fn test_box_skips_degenerate_fan_triangles() {
        // Centroid of this outline lies on the line x = 2 shared by two edges
        let outline = [
            [-2.0, -2.0],
            [-2.0, 6.0],
            [2.0, 6.0],
            [2.0, 10.0],
            [6.0, 10.0],
            [6.0, 2.0],
            [2.0, 2.0],
            [2.0, -2.0],
        ];
        let b = BoxShape::from_outline(&outline);
        assert_eq!(b.floor().len(), 6);
        assert!(b.floor().iter().all(|t| t.doubled_area() > 1e-6));
    }

    #[test]
    fn test_plane_distance() {
        let plane = Plane::ground(1.0);
        assert!((plane.signed_distance(&Vec3::new(3.0, 0.5, 2.0)) + 0.5).abs() < 1e-12);
        assert!((plane.distance(&Vec3::new(3.0, 0.5, 2.0)) - 0.5).abs() < 1e-12);
        let r = plane.reflect(&Vec3::new(1.0, -2.0, 0.0));
        assert_eq!(r, Vec3::new(1.0, 2.0, 0.0));
    }
}
