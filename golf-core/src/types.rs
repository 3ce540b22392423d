//! Core value types for the simulation.
//!
//! World units are arbitrary "course units"; the ball radius is 0.4 and a
//! standard wall is 2 units high. Time is in seconds.
//!
//! Coordinate system:
//! - X, Z: horizontal plane of the course
//! - Y: vertical (positive upward)

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

// =============================================================================
// Vec3 - 3D Vector
// =============================================================================

/// A 3D vector used for positions, velocities, normals and colours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Vector with all three components set to `v`
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit vector in the same direction, or zero if magnitude is zero
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < constants::EPSILON {
            Self::ZERO
        } else {
            *self / mag
        }
    }

    /// Unit vector, or `None` for a (near) zero-length vector.
    pub fn try_normalized(&self) -> Option<Self> {
        let mag = self.magnitude();
        if mag < constants::EPSILON {
            None
        } else {
            Some(*self / mag)
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Euclidean distance between two points
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }

    /// Reflect vector around a unit normal
    pub fn reflect(&self, normal: &Self) -> Self {
        *self - *normal * 2.0 * self.dot(normal)
    }

    /// Normal of the plane through `self`, `a` and `b`.
    ///
    /// Falls back to `UP` when the three points are collinear.
    pub fn plane_normal(&self, a: &Self, b: &Self) -> Self {
        let v1 = *a - *self;
        let v2 = *b - *self;
        v1.cross(&v2).try_normalized().unwrap_or(Self::UP)
    }
}

// Operator overloads for Vec3
impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

// =============================================================================
// Mat3 - Rotation
// =============================================================================

/// Row-major 3x3 matrix holding a node's local rotation.
///
/// Rotations are composed but never re-orthonormalized, so long chains of
/// small rolling rotations may drift slightly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat3 {
    pub rows: [[f64; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Rotation of `angle` radians around a unit `axis` (Rodrigues' formula).
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let Vec3 { x, y, z } = axis;
        Self {
            rows: [
                [t * x * x + c, t * x * y - s * z, t * x * z + s * y],
                [t * x * y + s * z, t * y * y + c, t * y * z - s * x],
                [t * x * z - s * y, t * y * z + s * x, t * z * z + c],
            ],
        }
    }

    /// Apply the matrix to a vector
    pub fn transform(&self, v: Vec3) -> Vec3 {
        let r = &self.rows;
        Vec3::new(
            r[0][0] * v.x + r[0][1] * v.y + r[0][2] * v.z,
            r[1][0] * v.x + r[1][1] * v.y + r[1][2] * v.z,
            r[2][0] * v.x + r[2][1] * v.y + r[2][2] * v.z,
        )
    }
}

impl Mul for Mat3 {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        let mut rows = [[0.0; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.rows[i][k] * other.rows[k][j]).sum();
            }
        }
        Self { rows }
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// =============================================================================
// Material Properties
// =============================================================================

/// Physical properties shared by every body in the scene.
///
/// `bounce_factor` is expected in [0, 1] but is not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub bounce_factor: f64,
    pub friction_coefficient: f64,
    pub density: f64,
}

impl Material {
    /// Golf ball
    pub fn ball() -> Self {
        Self {
            bounce_factor: 0.8,
            friction_coefficient: 0.0,
            density: 1.0,
        }
    }

    /// Frictionless bumper wall; collisions with it bounce.
    pub fn wall() -> Self {
        Self {
            bounce_factor: 0.8,
            friction_coefficient: 0.0,
            density: 1.0,
        }
    }

    /// Putting surface; collisions with it roll under friction.
    pub fn turf() -> Self {
        Self {
            bounce_factor: 0.5,
            friction_coefficient: 0.05,
            density: 1.0,
        }
    }

    /// Combined bounce factor of two bodies in contact
    pub fn combined_bounce(&self, other: &Material) -> f64 {
        self.bounce_factor * other.bounce_factor
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::wall()
    }
}

// =============================================================================
// Physical Constants
// =============================================================================

/// Constants used in the simulation.
pub mod constants {
    /// Mass reported by static geometry, so sphere-vs-static collisions act
    /// like collisions with an immovable body.
    pub const STATIC_MASS: f64 = 99_999_999_999.9;

    /// Nominal simulation rate (ticks per second)
    pub const TICK_RATE: f64 = 60.0;

    /// Fixed friction timestep used by the rolling response
    pub const FRICTION_DT: f64 = 1.0 / TICK_RATE;

    /// Extra clearance added when pushing a ball out of penetration
    pub const CONTACT_SLOP: f64 = 0.001;

    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-10;
}

// =============================================================================
// Tests
// =============================================================================
