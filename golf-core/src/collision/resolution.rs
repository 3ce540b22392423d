//! Collision response for the ball.
//!
//! Computes post-collision velocity and position based on:
//! - Combined bounce factor (product of both bodies' factors)
//! - Surface friction (rolling deceleration)
//! - Penetration depth (positional correction)
//!
//! ## Model Assumptions
//!
//! - **Static geometry as infinite mass**: walls and floors never move in
//!   response to the ball.
//! - **One contact at a time**: each polygon resolves its first touching
//!   feature; there is no simultaneous contact solver.
//!
//! ## Rolling vs Bouncing
//!
//! ```text
//!   reflected velocity
//!        ↗
//!   ●───────→  tangential part kept, minus friction (rolling)
//! ══════════ surface
//! ```
//!
//! Face contacts on surfaces with friction roll: the normal component is
//! dropped and the tangential speed decays by `μ·g·dt`. Frictionless
//! surfaces bounce: only the normal component is damped.

use serde::{Deserialize, Serialize};

use super::detection::{Contact, ContactKind};
use crate::shapes::{Plane, Sphere};
use crate::types::{constants, Material, Vec3};

/// Below this alignment between push direction and contact normal the ball
/// is pushed straight along the normal instead.
const MIN_PUSH_ALIGNMENT: f64 = 0.1;

/// Centre distance after a sphere-vs-sphere bounce, relative to the sum of
/// the radii
pub const SPHERE_SEPARATION: f64 = 1.001;

/// When a face contact is treated as rolling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollingPolicy {
    /// Every face contact with a surface that has friction rolls.
    Always,
    /// Roll only when the reflected speed² is below the threshold; faster
    /// impacts bounce. Not used by the default configuration.
    BelowSpeed { speed_squared: f64 },
}

impl Default for RollingPolicy {
    fn default() -> Self {
        RollingPolicy::Always
    }
}

/// Configuration for collision response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionConfig {
    pub rolling: RollingPolicy,
    /// Gravity used for the friction normal force (a = μ·g)
    pub friction_gravity: f64,
    /// Timestep over which friction is applied
    pub friction_dt: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            rolling: RollingPolicy::Always,
            friction_gravity: 9.81,
            friction_dt: constants::FRICTION_DT,
        }
    }
}

/// How a face contact was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactResponse {
    Roll,
    Bounce,
}

/// Resolve a contact between `sphere` and a static surface.
///
/// Corner and edge hits reflect the whole velocity scaled by the combined
/// bounce factor. Face hits go through [`apply_contact_velocity`]. The
/// sphere is then pushed out of the surface.
pub fn resolve_contact(
    sphere: &mut Sphere,
    contact: &Contact,
    surface: &Material,
    config: &CollisionConfig,
) -> ContactResponse {
    let normal = contact.normal;
    let velocity = sphere.velocity;

    // Only reflect velocities heading into the surface
    let reflection = if velocity.dot(&normal) < 0.0 {
        velocity.reflect(&normal)
    } else {
        velocity
    };

    let response = match contact.kind {
        ContactKind::Vertex | ContactKind::Edge => {
            sphere.velocity = reflection * sphere.material.combined_bounce(surface);
            ContactResponse::Bounce
        }
        ContactKind::Face => apply_contact_velocity(sphere, reflection, normal, surface, config),
    };

    push_out(sphere, reflection, normal, contact.penetration(sphere.radius));
    response
}

/// Apply a reflected velocity to the sphere, choosing rolling or bouncing.
pub fn apply_contact_velocity(
    sphere: &mut Sphere,
    new_velocity: Vec3,
    normal: Vec3,
    surface: &Material,
    config: &CollisionConfig,
) -> ContactResponse {
    let has_friction = surface.friction_coefficient > 0.0;
    let rolling = match config.rolling {
        RollingPolicy::Always => has_friction,
        RollingPolicy::BelowSpeed { speed_squared } => {
            has_friction && new_velocity.magnitude_squared() < speed_squared
        }
    };

    if !rolling {
        let normal_part = normal * new_velocity.dot(&normal);
        sphere.velocity = new_velocity - normal_part
            + normal_part * sphere.material.combined_bounce(surface);
        return ContactResponse::Bounce;
    }

    sphere.floor_normal = normal;

    // Coulomb friction: a = μ·g, independent of mass
    let decel = surface.friction_coefficient * config.friction_gravity;
    let speed_loss = decel * config.friction_dt;
    let speed = new_velocity.magnitude();
    if speed_loss > speed {
        sphere.velocity = Vec3::ZERO;
        return ContactResponse::Roll;
    }

    let dir = new_velocity.normalized();
    let tangent = dir - normal * dir.dot(&normal);
    sphere.velocity = tangent * (speed - speed_loss);
    ContactResponse::Roll
}

/// Move the sphere out of penetration along `direction`, scaled so that the
/// movement along the contact normal equals the penetration plus slop.
fn push_out(sphere: &mut Sphere, direction: Vec3, normal: Vec3, penetration: f64) {
    let depth = penetration + constants::CONTACT_SLOP;
    let shift = match direction.try_normalized() {
        Some(dir) if dir.dot(&normal) > MIN_PUSH_ALIGNMENT => dir * (depth / dir.dot(&normal)),
        _ => normal * depth,
    };
    sphere.translate(shift);
}

/// Elastic collision between two balls.
///
/// Velocities are exchanged along the line of centres, weighted by mass and
/// scaled by the combined bounce factor. Afterwards the centres are placed
/// `SPHERE_SEPARATION × (r1 + r2)` apart, each ball moving half the way.
pub fn bounce_spheres(a: &mut Sphere, b: &mut Sphere) {
    let p1 = a.world_position();
    let p2 = b.world_position();
    let Some(line) = (p2 - p1).try_normalized() else {
        return;
    };

    let m1 = a.mass();
    let m2 = b.mass();
    let v1 = a.velocity;
    let v2 = b.velocity;

    let v1f = v1 - line * (2.0 * m2 / (m1 + m2) * (v1 - v2).dot(&line));
    let v2f = v2 - line * (2.0 * m1 / (m1 + m2) * (v2 - v1).dot(&line));

    let bounce = a.material.combined_bounce(&b.material);
    a.velocity = v1f * bounce;
    b.velocity = v2f * bounce;

    let target = (a.radius + b.radius) * SPHERE_SEPARATION;
    let shift = line * ((target - p1.distance(&p2)) / 2.0);
    a.translate(-shift);
    b.translate(shift);
}

/// Collide a sphere with an infinite plane, treating the side opposite the
/// normal as solid.
///
/// Returns `true` if the sphere was touching the plane.
pub fn collide_plane(sphere: &mut Sphere, plane: &Plane, floor_bounce: f64) -> bool {
    let distance = plane.signed_distance(&sphere.world_position());
    if distance >= sphere.radius {
        return false;
    }

    let normal = plane.normal;
    let mut velocity = sphere.velocity;
    if velocity.dot(&normal) < 0.0 {
        velocity = plane.reflect(&velocity);
    }
    let normal_part = normal * velocity.dot(&normal);
    sphere.velocity = velocity - normal_part + normal_part * floor_bounce;

    sphere.translate(normal * (sphere.radius - distance + constants::CONTACT_SLOP));
    true
}

// =============================================================================
// Tests
// =============================================================================
