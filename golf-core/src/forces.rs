//! Forces acting on the balls.
//!
//! The only force is planetary gravity, F = G·M·m / (r + R)², where `r` is
//! the ball radius and `R` the planet radius. Its direction can be tilted
//! away from straight down:
//!
//! ```text
//!   θ = 0      θ = 90°
//!     ↓          →
//!   (0,-1,0)   (1,0,0)
//! ```

use crate::config::PhysicsConfig;
use crate::integrator::ForceModel;
use crate::shapes::Sphere;
use crate::types::Vec3;

/// Newtonian gravity from a planet the course sits on.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetaryGravity {
    pub gravitational_constant: f64,
    pub planet_mass: f64,
    pub planet_radius: f64,
    /// Tilt in degrees; 0 is straight down
    pub direction_deg: f64,
}

impl Default for PlanetaryGravity {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

impl PlanetaryGravity {
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self {
            gravitational_constant: config.gravitational_constant,
            planet_mass: config.planet_mass,
            planet_radius: config.planet_radius,
            direction_deg: config.gravity_direction_deg,
        }
    }

    /// Unit vector gravity pulls along
    pub fn direction(&self) -> Vec3 {
        let theta = self.direction_deg.to_radians();
        Vec3::new(theta.sin(), -theta.cos(), 0.0)
    }

    /// Magnitude of the pull on `ball`
    pub fn magnitude(&self, ball: &Sphere) -> f64 {
        let distance = ball.radius + self.planet_radius;
        self.gravitational_constant * self.planet_mass * ball.mass() / (distance * distance)
    }
}

impl ForceModel for PlanetaryGravity {
    fn force(&self, ball: &Sphere) -> Vec3 {
        self.direction() * self.magnitude(ball)
    }
}

// =============================================================================
// Tests
// =============================================================================
