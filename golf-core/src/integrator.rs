//! Fixed-step motion integrator.
//!
//! Each tick advances every live ball by `dt = time_scale / 60`:
//!
//! ```text
//! 1. scene movers    node.position += node.velocity*dt
//! 2. gravity         v += F*dt/m
//! 3. move            x += v*dt        (rolling rotation applied here)
//! 4. static collide  every node in the scene, then the optional floor plane
//! 5. ball vs ball    at most one bounce per ball per tick
//! ```
//!
//! This is semi-implicit Euler: the new velocity moves the ball. Collisions
//! are discrete overlap tests after the move.

use crate::collision::{bounce_spheres, collide_plane, spheres_overlap, CollisionConfig};
use crate::config::PhysicsConfig;
use crate::forces::PlanetaryGravity;
use crate::scene::Node;
use crate::shapes::{Plane, Sphere};
use crate::types::{constants, Vec3};

/// Trait for computing the force on a ball.
pub trait ForceModel {
    /// Total force on the ball.
    fn force(&self, ball: &Sphere) -> Vec3;

    /// Acceleration from the force, `F / m`.
    fn acceleration(&self, ball: &Sphere) -> Vec3 {
        self.force(ball) / ball.mass()
    }
}

/// What happened during one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Balls that touched scene geometry
    pub static_hits: usize,
    /// Balls that touched the floor plane
    pub floor_hits: usize,
    /// Ball pairs that bounced off each other
    pub ball_bounces: usize,
}

pub struct Integrator<F = PlanetaryGravity> {
    forces: F,
    time_scale: f64,
    collision: CollisionConfig,
    floor_bounce: f64,
    cull_distance: Option<f64>,
}

impl Integrator<PlanetaryGravity> {
    pub fn new() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::with_forces(PlanetaryGravity::from_config(config), config)
    }

    /// Tilt gravity; 0 is straight down.
    pub fn set_gravity_direction(&mut self, degrees: f64) {
        self.forces.direction_deg = degrees;
    }

    pub fn gravity_direction(&self) -> f64 {
        self.forces.direction_deg
    }
}

impl Default for Integrator<PlanetaryGravity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ForceModel> Integrator<F> {
    pub fn with_forces(forces: F, config: &PhysicsConfig) -> Self {
        Self {
            forces,
            time_scale: config.time_scale,
            collision: config.collision_config(),
            floor_bounce: config.floor_bounce,
            cull_distance: config.cull_distance,
        }
    }

    /// Seconds advanced per tick
    pub fn dt(&self) -> f64 {
        self.time_scale / constants::TICK_RATE
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Change the runtime speed multiplier. Non-positive values are ignored.
    pub fn set_time_scale(&mut self, time_scale: f64) {
        if time_scale > 0.0 {
            self.time_scale = time_scale;
        } else {
            log::warn!("Ignoring non-positive time scale {}", time_scale);
        }
    }

    pub fn forces(&self) -> &F {
        &self.forces
    }

    pub fn collision_config(&self) -> &CollisionConfig {
        &self.collision
    }

    /// Advance the scene and the given balls by one tick.
    pub fn step(
        &self,
        scene: &mut Node,
        balls: &mut [&mut Sphere],
        floor: Option<&Plane>,
    ) -> StepReport {
        let dt = self.dt();
        scene.tick(dt);

        for ball in balls.iter_mut() {
            let dv = self.forces.force(ball) * (dt / ball.mass());
            ball.velocity += dv;
        }

        for ball in balls.iter_mut() {
            let delta = ball.velocity * dt;
            ball.translate(delta);
        }

        let mut report = StepReport::default();
        let mut bounced = vec![false; balls.len()];
        for i in 0..balls.len() {
            if scene.collide(&mut *balls[i], &self.collision) {
                report.static_hits += 1;
            }
            if let Some(plane) = floor {
                if collide_plane(&mut *balls[i], plane, self.floor_bounce) {
                    report.floor_hits += 1;
                }
            }

            if bounced[i] {
                continue;
            }
            for j in 0..balls.len() {
                if i == j || bounced[j] {
                    continue;
                }
                let (a, b) = pair_mut(balls, i, j);
                if spheres_overlap(a, b) {
                    bounce_spheres(a, b);
                    bounced[i] = true;
                    bounced[j] = true;
                    report.ball_bounces += 1;
                    break;
                }
            }
        }
        report
    }

    /// True if the ball drifted past the cull distance (if one is set).
    pub fn is_beyond(&self, ball: &Sphere) -> bool {
        self.cull_distance
            .is_some_and(|d| ball.world_position().magnitude() > d)
    }
}

/// Two distinct mutable balls out of the slice.
fn pair_mut<'a>(
    balls: &'a mut [&mut Sphere],
    i: usize,
    j: usize,
) -> (&'a mut Sphere, &'a mut Sphere) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = balls.split_at_mut(j);
        (&mut *lo[i], &mut *hi[0])
    } else {
        let (lo, hi) = balls.split_at_mut(i);
        (&mut *hi[0], &mut *lo[j])
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::BoxShape;

    /// No forces at all
    struct Drift;

    impl ForceModel for Drift {
        fn force(&self, _ball: &Sphere) -> Vec3 {
            Vec3::ZERO
        }
    }

    fn green() -> Node {
        Node::boxed(BoxShape::from_outline(&[
            [-10.0, -10.0],
            [-10.0, 10.0],
            [10.0, 10.0],
            [10.0, -10.0],
        ]))
    }

    #[test]
    fn test_free_fall() {
        let integrator = Integrator::new();
        let mut scene = Node::group();
        let mut ball = Sphere::new(Vec3::new(0.0, 10.0, 0.0), 0.4);

        for _ in 0..60 {
            integrator.step(&mut scene, &mut [&mut ball], None);
        }

        // One second of falling: v = g·t, y = 10 - g·t²/2 (plus a small
        // semi-implicit Euler bias)
        assert!((ball.velocity.y + 9.82).abs() < 0.01, "got {:?}", ball.velocity);
        assert!(
            (ball.position.y - (10.0 - 0.5 * 9.82)).abs() < 0.1,
            "got y={}",
            ball.position.y
        );
    }

    #[test]
    fn test_time_scale() {
        let mut integrator = Integrator::with_forces(Drift, &PhysicsConfig::default());
        let mut scene = Node::group();
        let mut ball = Sphere::new(Vec3::ZERO, 0.4);
        ball.velocity = Vec3::new(6.0, 0.0, 0.0);

        integrator.step(&mut scene, &mut [&mut ball], None);
        assert!((ball.position.x - 0.1).abs() < 1e-12);

        integrator.set_time_scale(2.0);
        integrator.step(&mut scene, &mut [&mut ball], None);
        assert!((ball.position.x - 0.3).abs() < 1e-12);

        integrator.set_time_scale(-1.0);
        assert_eq!(integrator.time_scale(), 2.0);
    }

    #[test]
    fn test_resting_ball_stays_on_floor() {
        let integrator = Integrator::new();
        let mut scene = green();
        let mut ball = Sphere::new(Vec3::new(0.5, 0.401, 0.2), 0.4);

        for tick in 0..300 {
            integrator.step(&mut scene, &mut [&mut ball], None);
            assert!(
                ball.position.y >= ball.radius - 0.001,
                "ball sank into the floor at tick {}: y={}",
                tick,
                ball.position.y
            );
        }
        assert!((ball.position.y - 0.401).abs() < 0.01);
    }

    #[test]
    fn test_rolling_ball_slows_down() {
        let integrator = Integrator::new();
        let mut scene = green();
        let mut ball = Sphere::new(Vec3::new(-5.0, 0.401, 0.5), 0.4);
        ball.velocity = Vec3::new(1.0, 0.0, 0.0);

        for _ in 0..400 {
            integrator.step(&mut scene, &mut [&mut ball], None);
        }
        assert!(ball.velocity.x.abs() < 0.01, "got {:?}", ball.velocity);
        assert!(ball.position.x > -5.0 && ball.position.x < 10.0);
    }

    #[test]
    fn test_head_on_balls_swap() {
        let integrator = Integrator::with_forces(Drift, &PhysicsConfig::default());
        let mut scene = Node::group();
        let bouncy = crate::types::Material {
            bounce_factor: 1.0,
            ..crate::types::Material::ball()
        };
        let mut a = Sphere::new(Vec3::ZERO, 0.4).with_material(bouncy);
        let mut b = Sphere::new(Vec3::new(0.82, 0.0, 0.0), 0.4).with_material(bouncy);
        a.velocity = Vec3::new(1.2, 0.0, 0.0);
        b.velocity = Vec3::new(-1.2, 0.0, 0.0);

        let report = integrator.step(&mut scene, &mut [&mut a, &mut b], None);

        assert_eq!(report.ball_bounces, 1);
        assert!((a.velocity.x + 1.2).abs() < 1e-10);
        assert!((b.velocity.x - 1.2).abs() < 1e-10);
    }

    #[test]
    fn test_one_bounce_per_ball_per_tick() {
        let integrator = Integrator::with_forces(Drift, &PhysicsConfig::default());
        let mut scene = Node::group();
        let mut a = Sphere::new(Vec3::ZERO, 0.4);
        let mut b = Sphere::new(Vec3::new(0.7, 0.0, 0.0), 0.4);
        let mut c = Sphere::new(Vec3::new(1.4, 0.0, 0.0), 0.4);

        let report = integrator.step(&mut scene, &mut [&mut a, &mut b, &mut c], None);
        assert_eq!(report.ball_bounces, 1);
    }

    #[test]
    fn test_floor_plane_catches_ball() {
        let integrator = Integrator::new();
        let mut scene = Node::group();
        let floor = Plane::ground(0.0);
        let mut ball = Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.4);

        let mut hits = 0;
        for _ in 0..240 {
            hits += integrator
                .step(&mut scene, &mut [&mut ball], Some(&floor))
                .floor_hits;
            assert!(ball.position.y >= 0.4 - 0.001 - 0.2);
        }
        assert!(hits > 0);
        assert!(ball.position.y > 0.0 && ball.position.y < 1.0);
    }

    #[test]
    fn test_gravity_direction_and_culling() {
        let config = PhysicsConfig {
            cull_distance: Some(50.0),
            ..PhysicsConfig::default()
        };
        let mut integrator = Integrator::from_config(&config);
        integrator.set_gravity_direction(90.0);
        assert_eq!(integrator.gravity_direction(), 90.0);

        let mut scene = Node::group();
        let mut ball = Sphere::new(Vec3::ZERO, 0.4);
        integrator.step(&mut scene, &mut [&mut ball], None);
        assert!(ball.velocity.x > 0.0 && ball.velocity.y.abs() < 1e-9);

        assert!(!integrator.is_beyond(&ball));
        ball.position = Vec3::new(0.0, -60.0, 0.0);
        assert!(integrator.is_beyond(&ball));
        assert!(!Integrator::new().is_beyond(&ball));
    }
}
