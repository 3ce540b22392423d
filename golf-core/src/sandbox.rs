//! Free play: balls and static geometry without turns or scoring.

use crate::config::PhysicsConfig;
use crate::integrator::{Integrator, StepReport};
use crate::render::{self, DrawItem, RenderOptions};
use crate::scene::Node;
use crate::shapes::{Plane, Sphere};
use crate::types::Vec3;

pub struct Sandbox {
    integrator: Integrator,
    scene: Node,
    floor: Option<Plane>,
    balls: Vec<Sphere>,
    /// Every ball as it was added, for `reset_balls`
    spawned: Vec<Sphere>,
}

impl Sandbox {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            integrator: Integrator::from_config(config),
            scene: Node::group(),
            floor: None,
            balls: Vec::new(),
            spawned: Vec::new(),
        }
    }

    pub fn with_scene(mut self, scene: Node) -> Self {
        self.scene = scene;
        self
    }

    /// Use an infinite plane as the floor
    pub fn with_floor(mut self, floor: Plane) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn add_ball(&mut self, ball: Sphere) {
        self.spawned.push(ball.clone());
        self.balls.push(ball);
    }

    /// Convenience for a default ball at `position` moving with `velocity`
    pub fn spawn(&mut self, position: Vec3, velocity: Vec3, radius: f64) {
        let mut ball = Sphere::new(position, radius);
        ball.velocity = velocity;
        self.add_ball(ball);
    }

    /// Put every ball ever added back where it started, culled ones included.
    pub fn reset_balls(&mut self) {
        self.balls = self.spawned.clone();
    }

    pub fn clear(&mut self) {
        self.balls.clear();
        self.spawned.clear();
    }

    /// One step, then drop balls past the cull distance.
    pub fn tick(&mut self) -> StepReport {
        let mut balls: Vec<&mut Sphere> = self.balls.iter_mut().collect();
        let report = self
            .integrator
            .step(&mut self.scene, &mut balls, self.floor.as_ref());

        let before = self.balls.len();
        let integrator = &self.integrator;
        self.balls.retain(|ball| !integrator.is_beyond(ball));
        let culled = before - self.balls.len();
        if culled > 0 {
            log::debug!("Culled {} ball(s)", culled);
        }
        report
    }

    pub fn balls(&self) -> &[Sphere] {
        &self.balls
    }

    pub fn scene(&self) -> &Node {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Node {
        &mut self.scene
    }

    pub fn integrator_mut(&mut self) -> &mut Integrator {
        &mut self.integrator
    }

    pub fn draw_list(&self, options: &RenderOptions) -> Vec<DrawItem> {
        let mut items = Vec::new();
        render::push_node(&self.scene, 0, &mut items);
        for ball in &self.balls {
            render::push_ball(ball, options, &mut items);
        }
        items
    }
}
