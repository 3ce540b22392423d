//! Scene tree of static (or patrolling) course geometry.
//!
//! Every node owns its children outright; there are no parent pointers.
//! Each node caches its world position, which is always the parent's world
//! position plus the node's local `position`. Rotation is local to the node
//! and never composed down the tree, only translation is.
//!
//! ```text
//! course (group)
//! ├── box      walls + floor fan
//! ├── pillar   (group)
//! │   ├── top     lifted by its own position
//! │   ├── bottom
//! │   └── sides
//! └── sweeper  patrols along its velocity
//! ```

use crate::collision::{resolve_contact, CollisionConfig};
use crate::shapes::{BoxShape, Quad, Sphere, Triangle};
use crate::types::{constants, Mat3, Material, Vec3};

/// Geometry carried by a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Pure container; collides only through its children
    Group,
    Quad(Quad),
    Triangle(Triangle),
    Box(BoxShape),
}

/// Back-and-forth motion of a moving obstacle.
///
/// The node moves along its velocity and reverses once it is more than
/// `extent` away from `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patrol {
    pub origin: Vec3,
    pub extent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    position: Vec3,
    world_position: Vec3,
    pub rotation: Mat3,
    pub velocity: Vec3,
    pub color: Vec3,
    pub material: Material,
    pub shape: Shape,
    children: Vec<Node>,
    patrol: Option<Patrol>,
}

impl Node {
    pub fn new(shape: Shape) -> Self {
        Self {
            position: Vec3::ZERO,
            world_position: Vec3::ZERO,
            rotation: Mat3::IDENTITY,
            velocity: Vec3::ZERO,
            color: Vec3::new(1.0, 0.0, 0.0),
            material: Material::wall(),
            shape,
            children: Vec::new(),
            patrol: None,
        }
    }

    pub fn group() -> Self {
        Self::new(Shape::Group)
    }

    pub fn quad(quad: Quad) -> Self {
        Self::new(Shape::Quad(quad))
    }

    pub fn triangle(triangle: Triangle) -> Self {
        Self::new(Shape::Triangle(triangle))
    }

    pub fn boxed(shape: BoxShape) -> Self {
        Self::new(Shape::Box(shape))
    }

    /// Builder form of [`Node::set_position`]
    pub fn at(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    /// Make the node patrol along `velocity`, turning around `extent` units
    /// from where it currently is.
    pub fn patrolling(mut self, velocity: Vec3, extent: f64) -> Self {
        self.velocity = velocity;
        self.patrol = Some(Patrol {
            origin: self.position,
            extent,
        });
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn world_position(&self) -> Vec3 {
        self.world_position
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    pub fn patrol(&self) -> Option<&Patrol> {
        self.patrol.as_ref()
    }

    /// Set the local position and refresh the world position of this node
    /// and every descendant.
    pub fn set_position(&mut self, position: Vec3) {
        let parent_world = self.world_position - self.position;
        self.position = position;
        self.propagate(parent_world);
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.position + delta);
    }

    /// Append a child, placing it relative to this node.
    pub fn add_child(&mut self, mut child: Node) {
        child.propagate(self.world_position);
        self.children.push(child);
    }

    fn propagate(&mut self, parent_world: Vec3) {
        self.world_position = parent_world + self.position;
        let world = self.world_position;
        for child in &mut self.children {
            child.propagate(world);
        }
    }

    /// Scene geometry is immovable in collision response
    pub fn mass(&self) -> f64 {
        constants::STATIC_MASS
    }

    /// Collide `ball` with this node and all descendants, resolving every
    /// contact found. Returns `true` if anything was hit.
    pub fn collide(&self, ball: &mut Sphere, config: &CollisionConfig) -> bool {
        let offset = self.world_position;
        let mut hit = match &self.shape {
            Shape::Group => false,
            Shape::Quad(quad) => {
                collide_one(quad.contact(offset, ball), ball, &self.material, config)
            }
            Shape::Triangle(tri) => {
                collide_one(tri.contact(offset, ball), ball, &self.material, config)
            }
            Shape::Box(shape) => {
                let mut hit = false;
                for wall in shape.walls() {
                    hit |= collide_one(wall.contact(offset, ball), ball, &self.material, config);
                }
                for tile in shape.floor() {
                    hit |= collide_one(
                        tile.contact(offset, ball),
                        ball,
                        &shape.floor_material,
                        config,
                    );
                }
                hit
            }
        };

        for child in &self.children {
            hit |= child.collide(ball, config);
        }
        hit
    }

    /// Advance moving obstacles by `dt`.
    pub fn tick(&mut self, dt: f64) {
        if let Some(patrol) = self.patrol {
            self.translate(self.velocity * dt);
            let offset = self.position - patrol.origin;
            // Only turn around when still heading outward, so a node that
            // overshoots doesn't flip back and forth
            if offset.magnitude() > patrol.extent && offset.dot(&self.velocity) > 0.0 {
                self.velocity = -self.velocity;
            }
        }
        for child in &mut self.children {
            child.tick(dt);
        }
    }

    /// Number of nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::group()
    }
}

fn collide_one(
    contact: Option<crate::collision::Contact>,
    ball: &mut Sphere,
    material: &Material,
    config: &CollisionConfig,
) -> bool {
    match contact {
        Some(contact) => {
            resolve_contact(ball, &contact, material, config);
            true
        }
        None => false,
    }
}

// =============================================================================
// Tests
// =============================================================================
