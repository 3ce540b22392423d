//! Draw lists for an external renderer.
//!
//! The scene is flattened depth first, parent before children. Each item
//! carries the node's *local* translation and rotation; a renderer keeps a
//! transform stack, pushing on deeper items and popping when the depth
//! drops back. No pixels are produced here.

use crate::scene::{Node, Shape};
use crate::shapes::Sphere;
use crate::types::{Mat3, Vec3};

/// Length of the debug axis lines drawn on balls
const AXIS_LENGTH: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Draw velocity, floor normal and roll axis lines on every ball
    pub show_axis: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawKind {
    Group,
    Quad {
        corners: [Vec3; 4],
    },
    Triangle {
        corners: [Vec3; 3],
    },
    /// Wall quads plus the floor fan triangles
    Box {
        walls: Vec<[Vec3; 4]>,
        floor: Vec<[Vec3; 3]>,
    },
    Sphere {
        radius: f64,
    },
    /// Flat disc marking the hole
    Hole {
        radius: f64,
    },
    Line {
        from: Vec3,
        to: Vec3,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    /// Nesting depth; 0 for roots
    pub depth: usize,
    pub translation: Vec3,
    pub rotation: Mat3,
    pub color: Vec3,
    pub kind: DrawKind,
}

/// Append the subtree rooted at `node`, starting at `depth`.
pub fn push_node(node: &Node, depth: usize, out: &mut Vec<DrawItem>) {
    let kind = match &node.shape {
        Shape::Group => DrawKind::Group,
        Shape::Quad(q) => DrawKind::Quad { corners: q.corners },
        Shape::Triangle(t) => DrawKind::Triangle { corners: t.corners },
        Shape::Box(b) => DrawKind::Box {
            walls: b.walls().iter().map(|w| w.corners).collect(),
            floor: b.floor().iter().map(|t| t.corners).collect(),
        },
    };
    out.push(DrawItem {
        depth,
        translation: node.position(),
        rotation: node.rotation,
        color: node.color,
        kind,
    });
    for child in node.children() {
        push_node(child, depth + 1, out);
    }
}

/// Append a ball as a root item. Debug axes, when enabled, are separate
/// root items at the ball's position without its rotation.
pub fn push_ball(ball: &Sphere, options: &RenderOptions, out: &mut Vec<DrawItem>) {
    out.push(DrawItem {
        depth: 0,
        translation: ball.world_position(),
        rotation: ball.rotation,
        color: ball.color,
        kind: DrawKind::Sphere {
            radius: ball.radius,
        },
    });

    if !options.show_axis {
        return;
    }
    let axes = [
        (ball.velocity.normalized(), Vec3::new(1.0, 0.0, 0.0)),
        (ball.floor_normal.normalized(), Vec3::new(0.0, 1.0, 0.0)),
        (
            ball.velocity.normalized().cross(&ball.floor_normal).normalized(),
            Vec3::new(0.0, 0.0, 1.0),
        ),
    ];
    for (dir, color) in axes {
        // Roots of their own: they follow the ball but not its roll
        out.push(DrawItem {
            depth: 0,
            translation: ball.world_position(),
            rotation: Mat3::IDENTITY,
            color,
            kind: DrawKind::Line {
                from: Vec3::ZERO,
                to: dir * AXIS_LENGTH,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Quad, Triangle};

    #[test]
    fn test_depth_first_parent_before_children() {
        let tree = Node::group()
            .with_child(
                Node::group()
                    .at(Vec3::new(1.0, 0.0, 0.0))
                    .with_child(Node::quad(Quad::default())),
            )
            .with_child(Node::triangle(Triangle::new(
                Vec3::ZERO,
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            )));

        let mut items = Vec::new();
        push_node(&tree, 0, &mut items);

        let depths: Vec<usize> = items.iter().map(|i| i.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1]);
        assert!(matches!(items[2].kind, DrawKind::Quad { .. }));
        assert!(matches!(items[3].kind, DrawKind::Triangle { .. }));
        // Local, not world, translation
        assert_eq!(items[1].translation, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(items[2].translation, Vec3::ZERO);
    }

    #[test]
    fn test_ball_axes_follow_option() {
        let mut ball = Sphere::new(Vec3::new(0.0, 0.4, 0.0), 0.4);
        ball.translate(Vec3::new(0.3, 0.0, 0.0));
        ball.velocity = Vec3::new(1.0, 0.0, 0.0);
        assert_ne!(ball.rotation, Mat3::IDENTITY, "ball has rolled");

        let mut items = Vec::new();
        push_ball(&ball, &RenderOptions::default(), &mut items);
        assert_eq!(items.len(), 1);

        items.clear();
        push_ball(&ball, &RenderOptions { show_axis: true }, &mut items);
        assert_eq!(items.len(), 4);
        let DrawKind::Line { to, .. } = &items[3].kind else {
            panic!("expected roll axis line");
        };
        // x × y = z
        assert!((to.z - 1.0).abs() < 1e-12, "got {:?}", to);

        // Axes are not spun by the ball's roll
        for line in &items[1..] {
            assert_eq!(line.depth, 0);
            assert_eq!(line.rotation, Mat3::IDENTITY);
            assert_eq!(line.translation, ball.world_position());
        }
    }
}
