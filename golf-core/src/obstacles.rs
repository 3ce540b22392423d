//! Composite obstacles built from quads and triangles.

use std::f64::consts::PI;

use crate::scene::Node;
use crate::shapes::{Quad, Triangle};
use crate::types::{Material, Vec3};

/// Segments around a pillar's circumference
pub const PILLAR_RESOLUTION: usize = 10;

/// A closed cylinder standing on `position`.
///
/// The top cap is built at the origin like the bottom cap and lifted by its
/// own node position, so it relies on translation propagating down the tree.
pub fn pillar(position: Vec3, radius: f64, height: f64) -> Node {
    let mut top = Node::group().at(Vec3::new(0.0, height, 0.0));
    let mut bottom = Node::group();
    let mut sides = Node::group();

    let rim = |i: usize, y: f64| {
        let angle = 2.0 * PI * i as f64 / PILLAR_RESOLUTION as f64;
        Vec3::new(radius * angle.cos(), y, radius * angle.sin())
    };

    for i in 0..PILLAR_RESOLUTION {
        let p1 = rim(i, 0.0);
        let p2 = rim(i + 1, 0.0);
        let p3 = rim(i, height);
        let p4 = rim(i + 1, height);

        top.add_child(Node::triangle(Triangle::new(Vec3::ZERO, p1, p2)));
        bottom.add_child(Node::triangle(Triangle::new(Vec3::ZERO, p1, p2)));
        sides.add_child(Node::triangle(Triangle::new(p1, p2, p3)));
        sides.add_child(Node::triangle(Triangle::new(p2, p3, p4)));
    }

    Node::group()
        .at(position)
        .with_color(Vec3::new(0.6, 0.6, 0.6))
        .with_child(top)
        .with_child(bottom)
        .with_child(sides)
}

/// A `columns × rows` grid of square floor tiles of side `size`, starting at
/// `origin` and extending along +x and +z. Each tile is a pair of face-only
/// triangles; neighbouring tiles alternate between the two colours.
pub fn ground_tiles(
    origin: Vec3,
    columns: usize,
    rows: usize,
    size: f64,
    colors: [Vec3; 2],
) -> Node {
    let mut tiles = Node::group().at(origin);
    for row in 0..rows {
        for col in 0..columns {
            let x = col as f64 * size;
            let z = row as f64 * size;
            let color = colors[(row + col) % 2];
            tiles.add_child(tile(
                [
                    Vec3::new(x, 0.0, z),
                    Vec3::new(x + size, 0.0, z),
                    Vec3::new(x + size, 0.0, z + size),
                    Vec3::new(x, 0.0, z + size),
                ],
                color,
            ));
        }
    }
    tiles
}

/// Floor following `height(x, z)`, sampled on a `columns × rows` grid of
/// square cells starting at `origin`. Sample coordinates are local to the
/// field.
pub fn height_field<F>(origin: Vec3, columns: usize, rows: usize, cell: f64, height: F) -> Node
where
    F: Fn(f64, f64) -> f64,
{
    let sample = |col: usize, row: usize| {
        let x = col as f64 * cell;
        let z = row as f64 * cell;
        Vec3::new(x, height(x, z), z)
    };

    let mut field = Node::group().at(origin);
    for row in 0..rows {
        for col in 0..columns {
            let shade = 0.5 + 0.1 * ((row + col) % 2) as f64;
            field.add_child(tile(
                [
                    sample(col, row),
                    sample(col + 1, row),
                    sample(col + 1, row + 1),
                    sample(col, row + 1),
                ],
                Vec3::new(0.1, shade, 0.1),
            ));
        }
    }
    field
}

/// Rolling sine hills: `amplitude · sin(2πx/λ) · sin(2πz/λ)`.
pub fn sine_hills(amplitude: f64, wavelength: f64) -> impl Fn(f64, f64) -> f64 {
    let k = 2.0 * PI / wavelength;
    move |x, z| amplitude * (k * x).sin() * (k * z).sin()
}

/// A wall on (x1,z1)-(x2,z2) that slides along `velocity`, turning around
/// once it is `extent` away from where it started.
pub fn sweeper(from: [f64; 2], to: [f64; 2], velocity: Vec3, extent: f64) -> Node {
    Node::quad(Quad::wall(from[0], from[1], to[0], to[1]))
        .with_color(Vec3::new(0.9, 0.5, 0.1))
        .patrolling(velocity, extent)
}

/// One square of floor made of two face-only triangles
fn tile(corners: [Vec3; 4], color: Vec3) -> Node {
    let [a, b, c, d] = corners;
    Node::group()
        .with_color(color)
        .with_material(Material::turf())
        .with_child(
            Node::triangle(Triangle::floor(a, b, c))
                .with_color(color)
                .with_material(Material::turf()),
        )
        .with_child(
            Node::triangle(Triangle::floor(a, c, d))
                .with_color(color)
                .with_material(Material::turf()),
        )
}

// =============================================================================
// Tests
// =============================================================================
