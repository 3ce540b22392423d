//! Courses: hole, tee and the static geometry around them.
//!
//! A course is described by a [`CourseDef`] (loadable from YAML) and built
//! into a scene tree. The built-in sequence is played in order:
//!
//! | # | Name          | Geometry                               | Par |
//! |---|---------------|----------------------------------------|-----|
//! | 1 | walled green  | L-shaped walls, tiled floor, pillar    | 3   |
//! | 2 | rolling hills | sine height field inside walls         | 4   |
//! | 3 | sweeper       | walled green with a sliding wall       | 3   |

use serde::{Deserialize, Serialize};

use super::player::Player;
use super::scoring::score_term;
use crate::config::ConfigError;
use crate::obstacles;
use crate::scene::Node;
use crate::shapes::{BoxShape, Quad, Triangle};
use crate::types::{Material, Vec3};

/// Colours of alternating floor tiles
const TILE_COLORS: [Vec3; 2] = [Vec3::new(0.1, 0.6, 0.1), Vec3::new(0.1, 0.5, 0.1)];

fn default_par() -> u32 {
    3
}

fn default_hole_radius() -> f64 {
    0.5
}

fn default_impulse() -> Vec3 {
    Vec3::new(2.0, 0.0, 1.0)
}

/// One piece of course geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDef {
    /// Ring of walls on an `[x, z]` outline; `extra_walls` are
    /// free-standing `[x1, z1, x2, z2]` walls
    Box {
        outline: Vec<[f64; 2]>,
        #[serde(default = "default_true")]
        floor: bool,
        #[serde(default)]
        extra_walls: Vec<[f64; 4]>,
    },
    Wall {
        from: [f64; 2],
        to: [f64; 2],
    },
    Quad {
        corners: [Vec3; 4],
    },
    Triangle {
        corners: [Vec3; 3],
        #[serde(default)]
        face_only: bool,
    },
    Pillar {
        position: Vec3,
        radius: f64,
        height: f64,
    },
    Tiles {
        origin: Vec3,
        columns: usize,
        rows: usize,
        size: f64,
    },
    HeightField {
        origin: Vec3,
        columns: usize,
        rows: usize,
        cell: f64,
        amplitude: f64,
        wavelength: f64,
    },
    Sweeper {
        from: [f64; 2],
        to: [f64; 2],
        velocity: Vec3,
        extent: f64,
    },
}

fn default_true() -> bool {
    true
}

impl ShapeDef {
    pub fn build(&self) -> Node {
        match self {
            ShapeDef::Box {
                outline,
                floor,
                extra_walls,
            } => {
                let mut shape = BoxShape::from_outline(outline);
                if !floor {
                    shape = shape.without_floor();
                }
                for &[x1, z1, x2, z2] in extra_walls {
                    shape.add_wall(Quad::wall(x1, z1, x2, z2));
                }
                Node::boxed(shape).with_color(Vec3::new(0.55, 0.35, 0.2))
            }
            ShapeDef::Wall { from, to } => {
                Node::quad(Quad::wall(from[0], from[1], to[0], to[1]))
                    .with_color(Vec3::new(0.55, 0.35, 0.2))
            }
            ShapeDef::Quad { corners } => {
                let [a, b, c, d] = *corners;
                Node::quad(Quad::new(a, b, c, d))
            }
            ShapeDef::Triangle { corners, face_only } => {
                let [a, b, c] = *corners;
                let tri = if *face_only {
                    Triangle::floor(a, b, c)
                } else {
                    Triangle::new(a, b, c)
                };
                Node::triangle(tri).with_material(Material::turf())
            }
            ShapeDef::Pillar {
                position,
                radius,
                height,
            } => obstacles::pillar(*position, *radius, *height),
            ShapeDef::Tiles {
                origin,
                columns,
                rows,
                size,
            } => obstacles::ground_tiles(*origin, *columns, *rows, *size, TILE_COLORS),
            ShapeDef::HeightField {
                origin,
                columns,
                rows,
                cell,
                amplitude,
                wavelength,
            } => obstacles::height_field(
                *origin,
                *columns,
                *rows,
                *cell,
                obstacles::sine_hills(*amplitude, *wavelength),
            ),
            ShapeDef::Sweeper {
                from,
                to,
                velocity,
                extent,
            } => obstacles::sweeper(*from, *to, *velocity, *extent),
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            ShapeDef::Box { outline, .. } if outline.len() < 3 => {
                Err(format!("box outline needs 3 points, got {}", outline.len()))
            }
            ShapeDef::Wall { from, to } if from == to => {
                Err("wall endpoints must differ".to_string())
            }
            ShapeDef::Pillar { radius, height, .. } if !(*radius > 0.0 && *height > 0.0) => {
                Err("pillar radius and height must be positive".to_string())
            }
            ShapeDef::Tiles { size, .. } if !(*size > 0.0) => {
                Err("tile size must be positive".to_string())
            }
            ShapeDef::HeightField {
                cell, wavelength, ..
            } if !(*cell > 0.0 && *wavelength > 0.0) => {
                Err("height field cell and wavelength must be positive".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Serializable description of a hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDef {
    pub name: String,
    #[serde(default = "default_par")]
    pub par: u32,
    pub hole: Vec3,
    #[serde(default = "default_hole_radius")]
    pub hole_radius: f64,
    /// Ball centre at the tee
    pub start: Vec3,
    /// Velocity given to the ball when a player steps up
    #[serde(default = "default_impulse")]
    pub impulse: Vec3,
    #[serde(default)]
    pub shapes: Vec<ShapeDef>,
}

impl CourseDef {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.par == 0 {
            return Err(ConfigError::Invalid(format!("{}: par must be at least 1", self.name)));
        }
        if !(self.hole_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "{}: hole radius must be positive",
                self.name
            )));
        }
        for shape in &self.shapes {
            shape
                .validate()
                .map_err(|reason| ConfigError::Invalid(format!("{}: {}", self.name, reason)))?;
        }
        Ok(())
    }
}

/// Outline of the L-shaped green shared by the first and last hole
const L_OUTLINE: [[f64; 2]; 8] = [
    [-2.0, -2.0],
    [-2.0, 6.0],
    [2.0, 6.0],
    [2.0, 10.0],
    [6.0, 10.0],
    [6.0, 2.0],
    [2.0, 2.0],
    [2.0, -2.0],
];

/// L-shaped green with a tiled floor and a pillar in the corner.
pub fn walled_green() -> CourseDef {
    CourseDef {
        name: "walled green".to_string(),
        par: 3,
        hole: Vec3::new(4.0, 0.0, 8.0),
        hole_radius: 0.5,
        start: Vec3::new(0.0, 0.45, 0.0),
        impulse: default_impulse(),
        shapes: vec![
            ShapeDef::Box {
                outline: L_OUTLINE.to_vec(),
                floor: false,
                extra_walls: vec![],
            },
            ShapeDef::Tiles {
                origin: Vec3::new(-2.0, 0.0, -2.0),
                columns: 4,
                rows: 8,
                size: 1.0,
            },
            ShapeDef::Tiles {
                origin: Vec3::new(2.0, 0.0, 2.0),
                columns: 4,
                rows: 8,
                size: 1.0,
            },
            ShapeDef::Pillar {
                position: Vec3::new(0.0, 0.0, 4.5),
                radius: 0.4,
                height: 1.0,
            },
        ],
    }
}

/// Long walled valley over rolling hills.
pub fn rolling_hills() -> CourseDef {
    CourseDef {
        name: "rolling hills".to_string(),
        par: 4,
        hole: Vec3::new(0.0, 0.0, 10.0),
        hole_radius: 0.5,
        start: Vec3::new(0.0, 0.45, -1.0),
        impulse: Vec3::new(0.0, 0.0, 4.0),
        shapes: vec![
            ShapeDef::Box {
                outline: vec![[-3.0, -3.0], [-3.0, 13.0], [3.0, 13.0], [3.0, -3.0]],
                floor: false,
                extra_walls: vec![],
            },
            ShapeDef::HeightField {
                origin: Vec3::new(-3.0, 0.0, -3.0),
                columns: 6,
                rows: 16,
                cell: 1.0,
                amplitude: 0.3,
                wavelength: 6.0,
            },
        ],
    }
}

/// Straight green with a wall sliding across the middle.
pub fn sweeper_alley() -> CourseDef {
    CourseDef {
        name: "sweeper".to_string(),
        par: 3,
        hole: Vec3::new(0.0, 0.0, 12.0),
        hole_radius: 0.5,
        start: Vec3::new(0.0, 0.45, 0.0),
        impulse: Vec3::new(0.0, 0.0, 5.0),
        shapes: vec![
            ShapeDef::Box {
                outline: vec![[-3.0, -2.0], [-3.0, 14.0], [3.0, 14.0], [3.0, -2.0]],
                floor: true,
                extra_walls: vec![[-3.0, 9.0, -1.0, 9.0], [1.0, 9.0, 3.0, 9.0]],
            },
            ShapeDef::Sweeper {
                from: [-1.0, 6.0],
                to: [1.0, 6.0],
                velocity: Vec3::new(1.5, 0.0, 0.0),
                extent: 1.5,
            },
        ],
    }
}

/// The built-in holes in playing order
pub fn standard_sequence() -> Vec<CourseDef> {
    vec![walled_green(), rolling_hills(), sweeper_alley()]
}

/// A built hole ready to play.
#[derive(Debug, Clone)]
pub struct Course {
    name: String,
    par: u32,
    hole: Vec3,
    hole_radius: f64,
    start: Vec3,
    impulse: Vec3,
    scene: Node,
}

impl Course {
    /// Build the scene for `def` and put every player's ball on the tee.
    pub fn build(def: &CourseDef, players: &mut [Player]) -> Self {
        let mut scene = Node::group();
        for shape in &def.shapes {
            scene.add_child(shape.build());
        }
        for player in players.iter_mut() {
            player.reset_for_hole(def.start);
        }

        Self {
            name: def.name.clone(),
            par: def.par,
            hole: def.hole,
            hole_radius: def.hole_radius,
            start: def.start,
            impulse: def.impulse,
            scene,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn par(&self) -> u32 {
        self.par
    }

    pub fn hole(&self) -> Vec3 {
        self.hole
    }

    pub fn hole_radius(&self) -> f64 {
        self.hole_radius
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn impulse(&self) -> Vec3 {
        self.impulse
    }

    pub fn scene(&self) -> &Node {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Node {
        &mut self.scene
    }

    /// Distance from the ball to the hole
    pub fn distance_to_hole(&self, player: &Player) -> f64 {
        player.ball().world_position().distance(&self.hole)
    }

    /// Finish every player whose ball reached the hole. Returns the indices
    /// of players who holed out.
    pub fn check_holes(&self, players: &mut [Player]) -> Vec<usize> {
        let mut holed = Vec::new();
        for (i, player) in players.iter_mut().enumerate() {
            if player.finished_hole() {
                continue;
            }
            if self.distance_to_hole(player) < self.hole_radius + player.ball().radius {
                let term = score_term(player.strokes(), self.par);
                log::info!("{}: {}", player.name(), term);
                player.finish_hole();
                holed.push(i);
            }
        }
        holed
    }
}
