//! # Golf Core
//!
//! Simulation core for a turn-based 3D minigolf game.
//!
//! ## Architecture
//!
//! - `types`: Core value types (Vec3, Mat3, materials, constants)
//! - `shapes`: Ball sphere, quads, triangles, walled boxes, planes
//! - `scene`: Owned tree of course geometry with world-position propagation
//! - `obstacles`: Pillars, floor tiles, height fields, sweepers
//! - `collision`: Sphere-vs-polygon/sphere/plane detection and response
//! - `forces`: Planetary gravity
//! - `integrator`: Fixed-step loop (gravity, move, collide)
//! - `game`: Players, courses, scoring and the shot state machine
//! - `render`: Draw lists for an external renderer
//! - `sandbox`: Free play without turns
//! - `config`: YAML-based game and course configuration loader

pub mod collision;
pub mod config;
pub mod forces;
pub mod game;
pub mod integrator;
pub mod obstacles;
pub mod render;
pub mod sandbox;
pub mod scene;
pub mod shapes;
pub mod types;

pub use config::{ConfigError, ConfigLoader, GameConfig};
pub use game::{Game, MatchSummary, ShotState};
pub use types::{Mat3, Material, Vec3};
