//! Collision detection and resolution for the golf ball.
//!
//! This module handles:
//! - **Detection**: Finding which polygon feature a ball overlaps
//! - **Resolution**: Computing post-collision velocity and pushing the ball out
//!
//! ## Discrete Overlap Test
//!
//! Each tick the ball is moved first and then tested for overlap with every
//! static polygon. There is no swept test, so a very fast ball can tunnel
//! through thin geometry.
//!
//! ```text
//!      ● ball after move
//!     ╱│╲
//! ═══╳═╪═╳═══ polygon
//!      └─ penetration = radius - distance
//! ```
//!
//! Polygon features are checked corner first, then edges, then the face.

pub mod detection;
pub mod resolution;

pub use detection::*;
pub use resolution::*;
