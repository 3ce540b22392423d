//! Shot input.
//!
//! Shots may be produced on another thread (e.g. a UI event loop) through a
//! [`ShotSender`]. They are queued and only taken by the game at the start
//! of a tick, so a shot never lands in the middle of a physics step.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::types::Vec3;

/// Handle for queueing shots from any thread
pub type ShotSender = Sender<Vec3>;

/// Horizontal shot velocity for a strength and a direction in degrees,
/// where 0° points down +z and 90° down +x.
pub fn shot_vector(strength: f64, direction_deg: f64) -> Vec3 {
    let theta = direction_deg.to_radians();
    Vec3::new(strength * theta.sin(), 0.0, strength * theta.cos())
}

/// Aim state plus the queue of pending shots.
#[derive(Debug)]
pub struct Controller {
    strength: f64,
    direction_deg: f64,
    sender: Sender<Vec3>,
    receiver: Receiver<Vec3>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            strength: 0.0,
            direction_deg: 0.0,
            sender,
            receiver,
        }
    }

    /// Update the aim preview.
    pub fn set_aim(&mut self, strength: f64, direction_deg: f64) {
        self.strength = strength.max(0.0);
        self.direction_deg = direction_deg;
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn direction_deg(&self) -> f64 {
        self.direction_deg
    }

    /// Velocity the current aim would give the ball
    pub fn aim(&self) -> Vec3 {
        shot_vector(self.strength, self.direction_deg)
    }

    /// Queue a shot with the current aim.
    pub fn fire(&self) {
        // The receiver lives as long as self, so sending can't fail
        let _ = self.sender.send(self.aim());
    }

    pub fn sender(&self) -> ShotSender {
        self.sender.clone()
    }

    /// All shots queued since the last call, oldest first.
    pub fn drain(&self) -> Vec<Vec3> {
        self.receiver.try_iter().collect()
    }
}
