use crate::shapes::Sphere;
use crate::types::Vec3;

/// Radius of every player's ball
pub const BALL_RADIUS: f64 = 0.4;

/// Where balls of players who holed out wait for the next hole
pub const PARKED_POSITION: Vec3 = Vec3::new(0.0, 10_000.0, 0.0);

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    name: String,
    score: u32,
    strokes: u32,
    started_hole: bool,
    finished_hole: bool,
    ball: Sphere,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
            strokes: 0,
            started_hole: false,
            finished_hole: false,
            ball: Sphere::new(Vec3::ZERO, BALL_RADIUS),
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.ball.color = color;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Strokes summed over all completed holes
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Strokes on the current hole
    pub fn strokes(&self) -> u32 {
        self.strokes
    }

    pub fn started_hole(&self) -> bool {
        self.started_hole
    }

    pub fn finished_hole(&self) -> bool {
        self.finished_hole
    }

    /// Still playing the current hole
    pub fn is_in_game(&self) -> bool {
        self.started_hole && !self.finished_hole
    }

    pub fn ball(&self) -> &Sphere {
        &self.ball
    }

    pub fn ball_mut(&mut self) -> &mut Sphere {
        &mut self.ball
    }

    pub fn start_hole(&mut self) {
        self.started_hole = true;
    }

    pub fn add_stroke(&mut self) {
        self.strokes += 1;
    }

    /// Mark the hole done, bank the strokes and take the ball out of play.
    pub fn finish_hole(&mut self) {
        self.finished_hole = true;
        self.score += self.strokes;
        self.ball.place(PARKED_POSITION);
    }

    /// Prepare for a new hole with the ball resting on `start`.
    pub fn reset_for_hole(&mut self, start: Vec3) {
        self.strokes = 0;
        self.started_hole = false;
        self.finished_hole = false;
        self.ball.place(start);
    }

    /// Forget everything, including the score.
    pub fn reset(&mut self) {
        self.score = 0;
        self.reset_for_hole(Vec3::ZERO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hole_lifecycle() {
        let mut p = Player::new("Player 1");
        assert!(!p.is_in_game());

        p.start_hole();
        assert!(p.is_in_game());
        p.add_stroke();
        p.add_stroke();
        p.finish_hole();

        assert!(!p.is_in_game());
        assert_eq!(p.score(), 2);
        assert_eq!(p.ball().position, PARKED_POSITION);

        p.reset_for_hole(Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(p.strokes(), 0);
        assert_eq!(p.score(), 2);
        assert!(!p.started_hole() && !p.finished_hole());
        assert_eq!(p.ball().position, Vec3::new(1.0, 0.5, 0.0));

        p.reset();
        assert_eq!(p.score(), 0);
    }
}
