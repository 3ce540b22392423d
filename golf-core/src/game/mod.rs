//! Turn-based match: players take shots hole by hole.
//!
//! ## Shot States
//!
//! ```text
//!           pick player              shoot
//!   READY ──────────────→ AIMING ──────────→ MOVING
//!     ↑                     ↑                  │
//!     │                     └── out of bounds ─┤
//!     └──────── stopped or holed ──────────────┘
//!
//!   all holes played → FINISHED ── next tick ──→ READY (new match)
//! ```
//!
//! Only balls of players who are on the current hole (started and not yet
//! holed) take part in physics.

pub mod controller;
pub mod course;
pub mod player;
pub mod scoring;

pub use controller::{shot_vector, Controller, ShotSender};
pub use course::{standard_sequence, Course, CourseDef, ShapeDef};
pub use player::{Player, BALL_RADIUS};
pub use scoring::{score_term, ScoreTerm};

use crate::config::{GameConfig, InputMode};
use crate::integrator::{Integrator, StepReport};
use crate::render::{self, DrawItem, DrawKind, RenderOptions};
use crate::shapes::Sphere;
use crate::types::{Mat3, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotState {
    /// Waiting to pick who plays next
    Ready,
    /// A player is lined up and may shoot
    Aiming,
    /// The active ball is rolling
    Moving,
    /// The match is over
    Finished,
}

/// Result of a completed match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    /// First player with the lowest score; `None` without players
    pub winner: Option<String>,
    /// Name and total score of every player, in player order
    pub scores: Vec<(String, u32)>,
}

pub struct Game {
    config: GameConfig,
    integrator: Integrator,
    controller: Controller,
    levels: Vec<CourseDef>,
    course: Option<Course>,
    players: Vec<Player>,
    current_player: Option<usize>,
    state: ShotState,
    no_movement_counter: u32,
    shot_start: Vec3,
    last_ball_position: Vec3,
    current_level: Option<usize>,
    last_summary: Option<MatchSummary>,
}

impl Game {
    /// A match over the built-in holes with default settings.
    pub fn new<S: Into<String>>(player_names: impl IntoIterator<Item = S>) -> Self {
        Self::with_config(GameConfig::default(), standard_sequence(), player_names)
    }

    pub fn with_config<S: Into<String>>(
        config: GameConfig,
        levels: Vec<CourseDef>,
        player_names: impl IntoIterator<Item = S>,
    ) -> Self {
        let players = player_names.into_iter().map(Player::new).collect();
        let mut game = Self {
            integrator: Integrator::from_config(&config.physics),
            config,
            controller: Controller::new(),
            levels,
            course: None,
            players,
            current_player: None,
            state: ShotState::Finished,
            no_movement_counter: 0,
            shot_start: Vec3::ZERO,
            last_ball_position: Vec3::ZERO,
            current_level: None,
            last_summary: None,
        };
        game.start_game();
        game
    }

    // -------------------------------------------------------------------------
    // Match flow
    // -------------------------------------------------------------------------

    /// Reset every player and start over on the first hole.
    pub fn start_game(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
        self.current_level = None;
        if !self.next_level() {
            log::warn!("No courses to play");
            self.state = ShotState::Finished;
        }
    }

    /// Move on to the next hole. Returns `false` when there is none left.
    pub fn next_level(&mut self) -> bool {
        let next = self.current_level.map_or(0, |level| level + 1);
        let Some(def) = self.levels.get(next) else {
            self.course = None;
            return false;
        };

        self.course = Some(Course::build(def, &mut self.players));
        self.current_level = Some(next);
        self.current_player = None;
        self.no_movement_counter = 0;
        self.state = ShotState::Ready;
        log::info!("Level {}: {} (par {})", next + 1, def.name, def.par);
        true
    }

    /// Report the winner, reset all players and stop.
    pub fn end_match(&mut self) {
        let mut winner: Option<&Player> = None;
        for player in &self.players {
            if winner.map_or(true, |w| player.score() < w.score()) {
                winner = Some(player);
            }
        }

        let summary = MatchSummary {
            winner: winner.map(|w| w.name().to_string()),
            scores: self
                .players
                .iter()
                .map(|p| (p.name().to_string(), p.score()))
                .collect(),
        };
        match &summary.winner {
            Some(name) => log::info!("Winner: {}", name),
            None => log::info!("Match over without players"),
        }
        for (name, score) in &summary.scores {
            log::info!("{}: {}", name, score);
        }

        for player in &mut self.players {
            player.reset();
        }
        self.last_summary = Some(summary);
        self.course = None;
        self.current_player = None;
        self.state = ShotState::Finished;
    }

    /// Pick who plays next and mark them as started.
    ///
    /// Players who haven't started the hole go first, in order. After that
    /// the ball farthest from the hole plays.
    pub fn next_player(&mut self) -> Option<usize> {
        let course = self.course.as_ref()?;

        let chosen = match self.players.iter().position(|p| !p.started_hole()) {
            Some(i) => Some(i),
            None => self
                .players
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_in_game())
                .map(|(i, p)| (i, course.distance_to_hole(p)))
                .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                    Some((_, best_d)) if best_d >= d => best,
                    _ => Some((i, d)),
                })
                .map(|(i, _)| i),
        }?;

        self.players[chosen].start_hole();
        Some(chosen)
    }

    /// Give the active ball velocity `velocity`.
    ///
    /// Ignored while a ball is moving or when nobody is lined up. Returns
    /// whether the shot was taken.
    pub fn shoot(&mut self, velocity: Vec3) -> bool {
        if self.state == ShotState::Moving {
            log::warn!("Ignoring shot while the ball is moving");
            return false;
        }
        let Some(index) = self.current_player else {
            log::warn!("Ignoring shot without an active player");
            return false;
        };
        if self.course.is_none() {
            log::warn!("Ignoring shot without a course");
            return false;
        }

        let player = &mut self.players[index];
        let position = player.ball().world_position();
        self.shot_start = position;
        self.last_ball_position = position;
        self.no_movement_counter = 0;
        player.ball_mut().velocity = velocity;
        player.add_stroke();
        log::debug!("{} shoots, stroke {}", player.name(), player.strokes());
        self.state = ShotState::Moving;
        true
    }

    // -------------------------------------------------------------------------
    // Ticking
    // -------------------------------------------------------------------------

    /// Run one fixed simulation step plus the turn logic.
    pub fn tick(&mut self) -> StepReport {
        if self.state == ShotState::Finished {
            self.start_game();
            return StepReport::default();
        }

        for shot in self.controller.drain() {
            self.shoot(shot);
        }
        // Before the step, so the shot starts where the ball was left
        if self.state == ShotState::Aiming {
            self.fire_default_shot();
        }

        let mut report = StepReport::default();
        if let Some(course) = self.course.as_mut() {
            let mut balls: Vec<&mut Sphere> = self
                .players
                .iter_mut()
                .filter(|p| p.is_in_game())
                .map(|p| p.ball_mut())
                .collect();
            report = self.integrator.step(course.scene_mut(), &mut balls, None);
            course.check_holes(&mut self.players);
        }

        if !self.players.is_empty() && self.players.iter().all(Player::finished_hole) {
            if !self.next_level() {
                self.end_match();
            }
            return report;
        }

        self.update_turn();
        report
    }

    /// Advance the shot state machine by one tick.
    pub fn update_turn(&mut self) {
        match self.state {
            ShotState::Ready => self.pick_player(),
            ShotState::Aiming => self.fire_default_shot(),
            ShotState::Moving => self.watch_ball(),
            ShotState::Finished => {}
        }
    }

    /// In auto mode, shoot the course's default impulse.
    fn fire_default_shot(&mut self) {
        if self.config.turn.input != InputMode::Auto {
            return;
        }
        if let Some(impulse) = self.course.as_ref().map(Course::impulse) {
            self.shoot(impulse);
        }
    }

    fn pick_player(&mut self) {
        let Some(index) = self.next_player() else {
            return;
        };
        let impulse = self.course.as_ref().map_or(Vec3::ZERO, Course::impulse);
        let auto = self.config.turn.input == InputMode::Auto;

        let player = &mut self.players[index];
        let position = player.ball().world_position();
        if auto {
            player.ball_mut().velocity = impulse;
        }
        log::debug!("{} is up", player.name());

        self.current_player = Some(index);
        self.shot_start = position;
        self.last_ball_position = position;
        self.no_movement_counter = 0;
        self.state = ShotState::Aiming;
    }

    fn watch_ball(&mut self) {
        let Some(index) = self.current_player else {
            self.state = ShotState::Ready;
            return;
        };
        let turn = &self.config.turn;
        let player = &mut self.players[index];
        if player.finished_hole() {
            self.current_player = None;
            self.state = ShotState::Ready;
            return;
        }

        let position = player.ball().world_position();
        let displacement = position.distance(&self.last_ball_position);
        self.last_ball_position = position;

        if position.y < turn.out_of_bounds_y {
            player.ball_mut().place(self.shot_start);
            player.add_stroke();
            log::debug!(
                "{} out of bounds, penalty stroke ({} total)",
                player.name(),
                player.strokes()
            );
            self.last_ball_position = self.shot_start;
            self.no_movement_counter = 0;
            self.state = ShotState::Aiming;
            return;
        }

        if displacement < turn.stall_distance {
            self.no_movement_counter += 1;
        } else {
            self.no_movement_counter = 0;
        }
        if self.no_movement_counter > turn.stall_ticks {
            log::debug!("{}'s ball stopped", player.name());
            self.no_movement_counter = 0;
            self.current_player = None;
            self.state = ShotState::Ready;
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn state(&self) -> ShotState {
        self.state
    }

    pub fn current_player(&self) -> Option<usize> {
        self.current_player
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_mut(&mut self, index: usize) -> Option<&mut Player> {
        self.players.get_mut(index)
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    /// Index of the hole being played
    pub fn current_level(&self) -> Option<usize> {
        self.current_level
    }

    pub fn levels(&self) -> &[CourseDef] {
        &self.levels
    }

    pub fn no_movement_counter(&self) -> u32 {
        self.no_movement_counter
    }

    pub fn shot_start(&self) -> Vec3 {
        self.shot_start
    }

    /// Summary of the most recently completed match
    pub fn last_summary(&self) -> Option<&MatchSummary> {
        self.last_summary.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn integrator_mut(&mut self) -> &mut Integrator {
        &mut self.integrator
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    /// Handle for queueing shots, e.g. from an input thread
    pub fn shot_sender(&self) -> ShotSender {
        self.controller.sender()
    }

    /// Scene, hole marker and balls of players still on the hole.
    pub fn draw_list(&self, options: &RenderOptions) -> Vec<DrawItem> {
        let mut items = Vec::new();
        let Some(course) = &self.course else {
            return items;
        };

        render::push_node(course.scene(), 0, &mut items);
        items.push(DrawItem {
            depth: 0,
            translation: course.hole(),
            rotation: Mat3::IDENTITY,
            color: Vec3::ZERO,
            kind: DrawKind::Hole {
                radius: course.hole_radius(),
            },
        });
        for player in self.players.iter().filter(|p| !p.finished_hole()) {
            render::push_ball(player.ball(), options, &mut items);
        }
        items
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TurnConfig;

    fn interactive() -> GameConfig {
        GameConfig {
            turn: TurnConfig {
                input: InputMode::Interactive,
                ..TurnConfig::default()
            },
            ..GameConfig::default()
        }
    }

    fn game(levels: Vec<CourseDef>, players: &[&str]) -> Game {
        Game::with_config(interactive(), levels, players.iter().copied())
    }

    /// Put the active player's ball in the cup and tick once.
    fn hole_out(game: &mut Game) {
        let index = game.current_player().expect("someone is playing");
        let target = game.course().expect("course").hole() + Vec3::new(0.0, 0.45, 0.0);
        game.player_mut(index).unwrap().ball_mut().place(target);
        game.tick();
    }

    #[test]
    fn test_new_game_starts_on_first_hole() {
        let g = Game::new(["Player 1", "Player 2"]);
        assert_eq!(g.state(), ShotState::Ready);
        assert_eq!(g.current_level(), Some(0));
        assert_eq!(g.course().map(Course::name), Some("walled green"));
        for p in g.players() {
            assert_eq!(p.ball().position, g.course().unwrap().start());
        }
    }

    #[test]
    fn test_unstarted_players_go_in_order() {
        let mut g = game(standard_sequence(), &["a", "b"]);
        assert_eq!(g.next_player(), Some(0));
        assert_eq!(g.next_player(), Some(1));
    }

    #[test]
    fn test_farthest_ball_plays_next() {
        let mut g = game(standard_sequence(), &["a", "b", "c"]);
        for _ in 0..3 {
            g.next_player();
        }
        let hole = g.course().unwrap().hole();
        g.player_mut(0).unwrap().ball_mut().place(hole + Vec3::new(2.0, 0.45, 0.0));
        g.player_mut(1).unwrap().ball_mut().place(hole + Vec3::new(0.0, 0.45, -5.0));
        g.player_mut(2).unwrap().ball_mut().place(hole + Vec3::new(-3.0, 0.45, 0.0));

        assert_eq!(g.next_player(), Some(1));
    }

    #[test]
    fn test_no_next_player_without_anyone_in_game() {
        let mut g = game(standard_sequence(), &["a"]);
        assert_eq!(g.next_player(), Some(0));
        g.player_mut(0).unwrap().finish_hole();
        assert_eq!(g.next_player(), None);

        let mut empty = game(standard_sequence(), &[]);
        assert_eq!(empty.next_player(), None);
    }

    #[test]
    fn test_shoot_requires_active_player() {
        let mut g = game(standard_sequence(), &["a"]);
        assert!(!g.shoot(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(g.players()[0].strokes(), 0);

        g.tick();
        assert_eq!(g.state(), ShotState::Aiming);
        assert!(g.shoot(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(g.state(), ShotState::Moving);
        assert_eq!(g.players()[0].strokes(), 1);

        // No second shot while moving
        assert!(!g.shoot(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(g.players()[0].strokes(), 1);
        assert_eq!(g.players()[0].ball().velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_hole_completion_same_tick() {
        let mut g = game(standard_sequence(), &["a", "b"]);
        g.tick();
        assert_eq!(g.current_player(), Some(0));
        assert!(g.shoot(Vec3::ZERO));

        hole_out(&mut g);

        let p = &g.players()[0];
        assert!(p.finished_hole());
        assert_eq!(p.score(), 1);
        assert_eq!(g.state(), ShotState::Ready);
        assert_eq!(g.current_level(), Some(0), "player b still has to play");
    }

    #[test]
    fn test_out_of_bounds_penalty() {
        let mut g = game(standard_sequence(), &["a"]);
        g.tick();
        let start = g.shot_start();
        assert!(g.shoot(Vec3::new(0.0, 0.0, 1.0)));

        g.player_mut(0)
            .unwrap()
            .ball_mut()
            .place(Vec3::new(0.0, -20.0, 0.0));
        g.tick();

        let p = &g.players()[0];
        assert_eq!(p.ball().position, start);
        assert_eq!(p.ball().velocity, Vec3::ZERO);
        assert_eq!(p.strokes(), 2);
        assert_eq!(g.state(), ShotState::Aiming);
        assert_eq!(g.current_player(), Some(0));
    }

    #[test]
    fn test_stall_detection() {
        let mut g = game(standard_sequence(), &["a"]);
        g.tick();
        assert!(g.shoot(Vec3::ZERO));

        for _ in 0..120 {
            g.update_turn();
        }
        assert_eq!(g.state(), ShotState::Moving);
        assert_eq!(g.no_movement_counter(), 120);

        g.update_turn();
        assert_eq!(g.state(), ShotState::Ready);
        assert_eq!(g.current_player(), None);
    }

    #[test]
    fn test_moving_ball_resets_stall_counter() {
        let mut g = game(standard_sequence(), &["a"]);
        g.tick();
        assert!(g.shoot(Vec3::ZERO));
        for _ in 0..50 {
            g.update_turn();
        }
        assert_eq!(g.no_movement_counter(), 50);

        let pos = g.players()[0].ball().position;
        g.player_mut(0)
            .unwrap()
            .ball_mut()
            .place(pos + Vec3::new(0.5, 0.0, 0.0));
        g.update_turn();
        assert_eq!(g.no_movement_counter(), 0);
    }

    #[test]
    fn test_level_progression_keeps_score() {
        let mut g = game(standard_sequence(), &["a"]);
        g.tick();
        assert!(g.shoot(Vec3::ZERO));
        hole_out(&mut g);

        assert_eq!(g.current_level(), Some(1));
        assert_eq!(g.course().map(Course::name), Some("rolling hills"));
        let p = &g.players()[0];
        assert_eq!(p.score(), 1);
        assert_eq!(p.strokes(), 0);
        assert!(!p.started_hole());
        assert_eq!(g.state(), ShotState::Ready);
    }

    #[test]
    fn test_match_end_and_restart() {
        let levels = vec![course::walled_green()];
        let mut g = game(levels, &["a", "b", "c"]);

        // a: shoots, goes out of bounds, shoots again, holes out (3 strokes)
        g.tick();
        assert!(g.shoot(Vec3::ZERO));
        g.player_mut(0)
            .unwrap()
            .ball_mut()
            .place(Vec3::new(0.0, -20.0, 0.0));
        g.tick();
        assert!(g.shoot(Vec3::ZERO));
        hole_out(&mut g);

        // b and c: hole in one each
        for expected in [1, 2] {
            g.tick();
            assert_eq!(g.current_player(), Some(expected));
            assert!(g.shoot(Vec3::ZERO));
            hole_out(&mut g);
        }

        assert_eq!(g.state(), ShotState::Finished);
        assert!(g.course().is_none());
        let summary = g.last_summary().expect("match summary");
        assert_eq!(summary.winner.as_deref(), Some("b"));
        assert_eq!(
            summary.scores,
            vec![
                ("a".to_string(), 3),
                ("b".to_string(), 1),
                ("c".to_string(), 1)
            ]
        );
        assert!(g.players().iter().all(|p| p.score() == 0));

        g.tick();
        assert_eq!(g.state(), ShotState::Ready);
        assert_eq!(g.current_level(), Some(0));
    }

    #[test]
    fn test_queued_shots_apply_at_tick() {
        let mut g = game(standard_sequence(), &["a"]);
        let sender = g.shot_sender();
        g.tick();
        assert_eq!(g.state(), ShotState::Aiming);

        sender.send(Vec3::new(0.0, 0.0, 1.0)).unwrap();
        sender.send(Vec3::new(0.0, 0.0, 9.0)).unwrap();
        assert_eq!(g.state(), ShotState::Aiming, "nothing happens between ticks");

        g.tick();
        assert_eq!(g.state(), ShotState::Moving);
        assert_eq!(g.players()[0].strokes(), 1, "second queued shot is ignored");
        assert!(g.players()[0].ball().velocity.z < 2.0);
    }

    #[test]
    fn test_auto_mode_plays_itself() {
        let mut g = Game::new(["a"]);
        g.tick();
        assert_eq!(g.state(), ShotState::Aiming);
        let impulse = g.course().unwrap().impulse();
        assert_eq!(g.players()[0].ball().velocity, impulse);

        g.tick();
        assert_eq!(g.state(), ShotState::Moving);
        assert_eq!(g.players()[0].strokes(), 1);
    }

    #[test]
    fn test_auto_shot_starts_from_tee() {
        let mut g = Game::new(["a"]);
        let tee = g.course().unwrap().start();
        g.tick();
        g.tick();
        assert_eq!(g.state(), ShotState::Moving);
        assert_eq!(g.shot_start(), tee);
    }

    #[test]
    fn test_auto_retry_starts_from_penalty_spot() {
        let mut g = Game::new(["a"]);
        g.tick();
        g.tick();
        let start = g.shot_start();

        g.player_mut(0)
            .unwrap()
            .ball_mut()
            .place(Vec3::new(0.0, -20.0, 0.0));
        g.tick();
        assert_eq!(g.state(), ShotState::Aiming);

        g.tick();
        assert_eq!(g.state(), ShotState::Moving);
        assert_eq!(g.shot_start(), start);
        assert_eq!(g.players()[0].strokes(), 3);
    }

    #[test]
    fn test_draw_list_contains_scene_hole_and_balls() {
        let g = game(standard_sequence(), &["a", "b"]);
        let items = g.draw_list(&RenderOptions::default());

        let balls = items
            .iter()
            .filter(|i| matches!(i.kind, DrawKind::Sphere { .. }))
            .count();
        assert_eq!(balls, 2);
        assert!(items.iter().any(|i| matches!(i.kind, DrawKind::Hole { .. })));
        assert_eq!(items[0].depth, 0);
    }
}
