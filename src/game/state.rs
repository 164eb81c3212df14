use std::time::Duration;

use super::direction::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Check if the position lies within a `width` x `height` grid
    pub fn in_bounds(&self, width: usize, height: usize) -> bool {
        self.x >= 0
            && (self.x as i64) < width as i64
            && self.y >= 0
            && (self.y as i64) < height as i64
    }
}

/// Lifecycle phase of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Session bookkeeping around the simulation: phase, score, heading and the
/// fixed-interval move clock.
///
/// Direction changes are buffered and only take effect on the next qualifying
/// tick, so several key presses between two moves cannot fold the snake back
/// onto itself.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub phase: Phase,
    pub score: u32,
    direction: Direction,
    next_direction: Option<Direction>,
    since_last_move: Duration,
    move_interval: Duration,
}

impl GameState {
    pub fn new(move_interval: Duration) -> Self {
        Self {
            phase: Phase::Menu,
            score: 0,
            direction: Direction::Right,
            next_direction: None,
            since_last_move: Duration::ZERO,
            move_interval,
        }
    }

    /// Current heading of the snake
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn move_interval(&self) -> Duration {
        self.move_interval
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Advance the move clock by `dt`.
    ///
    /// Returns true when the accumulated time reached the move interval; the
    /// buffered direction is applied at that point and the clock restarts.
    pub fn update(&mut self, dt: Duration) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }

        self.since_last_move += dt;
        if self.since_last_move < self.move_interval {
            return false;
        }

        self.since_last_move = Duration::ZERO;
        self.apply_turn();
        true
    }

    /// Commit the buffered heading, if any, and return the heading to move in
    pub fn apply_turn(&mut self) -> Direction {
        if let Some(next) = self.next_direction.take() {
            self.direction = next;
        }
        self.direction
    }

    /// Buffer a new heading for the next tick.
    ///
    /// Ignored outside `Playing` and when it would exactly reverse the current
    /// heading. Returns whether the request was accepted.
    pub fn change_direction(&mut self, direction: Direction) -> bool {
        if self.phase != Phase::Playing || self.direction.is_opposite(direction) {
            return false;
        }
        self.next_direction = Some(direction);
        true
    }

    pub fn start(&mut self) {
        self.phase = Phase::Playing;
        self.rewind();
        tracing::info!("game started");
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Paused;
            tracing::info!("game paused");
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Playing;
            tracing::info!("game resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Playing => self.pause(),
            Phase::Paused => self.resume(),
            _ => {}
        }
    }

    pub fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        tracing::info!(score = self.score, "game over");
    }

    /// Back to the menu with a clean slate
    pub fn reset(&mut self) {
        self.phase = Phase::Menu;
        self.rewind();
        tracing::info!("game reset");
    }

    fn rewind(&mut self) {
        self.score = 0;
        self.direction = Direction::Right;
        self.next_direction = None;
        self.since_last_move = Duration::ZERO;
    }
}
