use std::time::{Duration, Instant};

use crate::game::{Consumed, FoodTag, TickOutcome};

/// Session statistics shown next to the board
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    /// Food of either kind eaten this session
    pub foods_eaten: u32,
    pub reactions_triggered: u32,
    /// Most recent elemental food from the catalog
    pub last_tagged: Option<FoodTag>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            foods_eaten: 0,
            reactions_triggered: 0,
            last_tagged: None,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.last_tagged = None;
    }

    /// Fold one tick into the counters; returns true if it ended the game
    pub fn on_tick(&mut self, outcome: &TickOutcome, score: u32) -> bool {
        if let Some(consumed) = &outcome.consumed {
            self.foods_eaten += 1;
            if let Consumed::Food(food) = consumed {
                if food.tag.is_special() {
                    self.last_tagged = Some(food.tag);
                }
            }
        }
        if outcome.reaction.is_some() {
            self.reactions_triggered += 1;
        }
        if outcome.terminated() {
            self.on_game_over(score);
            return true;
        }
        false
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
