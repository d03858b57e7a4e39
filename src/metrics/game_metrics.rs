use std::time::{Duration, Instant};

use crate::storage::ScoreRecord;

/// HUD bookkeeping: session clock and best/last scores
///
/// The clock only runs while a session is active and unpaused. It is
/// independent of the tick rate.
pub struct GameMetrics {
    /// Set while the clock is running
    running_since: Option<Instant>,
    /// Time banked from earlier running stretches
    banked: Duration,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub last_score: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            running_since: None,
            banked: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            best_score: 0,
            last_score: 0,
            games_played: 0,
        }
    }

    /// Seed best/last from persisted scores
    pub fn with_record(record: ScoreRecord) -> Self {
        Self {
            best_score: record.best,
            last_score: record.last,
            ..Self::new()
        }
    }

    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    pub fn update_at(&mut self, now: Instant) {
        self.elapsed_time = self.banked
            + self
                .running_since
                .map(|since| now.saturating_duration_since(since))
                .unwrap_or(Duration::ZERO);
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn on_game_start(&mut self) {
        self.on_game_start_at(Instant::now());
    }

    pub fn on_game_start_at(&mut self, now: Instant) {
        self.banked = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
        self.running_since = Some(now);
    }

    /// Stop the clock (pause or session end), keeping elapsed time
    pub fn stop_clock_at(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.banked += now.saturating_duration_since(since);
        }
        self.elapsed_time = self.banked;
    }

    pub fn resume_clock_at(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.on_game_over_at(final_score, Instant::now());
    }

    pub fn on_game_over_at(&mut self, final_score: u32, now: Instant) {
        self.stop_clock_at(now);
        self.games_played += 1;
        self.last_score = final_score;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    /// Adopt the record returned by the score store
    pub fn sync_record(&mut self, record: ScoreRecord) {
        self.best_score = record.best;
        self.last_score = record.last;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
