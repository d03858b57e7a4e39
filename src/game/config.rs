use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Points awarded for each food eaten
pub const FOOD_REWARD: u32 = 10;

/// Maximum number of pending turns held between ticks
pub const INPUT_QUEUE_DEPTH: usize = 2;

/// Board size presets offered on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapPreset {
    Small,
    Medium,
    Large,
}

impl MapPreset {
    /// (cols, rows) for this preset
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            Self::Small => (15, 17),
            Self::Medium => (21, 23),
            Self::Large => (31, 33),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

/// Tick rate presets offered on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedPreset {
    Slow,
    Normal,
    Fast,
    Insane,
}

impl SpeedPreset {
    /// Milliseconds between ticks
    pub fn tick_interval_ms(&self) -> u64 {
        match self {
            Self::Slow => 150,
            Self::Normal => 100,
            Self::Fast => 70,
            Self::Insane => 45,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::Insane => "Insane",
        }
    }
}

/// Reasons a [`GridConfig`] can be rejected at boot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid needs at least 2 columns for the starting snake, got {0}")]
    TooFewColumns(usize),
    #[error("grid needs at least 1 row, got {0}")]
    TooFewRows(usize),
    #[error("grid of {cols}x{rows} cells is too large")]
    TooLarge { cols: usize, rows: usize },
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
}

/// Configuration for one game session
///
/// Chosen once at boot and never changed while the session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of columns (grid width)
    pub cols: usize,
    /// Number of rows (grid height)
    pub rows: usize,
    /// Milliseconds between simulation ticks
    pub tick_interval_ms: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::from_presets(MapPreset::Small, SpeedPreset::Normal)
    }
}

impl GridConfig {
    /// Create a new configuration with custom grid size and tick interval
    pub fn new(cols: usize, rows: usize, tick_interval_ms: u64) -> Self {
        Self {
            cols,
            rows,
            tick_interval_ms,
        }
    }

    /// Build a configuration from the menu presets
    pub fn from_presets(map: MapPreset, speed: SpeedPreset) -> Self {
        let (cols, rows) = map.dimensions();
        Self::new(cols, rows, speed.tick_interval_ms())
    }

    /// Total number of cells on the board
    pub fn total_cells(&self) -> usize {
        self.cols * self.rows
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check the configuration can host a session
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols < 2 {
            return Err(ConfigError::TooFewColumns(self.cols));
        }
        if self.rows < 1 {
            return Err(ConfigError::TooFewRows(self.rows));
        }
        let fits = i32::try_from(self.cols).is_ok()
            && i32::try_from(self.rows).is_ok()
            && self.cols.checked_mul(self.rows).is_some();
        if !fits {
            return Err(ConfigError::TooLarge {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}
