//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal front end drives it, but it can be stepped programmatically just as well.

pub mod action;
pub mod config;
pub mod engine;
pub mod input_buffer;
pub mod scheduler;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{
    ConfigError, FOOD_REWARD, GridConfig, INPUT_QUEUE_DEPTH, MapPreset, SpeedPreset,
};
pub use engine::{GridSimulation, LayoutError, SessionLayout, StepResult};
pub use input_buffer::InputBuffer;
pub use scheduler::{TickScheduler, TickStrategy};
pub use state::{CollisionType, Outcome, Position, SessionState, Snake, Snapshot};
