//! Neon Snake - a grid Snake game for the terminal
//!
//! This library provides:
//! - Core simulation, input buffering and tick scheduling (game module)
//! - The Pro, Neon and Neon RGB variants (variant module)
//! - Best/last score persistence (storage module)
//! - TUI rendering, input mapping and the interactive loop (render, input, modes)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod storage;
pub mod variant;
