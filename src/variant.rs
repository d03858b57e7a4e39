//! The three flavours of the game
//!
//! Variants only differ in presentation and scheduling. The simulation core
//! never sees them.

use serde::{Deserialize, Serialize};

use crate::game::TickStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Frame-gated ticks, rainbow body, fruit glyphs
    Pro,
    /// Fixed-rate ticks, solid cyan body
    Neon,
    /// Fixed-rate ticks, body hue cycling every tick
    NeonRgb,
}

impl Variant {
    pub fn tick_strategy(&self) -> TickStrategy {
        match self {
            Self::Pro => TickStrategy::FrameGated,
            Self::Neon | Self::NeonRgb => TickStrategy::FixedRate,
        }
    }

    /// Storage namespace for best/last scores; no two variants share one
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Pro => "snake_pro",
            Self::Neon => "snake_neon",
            Self::NeonRgb => "snake_neon_rgb",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Pro => "SNAKE PRO",
            Self::Neon => "NEON SNAKE",
            Self::NeonRgb => "NEON RGB SNAKE",
        }
    }
}
