use ratatui::style::Color;

use crate::game::FOOD_REWARD;
use crate::variant::Variant;

/// Hue of the Neon body, in degrees
const NEON_HUE: u16 = 180;

/// Hue shift per segment for the Pro rainbow body
const RAINBOW_STEP: u16 = 20;

/// Hue shift per tick for the Neon RGB body
const CYCLE_STEP: u16 = 5;

/// Per-variant look of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    variant: Variant,
}

impl Theme {
    pub fn for_variant(variant: Variant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Color of segment `index` (head is 0) on tick `tick`
    pub fn segment_color(&self, index: usize, tick: u64) -> Color {
        match self.variant {
            Variant::Pro => hue_to_rgb(((index as u64 * RAINBOW_STEP as u64) % 360) as u16),
            Variant::Neon => hue_to_rgb(NEON_HUE),
            Variant::NeonRgb => hue_to_rgb(((tick * CYCLE_STEP as u64) % 360) as u16),
        }
    }

    pub fn head_color(&self, tick: u64) -> Color {
        match self.variant {
            Variant::Pro => Color::White,
            _ => self.segment_color(0, tick),
        }
    }

    /// Food glyph; rotates through the set as the score climbs
    pub fn food_glyph(&self, score: u32) -> &'static str {
        let glyphs: &[&'static str] = match self.variant {
            Variant::Pro => &["● ", "◆ ", "♥ "],
            Variant::Neon | Variant::NeonRgb => &["◉ ", "◈ ", "✦ "],
        };
        glyphs[(score / FOOD_REWARD) as usize % glyphs.len()]
    }

    pub fn food_color(&self) -> Color {
        match self.variant {
            Variant::Pro => Color::Red,
            Variant::Neon | Variant::NeonRgb => Color::Magenta,
        }
    }

    pub fn border_color(&self) -> Color {
        match self.variant {
            Variant::Pro => Color::White,
            Variant::Neon | Variant::NeonRgb => Color::Cyan,
        }
    }
}

/// Fully saturated, mid-lightness color for a hue in degrees
pub fn hue_to_rgb(hue: u16) -> Color {
    let h = f32::from(hue % 360) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u8 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let scale = |c: f32| (c * 255.0).round() as u8;
    Color::Rgb(scale(r), scale(g), scale(b))
}
