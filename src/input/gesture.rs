//! Mouse drags as swipes
//!
//! A left-button drag turns the snake once its dominant axis covers at least
//! [`SWIPE_THRESHOLD_CELLS`] grid cells. Each press produces at most one turn.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::game::Direction;

/// Minimum drag length, in grid cells, that counts as a swipe
pub const SWIPE_THRESHOLD_CELLS: i32 = 2;

/// Terminal columns per grid cell (the renderer draws two glyphs per cell)
const COLUMNS_PER_CELL: i32 = 2;

/// Direction of a drag of (`dx`, `dy`) cells, if it is long enough
///
/// The longer axis wins; a drag exactly on the diagonal goes horizontal.
pub fn swipe_direction(dx: i32, dy: i32, threshold: i32) -> Option<Direction> {
    if dx.abs().max(dy.abs()) < threshold {
        return None;
    }
    if dx.abs() >= dy.abs() {
        Some(if dx > 0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if dy > 0 { Direction::Down } else { Direction::Up })
    }
}

#[derive(Debug, Default)]
pub struct SwipeTracker {
    origin: Option<(u16, u16)>,
    fired: bool,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a mouse event; returns a direction the first time a drag qualifies
    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<Direction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some((event.column, event.row));
                self.fired = false;
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (ox, oy) = self.origin?;
                if self.fired {
                    return None;
                }
                let dx = (i32::from(event.column) - i32::from(ox)) / COLUMNS_PER_CELL;
                let dy = i32::from(event.row) - i32::from(oy);
                let direction = swipe_direction(dx, dy, SWIPE_THRESHOLD_CELLS)?;
                self.fired = true;
                Some(direction)
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.origin = None;
                self.fired = false;
                None
            }
            _ => None,
        }
    }
}
