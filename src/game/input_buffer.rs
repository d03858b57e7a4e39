//! Bounded queue of pending turns
//!
//! Turns pressed faster than the tick rate are held here and applied one per
//! tick, so a quick double tap (say Up then Left) lands as two separate turns
//! instead of the second one overwriting the first.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::config::INPUT_QUEUE_DEPTH;

/// FIFO of accepted turns, at most [`INPUT_QUEUE_DEPTH`] long
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBuffer {
    queue: VecDeque<Direction>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::with_capacity(INPUT_QUEUE_DEPTH + 1),
        }
    }

    /// Offer a turn request
    ///
    /// The request is compared against the last queued turn, or against
    /// `live` when nothing is queued. Repeats and reversals are dropped
    /// silently. When the queue overflows the oldest turn is evicted.
    ///
    /// Returns true if the request was queued.
    pub fn push(&mut self, requested: Direction, live: Direction) -> bool {
        let reference = self.queue.back().copied().unwrap_or(live);
        if !reference.is_turn_to(requested) {
            return false;
        }

        self.queue.push_back(requested);
        if self.queue.len() > INPUT_QUEUE_DEPTH {
            self.queue.pop_front();
            // The evicted turn was what made the next one legal; anything
            // left at the front that repeats or reverses `live` goes too.
            while self
                .queue
                .front()
                .is_some_and(|front| !live.is_turn_to(*front))
            {
                self.queue.pop_front();
            }
        }
        true
    }

    /// Take the oldest pending turn
    pub fn pop(&mut self) -> Option<Direction> {
        self.queue.pop_front()
    }

    pub fn peek(&self) -> Option<Direction> {
        self.queue.front().copied()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Pending turns, oldest first
    pub fn pending(&self) -> impl Iterator<Item = Direction> + '_ {
        self.queue.iter().copied()
    }
}
