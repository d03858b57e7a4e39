//! Tick scheduling
//!
//! [`TickScheduler`] is the only thing in the app that calls
//! [`GridSimulation::step`]. It checks the session state first, so a paused
//! or finished session is never stepped.
//!
//! Two strategies are supported:
//!
//! - **Fixed-rate**: an outside repeating timer calls
//!   [`TickScheduler::on_timer`] once per interval; each call is one step.
//! - **Frame-gated**: a per-frame callback calls [`TickScheduler::on_frame`]
//!   with a monotonic timestamp. A step happens only once more than one
//!   interval has passed since the last step, and the reference point then
//!   moves to that frame's timestamp.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::GridConfig;
use super::engine::{GridSimulation, StepResult};

/// How ticks are derived from wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickStrategy {
    FixedRate,
    FrameGated,
}

impl TickStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedRate => "fixed-rate",
            Self::FrameGated => "frame-gated",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TickScheduler {
    strategy: TickStrategy,
    interval: Duration,
    /// Timestamp of the frame that produced the last step (frame-gated only)
    last_step_at: Duration,
    steps_fired: u64,
}

impl TickScheduler {
    pub fn new(strategy: TickStrategy, interval: Duration) -> Self {
        Self {
            strategy,
            interval,
            last_step_at: Duration::ZERO,
            steps_fired: 0,
        }
    }

    pub fn for_config(strategy: TickStrategy, config: &GridConfig) -> Self {
        Self::new(strategy, config.tick_interval())
    }

    pub fn strategy(&self) -> TickStrategy {
        self.strategy
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of steps this scheduler has driven
    pub fn steps_fired(&self) -> u64 {
        self.steps_fired
    }

    /// Adopt the interval of a newly booted session
    pub fn reconfigure(&mut self, config: &GridConfig) {
        self.interval = config.tick_interval();
    }

    /// Fixed-rate entry point, one call per timer firing
    ///
    /// Ignored by a frame-gated scheduler.
    pub fn on_timer<R: Rng>(&mut self, sim: &mut GridSimulation<R>) -> Option<StepResult> {
        if self.strategy != TickStrategy::FixedRate {
            return None;
        }
        self.fire(sim)
    }

    /// Frame-gated entry point, one call per rendered frame
    ///
    /// `timestamp` is time since an arbitrary fixed origin and must not go
    /// backwards. Ignored by a fixed-rate scheduler.
    pub fn on_frame<R: Rng>(
        &mut self,
        sim: &mut GridSimulation<R>,
        timestamp: Duration,
    ) -> Option<StepResult> {
        if self.strategy != TickStrategy::FrameGated || !sim.state().accepts_ticks() {
            return None;
        }
        if timestamp.saturating_sub(self.last_step_at) <= self.interval {
            return None;
        }
        self.last_step_at = timestamp;
        self.fire(sim)
    }

    fn fire<R: Rng>(&mut self, sim: &mut GridSimulation<R>) -> Option<StepResult> {
        if !sim.state().accepts_ticks() {
            return None;
        }
        self.steps_fired += 1;
        Some(sim.step())
    }
}
