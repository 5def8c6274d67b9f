#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure pacing system that converts wall-clock time into tick commands.
//!
//! The scheduler feeds elapsed wall-clock durations into [`Cadence::handle`];
//! the system accumulates them against a fixed firing interval and emits one
//! [`Command::Tick`] batch per elapsed interval. The active [`TimeSpeed`]
//! multiplies the batch size, so faster speeds advance more simulated time
//! per firing while the wall-clock rhythm stays constant.

use std::time::Duration;

use bee_meadow_core::{Command, TimeSpeed, TICK_INTERVAL};

/// Configuration parameters required to construct the cadence system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    tick_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided firing interval.
    #[must_use]
    pub const fn new(tick_interval: Duration) -> Self {
        Self { tick_interval }
    }

    /// Configuration using the engine's base firing interval.
    #[must_use]
    pub const fn base_rate() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

/// Pure system that paces simulation ticks against wall-clock time.
#[derive(Debug)]
pub struct Cadence {
    tick_interval: Duration,
    accumulator: Duration,
}

impl Cadence {
    /// Creates a new cadence system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tick_interval: config.tick_interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes elapsed wall-clock time and emits tick commands.
    ///
    /// While paused the accumulator drains instead of banking time, so
    /// resuming never replays the pause as a burst of catch-up ticks.
    pub fn handle(
        &mut self,
        elapsed: Duration,
        paused: bool,
        speed: TimeSpeed,
        out: &mut Vec<Command>,
    ) {
        if paused {
            self.accumulator = Duration::ZERO;
            return;
        }

        if self.tick_interval.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(elapsed);
        let firings = self.resolve_firings();
        let ticks_per_firing = speed.factor();

        for _ in 0..firings {
            for _ in 0..ticks_per_firing {
                out.push(Command::Tick);
            }
        }
    }

    fn resolve_firings(&mut self) -> usize {
        let mut firings = 0;
        while self.accumulator >= self.tick_interval {
            self.accumulator -= self.tick_interval;
            firings += 1;
        }
        firings
    }
}
