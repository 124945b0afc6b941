//! Simulation time model.
//!
//! Time advances in integer `Tick`s; one tick is one movement step for every
//! agent.  `SimClock` maps ticks to simulated seconds:
//!
//!   elapsed_secs = tick * tick_duration_secs
//!
//! Steering only ever sees the tick duration (to turn a walking speed into a
//! per-step displacement bound), never wall-clock time.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and converts it to simulated seconds.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Simulated seconds per tick.
    pub tick_duration_secs: f64,
    /// Advanced by [`SimClock::advance`] once per step.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_duration_secs: f64) -> Self {
        Self { tick_duration_secs, current_tick: Tick::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    /// Simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.tick_duration_secs
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1} s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically deserialised from a scenario file by the application crate
/// (enable the `serde` feature) and handed to the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated seconds per tick.  Must be finite and positive.
    pub tick_duration_secs: f64,

    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed and event order always reproduce the
    /// same trajectories bit for bit.
    pub seed: u64,

    /// Emit an observer snapshot every N ticks; 0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_duration_secs:    1.0,
            total_ticks:           100,
            seed:                  0,
            output_interval_ticks: 1,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_secs)
    }

    /// # Errors
    ///
    /// [`CoreError::Config`] if the tick duration is not finite and positive.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.tick_duration_secs.is_finite() && self.tick_duration_secs > 0.0) {
            return Err(CoreError::Config(format!(
                "tick_duration_secs must be positive, got {}",
                self.tick_duration_secs
            )));
        }
        Ok(())
    }
}
