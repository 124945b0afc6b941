//! Simulation observer trait for progress reporting and data collection.

use ped_core::{AgentId, DVec2, Tick};
use ped_env::Environment;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// step loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```
/// use ped_core::Tick;
/// use ped_sim::SimObserver;
///
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, moved: usize) {
///         if tick.0 % self.interval == 0 {
///             println!("{tick}: {moved} agents moved");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any agent plans.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once every agent has stepped.  `moved` counts the agents whose
    /// move was accepted this tick.
    fn on_tick_end(&mut self, _tick: Tick, _moved: usize) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with read-only access to every agent's position, heading,
    /// and shape.
    fn on_snapshot(&mut self, _tick: Tick, _env: &Environment) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

// ── TrajectoryRecorder ────────────────────────────────────────────────────────

/// One agent's state at one snapshot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrajectorySample {
    pub tick:     Tick,
    pub agent:    AgentId,
    pub position: DVec2,
    pub heading:  DVec2,
}

/// Records every agent's position and heading at every snapshot.
///
/// Samples are in snapshot order, then ascending agent id, so two
/// recorders can be compared directly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrajectoryRecorder {
    pub samples: Vec<TrajectorySample>,
}

impl TrajectoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions of `agent`, one per snapshot it was present in.
    pub fn path_of(&self, agent: AgentId) -> Vec<DVec2> {
        self.samples
            .iter()
            .filter(|s| s.agent == agent)
            .map(|s| s.position)
            .collect()
    }
}

impl SimObserver for TrajectoryRecorder {
    fn on_snapshot(&mut self, tick: Tick, env: &Environment) {
        for agent in env.node_ids() {
            if let (Some(position), Some(heading)) = (env.get_position(agent), env.get_heading(agent)) {
                self.samples.push(TrajectorySample { tick, agent, position, heading });
            }
        }
    }
}
