//! Read-only state passed to every steering behaviour.

use ped_core::{AgentId, DVec2, Tick};
use ped_env::Environment;

/// What a behaviour may look at while proposing an action.
///
/// Built fresh for each agent each step.  The environment is borrowed
/// immutably, so behaviours can't move anyone; only the orienting step
/// commits movement.
pub struct SteeringContext<'a> {
    pub env: &'a Environment,

    /// The agent being steered.
    pub agent: AgentId,

    /// Current simulation tick.  Passed through for time-dependent
    /// behaviours; nothing in this crate interprets it.
    pub tick: Tick,

    /// Simulated seconds one step represents.
    pub step_secs: f64,
}

impl<'a> SteeringContext<'a> {
    #[inline]
    pub fn new(env: &'a Environment, agent: AgentId, tick: Tick, step_secs: f64) -> Self {
        Self { env, agent, tick, step_secs }
    }

    /// The agent's position, `None` if it has left the environment.
    #[inline]
    pub fn position(&self) -> Option<DVec2> {
        self.env.get_position(self.agent)
    }

    /// Furthest the agent may walk this step: its speed times the step length.
    pub fn max_step(&self) -> f64 {
        self.env.get_speed(self.agent).unwrap_or(0.0) * self.step_secs
    }

    /// Positions of other agents within `range` of this one, by ascending id.
    pub fn others_within(&self, range: f64) -> Vec<DVec2> {
        let Some(center) = self.position() else {
            return Vec::new();
        };
        self.env
            .nodes_within_range(center, range)
            .into_iter()
            .filter(|&id| id != self.agent)
            .filter_map(|id| self.env.get_position(id))
            .collect()
    }
}
