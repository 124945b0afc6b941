//! Fluent builder for constructing a [`Sim`].

use ped_core::{AgentId, AgentRng, SimConfig};
use ped_env::Environment;
use ped_nav::NavigationGraph;
use ped_steering::OrientingSteering;

use crate::{Pilot, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<N>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total ticks, seed, tick duration, …
/// - [`Environment`] already populated with agents (see
///   [`ped_env::deploy`]).
/// - `N: NavigationGraph`: where agents are heading.
///
/// Agents without a steering stack registered through
/// [`agent`](Self::agent) stay in the environment as static obstacles.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, env, graph)
///     .agent(a, OrientingSteering::new(Weighted::distance_weighted()))
///     .agent(b, OrientingSteering::new(Nearest).with_behavior(Separation::new(1.0)?))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<N: NavigationGraph> {
    config: SimConfig,
    env:    Environment,
    nav:    N,
    agents: Vec<(AgentId, OrientingSteering)>,
}

impl<N: NavigationGraph> SimBuilder<N> {
    pub fn new(config: SimConfig, env: Environment, nav: N) -> Self {
        Self { config, env, nav, agents: Vec::new() }
    }

    /// Steer `agent` with `steering`.
    pub fn agent(mut self, agent: AgentId, steering: OrientingSteering) -> Self {
        self.agents.push((agent, steering));
        self
    }

    /// Steer every agent currently in the environment with a stack built by
    /// `make`.
    pub fn all_agents(mut self, mut make: impl FnMut(AgentId) -> OrientingSteering) -> Self {
        let ids: Vec<AgentId> = self.env.node_ids().collect();
        for id in ids {
            self.agents.push((id, make(id)));
        }
        self
    }

    /// Validate inputs, seed per-agent RNGs, and return a ready-to-run
    /// [`Sim`].
    ///
    /// # Errors
    ///
    /// - [`SimError::Core`] for an invalid [`SimConfig`].
    /// - [`SimError::AgentNotFound`] for an agent not in the environment.
    /// - [`SimError::Config`] for an agent registered twice.
    pub fn build(self) -> SimResult<Sim<N>> {
        self.config.validate()?;

        let mut pilots: Vec<Pilot> = Vec::with_capacity(self.agents.len());
        for (agent, steering) in self.agents {
            if !self.env.contains(agent) {
                return Err(SimError::AgentNotFound(agent));
            }
            pilots.push(Pilot {
                agent,
                steering,
                rng: AgentRng::new(self.config.seed, agent),
            });
        }

        // Ascending id is the canonical step order.
        pilots.sort_by_key(|p| p.agent);
        if let Some(w) = pilots.windows(2).find(|w| w[0].agent == w[1].agent) {
            return Err(SimError::Config(format!("{} registered twice", w[0].agent)));
        }

        Ok(Sim {
            clock:  self.config.make_clock(),
            config: self.config,
            env:    self.env,
            nav:    self.nav,
            pilots,
        })
    }
}
