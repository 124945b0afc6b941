//! The `Sim` struct and its step loop.

use tracing::{debug, info};

use ped_core::{AgentId, AgentRng, DVec2, SimClock, SimConfig, Tick};
use ped_env::{Environment, NodeSpec};
use ped_nav::NavigationGraph;
use ped_steering::OrientingSteering;

use crate::{SimError, SimObserver, SimResult};

/// One steered agent: its id, its steering stack, and its private RNG.
pub struct Pilot {
    pub agent:    AgentId,
    pub steering: OrientingSteering,
    pub rng:      AgentRng,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<N: NavigationGraph> {
    /// Global configuration (total ticks, seed, tick duration, …).
    pub config: SimConfig,

    /// Simulation clock: tracks the current tick and maps to simulated time.
    pub clock: SimClock,

    /// Every agent's spatial state.  Only [`Sim`] mutates it during a run.
    pub env: Environment,

    /// Where agents are heading.
    pub nav: N,

    /// Steered agents in ascending id order.
    pub pilots: Vec<Pilot>,
}

impl<N: NavigationGraph> Sim<N> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            agents = self.env.node_count(),
            steered = self.pilots.len(),
            ticks = self.config.total_ticks,
            seed = self.config.seed,
            "simulation started"
        );
        while self.clock.current_tick < self.config.end_tick() {
            self.tick_once(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        info!(final_tick = %self.clock, "simulation finished");
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.tick_once(observer);
        }
        Ok(())
    }

    /// Add an agent mid-run and steer it with `steering`.
    ///
    /// # Errors
    ///
    /// [`SimError::Env`] if the environment refuses the agent (overlap or
    /// malformed `spec`).
    pub fn spawn(
        &mut self,
        spec:     NodeSpec,
        position: DVec2,
        steering: OrientingSteering,
    ) -> SimResult<AgentId> {
        let agent = self.env.add_node(spec, position)?;
        // Fresh handles are always the highest, so the order stays sorted.
        self.pilots.push(Pilot {
            agent,
            steering,
            rng: AgentRng::new(self.config.seed, agent),
        });
        Ok(agent)
    }

    /// Remove an agent (steered or not) from the simulation.
    ///
    /// # Errors
    ///
    /// [`SimError::AgentNotFound`] if `agent` is not in the environment.
    pub fn despawn(&mut self, agent: AgentId) -> SimResult<()> {
        self.env.remove_node(agent).map_err(|_| SimError::AgentNotFound(agent))?;
        self.pilots.retain(|p| p.agent != agent);
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn tick_once<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let moved = self.process_tick(now);
        debug!(%now, moved, "tick complete");
        observer.on_tick_end(now, moved);
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, &self.env);
        }
        self.clock.advance();
    }

    /// Step every pilot once; returns how many moved.
    #[cfg(not(feature = "parallel"))]
    fn process_tick(&mut self, now: Tick) -> usize {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let env       = &mut self.env;
        let nav       = &self.nav;
        let step_secs = self.config.tick_duration_secs;

        let mut moved = 0;
        for p in &mut self.pilots {
            if p.steering.step(env, nav, p.agent, now, step_secs, &mut p.rng).moved {
                moved += 1;
            }
        }
        moved
    }

    /// Plan every pilot in parallel against the tick-start state, then
    /// commit in ascending id order; returns how many moved.
    #[cfg(feature = "parallel")]
    fn process_tick(&mut self, now: Tick) -> usize {
        use rayon::prelude::*;

        let env       = &self.env;
        let nav       = &self.nav;
        let step_secs = self.config.tick_duration_secs;

        let plans: Vec<_> = self
            .pilots
            .par_iter_mut()
            .map(|p| (p.agent, p.steering.plan(env, nav, p.agent, now, step_secs, &mut p.rng)))
            .collect();

        plans
            .into_iter()
            .filter_map(|(agent, plan)| plan.map(|m| m.commit(&mut self.env, agent)))
            .filter(|outcome| outcome.moved)
            .count()
    }
}
