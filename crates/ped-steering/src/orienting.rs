//! The per-step control algorithm: goal versus disturbance.
//!
//! # Conflict resolution
//!
//! When the disturbance points more than 90° away from the goal, adding the
//! two would mostly cancel out and the agent would stall.  The disturbance
//! is then swung onto the perpendicular of the desired movement (keeping
//! its length), on whichever side is closer to where it pointed; a
//! disturbance straight against the goal goes to the right-hand side.
//! Exactly 90° is left alone.
//!
//! # Magnitude reconciliation
//!
//! If the disturbance is still longer than the desired movement, the
//! desired movement is stretched to [`DESIRED_MARGIN`] times the
//! disturbance length.  Matching the lengths exactly isn't enough to stop
//! an agent oscillating in place; the margin is.

use std::f64::consts::FRAC_PI_2;

use tracing::trace;

use ped_core::geometry::{angle_between, magnitude, normal, resize};
use ped_core::{AgentId, AgentRng, DVec2, Tick};
use ped_env::Environment;
use ped_nav::NavigationGraph;

use crate::{SteeringBehavior, SteeringContext, SteeringStrategy, seek};

/// Desired movement is stretched to this multiple of a longer disturbance.
pub const DESIRED_MARGIN: f64 = 1.2;

// ── Pure reconciliation ───────────────────────────────────────────────────────

/// `disturbing`, swung onto the normal of `desired` if the two are more than
/// 90° apart.  The left normal wins only when strictly closer.
pub fn adjust_disturbing(desired: DVec2, disturbing: DVec2) -> DVec2 {
    if angle_between(desired, disturbing) <= FRAC_PI_2 {
        return disturbing;
    }
    let length = magnitude(disturbing);
    let left = resize(normal(desired), length);
    let right = -left;
    if left.distance(disturbing) < right.distance(disturbing) { left } else { right }
}

/// Resolve a conflict between the two halves of a movement.
///
/// The returned movement has origin zero; see [`Movement::at`].
pub fn reconcile(desired: DVec2, disturbing: DVec2) -> Movement {
    let disturbing = adjust_disturbing(desired, disturbing);
    let push = magnitude(disturbing);
    let desired = if push > magnitude(desired) {
        resize(desired, push * DESIRED_MARGIN)
    } else {
        desired
    };
    Movement { origin: DVec2::ZERO, desired, disturbing }
}

// ── Movement ──────────────────────────────────────────────────────────────────

/// A reconciled movement, planned but not yet committed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Movement {
    /// Where the agent stood when the movement was planned.
    pub origin:     DVec2,
    pub desired:    DVec2,
    pub disturbing: DVec2,
}

impl Movement {
    #[inline]
    pub fn at(self, origin: DVec2) -> Self {
        Self { origin, ..self }
    }

    #[inline]
    pub fn displacement(&self) -> DVec2 {
        self.desired + self.disturbing
    }

    /// The position the agent asks to move to.
    #[inline]
    pub fn target(&self) -> DVec2 {
        self.origin + self.displacement()
    }

    /// Ask `env` to move `agent` to [`target`](Self::target), then turn it
    /// to face the direction it walked.
    ///
    /// A refused move leaves position and heading untouched.  A refused
    /// rotation after a successful move keeps the old heading.
    pub fn commit(&self, env: &mut Environment, agent: AgentId) -> StepOutcome {
        let target = self.target();
        let displacement = self.displacement();
        if displacement == DVec2::ZERO {
            return StepOutcome { moved: false, target };
        }
        let moved = env.move_node_to_position(agent, target);
        if moved {
            env.set_heading(agent, displacement);
        }
        StepOutcome { moved, target }
    }
}

/// What happened to one agent in one step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepOutcome {
    /// `false` for a zero movement as well as a refused one.
    pub moved:  bool,
    /// The position the agent asked to move to.
    pub target: DVec2,
}

// ── OrientingSteering ─────────────────────────────────────────────────────────

/// An agent's steering stack: its behaviours plus the strategy that folds
/// their actions together.
///
/// # Example
///
/// ```
/// use ped_core::{AgentRng, DVec2, Shape, Tick};
/// use ped_env::{Environment, NodeSpec};
/// use ped_nav::FixedTarget;
/// use ped_steering::{OrientingSteering, Separation, Weighted};
///
/// let mut env = Environment::physics();
/// let me = env.add_node(NodeSpec::new(Shape::circle(0.3).unwrap()), DVec2::ZERO).unwrap();
/// let steering = OrientingSteering::new(Weighted::distance_weighted())
///     .with_behavior(Separation::new(1.0).unwrap());
///
/// let mut rng = AgentRng::new(42, me);
/// let nav = FixedTarget(DVec2::new(10.0, 0.0));
/// let outcome = steering.step(&mut env, &nav, me, Tick(0), 1.0, &mut rng);
/// assert!(outcome.moved);
/// assert_eq!(env.get_position(me), Some(DVec2::new(1.4, 0.0)));
/// ```
pub struct OrientingSteering {
    behaviors: Vec<Box<dyn SteeringBehavior>>,
    strategy:  Box<dyn SteeringStrategy>,
}

impl OrientingSteering {
    pub fn new(strategy: impl SteeringStrategy + 'static) -> Self {
        Self { behaviors: Vec::new(), strategy: Box::new(strategy) }
    }

    pub fn with_behavior(mut self, behavior: impl SteeringBehavior + 'static) -> Self {
        self.behaviors.push(Box::new(behavior));
        self
    }

    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }

    /// Plan `agent`'s movement without changing anything.
    ///
    /// `None` only if the agent is not in `env`.
    pub fn plan(
        &self,
        env:       &Environment,
        nav:       &dyn NavigationGraph,
        agent:     AgentId,
        tick:      Tick,
        step_secs: f64,
        rng:       &mut AgentRng,
    ) -> Option<Movement> {
        let ctx = SteeringContext::new(env, agent, tick, step_secs);
        let origin = ctx.position()?;

        let waypoint = nav
            .current_room(origin)
            .and_then(|room| nav.next_waypoint(room));
        let desired = waypoint.map_or(DVec2::ZERO, |w| seek(env, agent, w, ctx.max_step()));

        let actions: Vec<_> = self
            .behaviors
            .iter()
            .filter_map(|b| b.steer(&ctx, rng))
            .collect();
        let disturbing = self.strategy.compute_next_position(&actions, env, agent);

        let movement = reconcile(desired, disturbing).at(origin);
        trace!(
            %agent,
            %tick,
            actions = actions.len(),
            desired = %movement.desired,
            disturbing = %movement.disturbing,
            "movement planned"
        );
        Some(movement)
    }

    /// Plan and commit one step for `agent`.
    pub fn step(
        &self,
        env:       &mut Environment,
        nav:       &dyn NavigationGraph,
        agent:     AgentId,
        tick:      Tick,
        step_secs: f64,
        rng:       &mut AgentRng,
    ) -> StepOutcome {
        match self.plan(env, nav, agent, tick, step_secs, rng) {
            Some(movement) => movement.commit(env, agent),
            None => StepOutcome { moved: false, target: DVec2::ZERO },
        }
    }
}
