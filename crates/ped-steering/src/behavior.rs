//! The `SteeringBehavior` trait, the extension point for crowd models.

use ped_core::AgentRng;

use crate::{SteeringAction, SteeringContext};

/// A source of steering actions.
///
/// Called once per agent per step.  Return `None` when the behaviour has
/// nothing to say this step (no neighbours in range, say); an inactive
/// behaviour then carries no weight at all, unlike a zero-length action.
///
/// # Thread safety
///
/// Under the `parallel` feature of `ped-sim` many agents are planned at
/// once, so implementations must be `Send + Sync`.  Randomness must come
/// from the `rng` argument, which belongs to the agent being steered, so
/// results don't depend on thread scheduling.
///
/// # Example
///
/// ```
/// use ped_core::{AgentRng, DVec2};
/// use ped_steering::{SteeringAction, SteeringBehavior, SteeringContext};
///
/// /// Drift east at walking pace.
/// struct EastWind;
///
/// impl SteeringBehavior for EastWind {
///     fn steer(&self, ctx: &SteeringContext<'_>, _rng: &mut AgentRng) -> Option<SteeringAction> {
///         Some(SteeringAction::new(DVec2::X * ctx.max_step()))
///     }
/// }
/// ```
pub trait SteeringBehavior: Send + Sync {
    fn steer(&self, ctx: &SteeringContext<'_>, rng: &mut AgentRng) -> Option<SteeringAction>;
}

/// A behaviour that is never active.
///
/// Useful as a placeholder in tests, or for agents that only follow their
/// navigation target.
pub struct Idle;

impl SteeringBehavior for Idle {
    fn steer(&self, _ctx: &SteeringContext<'_>, _rng: &mut AgentRng) -> Option<SteeringAction> {
        None
    }
}
