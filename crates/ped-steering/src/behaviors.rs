//! Stock steering behaviours and the `seek` primitive.
//!
//! Every behaviour bounds its movement by [`SteeringContext::max_step`], so
//! no single action can carry an agent further than its walking speed
//! allows in one step.  Strategies may still add actions up.

use ped_core::geometry::resize;
use ped_core::{AgentId, AgentRng, DVec2};
use ped_env::Environment;

use crate::{SteeringAction, SteeringBehavior, SteeringContext, SteeringError, SteeringResult};

/// Displacement from `agent` toward `target`, at most `max_step` long.
///
/// Lands exactly on `target` when it is within reach; zero when the agent
/// is already there or not in `env`.
pub fn seek(env: &Environment, agent: AgentId, target: DVec2, max_step: f64) -> DVec2 {
    let Some(position) = env.get_position(agent) else {
        return DVec2::ZERO;
    };
    let to_target = target - position;
    let distance = to_target.length();
    if distance <= max_step {
        to_target
    } else {
        resize(to_target, max_step)
    }
}

fn require(ok: bool, what: impl FnOnce() -> String) -> SteeringResult<()> {
    if ok { Ok(()) } else { Err(SteeringError::Config(what())) }
}

fn non_negative(x: f64) -> bool {
    x.is_finite() && x >= 0.0
}

/// Centroid of `points`; `None` when empty.
fn centroid(points: &[DVec2]) -> Option<DVec2> {
    (!points.is_empty()).then(|| points.iter().copied().sum::<DVec2>() / points.len() as f64)
}

// ── Seek / Flee / Arrive ──────────────────────────────────────────────────────

/// Walk straight at a point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Seek(pub DVec2);

impl SteeringBehavior for Seek {
    fn steer(&self, ctx: &SteeringContext<'_>, _rng: &mut AgentRng) -> Option<SteeringAction> {
        let movement = seek(ctx.env, ctx.agent, self.0, ctx.max_step());
        Some(SteeringAction::with_target(movement, self.0))
    }
}

/// Walk straight away from a point.  The point is the action's target, so
/// under distance weighting the push grows as the agent gets closer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Flee(pub DVec2);

impl SteeringBehavior for Flee {
    fn steer(&self, ctx: &SteeringContext<'_>, _rng: &mut AgentRng) -> Option<SteeringAction> {
        let away = ctx.position()? - self.0;
        Some(SteeringAction::with_target(resize(away, ctx.max_step()), self.0))
    }
}

/// Like [`Seek`], but slows down linearly inside `slowing_radius`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Arrive {
    target:         DVec2,
    slowing_radius: f64,
}

impl Arrive {
    /// # Errors
    ///
    /// [`SteeringError::Config`] unless `slowing_radius` is finite and positive.
    pub fn new(target: DVec2, slowing_radius: f64) -> SteeringResult<Self> {
        require(slowing_radius.is_finite() && slowing_radius > 0.0, || {
            format!("arrive slowing radius {slowing_radius}")
        })?;
        Ok(Self { target, slowing_radius })
    }
}

impl SteeringBehavior for Arrive {
    fn steer(&self, ctx: &SteeringContext<'_>, _rng: &mut AgentRng) -> Option<SteeringAction> {
        let distance = ctx.position()?.distance(self.target);
        let ramp = (distance / self.slowing_radius).min(1.0);
        let movement = seek(ctx.env, ctx.agent, self.target, ctx.max_step() * ramp);
        Some(SteeringAction::with_target(movement, self.target))
    }
}

// ── Crowd behaviours ──────────────────────────────────────────────────────────

/// Step away from the centroid of every other agent within `range`.
///
/// Inactive when nobody is in range, or when the neighbours surround the
/// agent so evenly that there is no "away".
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Separation {
    range: f64,
}

impl Separation {
    /// # Errors
    ///
    /// [`SteeringError::Config`] for a negative or non-finite range.
    pub fn new(range: f64) -> SteeringResult<Self> {
        require(non_negative(range), || format!("separation range {range}"))?;
        Ok(Self { range })
    }
}

impl SteeringBehavior for Separation {
    fn steer(&self, ctx: &SteeringContext<'_>, _rng: &mut AgentRng) -> Option<SteeringAction> {
        let crowd = centroid(&ctx.others_within(self.range))?;
        let away = ctx.position()? - crowd;
        (away != DVec2::ZERO).then(|| SteeringAction::new(resize(away, ctx.max_step())))
    }
}

/// Step toward the centroid of every other agent within `range`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cohesion {
    range: f64,
}

impl Cohesion {
    /// # Errors
    ///
    /// [`SteeringError::Config`] for a negative or non-finite range.
    pub fn new(range: f64) -> SteeringResult<Self> {
        require(non_negative(range), || format!("cohesion range {range}"))?;
        Ok(Self { range })
    }
}

impl SteeringBehavior for Cohesion {
    fn steer(&self, ctx: &SteeringContext<'_>, _rng: &mut AgentRng) -> Option<SteeringAction> {
        let crowd = centroid(&ctx.others_within(self.range))?;
        let movement = seek(ctx.env, ctx.agent, crowd, ctx.max_step());
        Some(SteeringAction::with_target(movement, crowd))
    }
}

/// Random walk: keep roughly the current heading, perturbed each step by a
/// random unit vector scaled by `jitter`.
///
/// Draws exactly one direction from the agent's RNG per step, whatever the
/// outcome, so the RNG stream stays aligned across runs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Wander {
    jitter: f64,
}

impl Wander {
    /// # Errors
    ///
    /// [`SteeringError::Config`] for a negative or non-finite jitter.
    pub fn new(jitter: f64) -> SteeringResult<Self> {
        require(non_negative(jitter), || format!("wander jitter {jitter}"))?;
        Ok(Self { jitter })
    }
}

impl SteeringBehavior for Wander {
    fn steer(&self, ctx: &SteeringContext<'_>, rng: &mut AgentRng) -> Option<SteeringAction> {
        let kick = rng.unit_vector();
        let heading = ctx.env.get_heading(ctx.agent)?;
        let mut direction = heading + kick * self.jitter;
        if direction == DVec2::ZERO || heading == DVec2::ZERO {
            direction = kick;
        }
        Some(SteeringAction::new(resize(direction, ctx.max_step())))
    }
}
