//! Folding several steering actions into one disturbing movement.
//!
//! # Distance weighting
//!
//! [`Weighting::DistanceWeighted`] weights an action with a target by the
//! inverse of the agent's distance to that target, so near things dominate
//! far ones.  A target exactly at the agent's position gets weight **0**
//! (the distance itself, not its inverse): a force toward or away from the
//! spot the agent already stands on has no direction and is dropped.
//! Targetless actions get `default_weight`.
//!
//! # Combination
//!
//! `Σ(wᵢ · vᵢ) / Σ(wᵢ)`, or the zero vector when the weights sum to zero.
//! The fold is total: it never fails, it only degenerates to "no influence".

use ped_core::{AgentId, DVec2};
use ped_env::Environment;

use crate::SteeringAction;

/// Weight of one action, for [`Weighting::Custom`].
pub type WeightFn = fn(&SteeringAction, &Environment, AgentId) -> f64;

/// Reduces an agent's steering actions to a single vector.
///
/// # Thread safety
///
/// Shared by every agent using it, possibly across Rayon workers, hence
/// `Send + Sync`.
pub trait SteeringStrategy: Send + Sync {
    /// The aggregate movement for `agent`.  Must return zero for an empty
    /// slice.
    fn compute_next_position(
        &self,
        actions: &[SteeringAction],
        env:     &Environment,
        agent:   AgentId,
    ) -> DVec2;
}

// ── Weighted ──────────────────────────────────────────────────────────────────

/// How [`Weighted`] scores an action.
#[derive(Copy, Clone, Debug)]
pub enum Weighting {
    /// `1 / distance` to the target, `0` at distance zero,
    /// `default_weight` for targetless actions.
    DistanceWeighted { default_weight: f64 },
    /// The same weight for every action: a plain average.
    Uniform(f64),
    /// Caller-supplied weight function.
    Custom(WeightFn),
}

impl Weighting {
    pub fn weight(&self, action: &SteeringAction, env: &Environment, agent: AgentId) -> f64 {
        match *self {
            Weighting::DistanceWeighted { default_weight } => {
                let distance = env
                    .get_position(agent)
                    .and_then(|p| action.target_distance(p));
                match distance {
                    Some(d) if d > 0.0 => 1.0 / d,
                    Some(d) => d,
                    None => default_weight,
                }
            }
            Weighting::Uniform(w) => w,
            Weighting::Custom(f) => f(action, env, agent),
        }
    }
}

/// Weighted average of every action's movement.
#[derive(Copy, Clone, Debug)]
pub struct Weighted {
    pub weighting: Weighting,
}

impl Weighted {
    pub fn new(weighting: Weighting) -> Self {
        Self { weighting }
    }

    /// Inverse-distance weighting with weight 1 for targetless actions.
    pub fn distance_weighted() -> Self {
        Self::new(Weighting::DistanceWeighted { default_weight: 1.0 })
    }
}

impl Default for Weighted {
    fn default() -> Self {
        Self::distance_weighted()
    }
}

impl SteeringStrategy for Weighted {
    fn compute_next_position(
        &self,
        actions: &[SteeringAction],
        env:     &Environment,
        agent:   AgentId,
    ) -> DVec2 {
        let (sum, total) = actions.iter().fold((DVec2::ZERO, 0.0), |(sum, total), action| {
            let w = self.weighting.weight(action, env, agent);
            (sum + action.movement * w, total + w)
        });
        if total == 0.0 { DVec2::ZERO } else { sum / total }
    }
}

// ── Nearest ───────────────────────────────────────────────────────────────────

/// Follow only the action whose target is closest to the agent.
///
/// Targetless actions are a fallback: the first of them is used only when
/// no action has a target.  Ties go to the earlier action.
#[derive(Copy, Clone, Debug, Default)]
pub struct Nearest;

impl SteeringStrategy for Nearest {
    fn compute_next_position(
        &self,
        actions: &[SteeringAction],
        env:     &Environment,
        agent:   AgentId,
    ) -> DVec2 {
        let position = env.get_position(agent).unwrap_or(DVec2::ZERO);
        let mut best: Option<(f64, DVec2)> = None;
        for action in actions {
            if let Some(d) = action.target_distance(position) {
                if best.is_none_or(|(b, _)| d < b) {
                    best = Some((d, action.movement));
                }
            }
        }
        match best {
            Some((_, movement)) => movement,
            None => actions.first().map_or(DVec2::ZERO, |a| a.movement),
        }
    }
}
