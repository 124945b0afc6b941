//! One candidate movement for one agent in one step.

use ped_core::DVec2;

/// A displacement proposed by a steering behaviour.
///
/// Created, combined, and dropped within a single step; never stored across
/// steps, since positions it was computed from go stale as soon as anyone
/// moves.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SteeringAction {
    /// Proposed displacement from the agent's current position.
    pub movement: DVec2,

    /// The point this action is about, if any.  Distance-based weightings
    /// use it; targetless actions get a fixed weight.
    pub target: Option<DVec2>,
}

impl SteeringAction {
    /// A targetless action.
    #[inline]
    pub fn new(movement: DVec2) -> Self {
        Self { movement, target: None }
    }

    #[inline]
    pub fn with_target(movement: DVec2, target: DVec2) -> Self {
        Self { movement, target: Some(target) }
    }

    /// Distance from `position` to the target, `None` for targetless actions.
    #[inline]
    pub fn target_distance(&self, position: DVec2) -> Option<f64> {
        self.target.map(|t| t.distance(position))
    }
}
