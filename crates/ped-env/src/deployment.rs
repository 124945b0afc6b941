//! Initial placement of agent populations.
//!
//! A [`Deployment`] only proposes positions; [`deploy`] feeds them through
//! [`Environment::add_node`] so admission follows the same overlap rules as
//! everything else.  Positions that don't fit are reported back instead of
//! aborting the whole deployment.

use tracing::debug;

use ped_core::{AgentId, DVec2, SimRng};

use crate::{EnvError, EnvResult, Environment, NodeSpec};

/// A source of candidate positions.
pub trait Deployment {
    /// Candidate positions, in placement order.  Randomised deployments draw
    /// from `rng`; the same seed yields the same positions.
    fn positions(&self, rng: &mut SimRng) -> Vec<DVec2>;
}

/// A single agent at a fixed position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point(pub DVec2);

impl Deployment for Point {
    fn positions(&self, _rng: &mut SimRng) -> Vec<DVec2> {
        vec![self.0]
    }
}

/// `count` agents uniformly distributed in a disc.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Circle {
    center: DVec2,
    radius: f64,
    count:  usize,
}

impl Circle {
    /// # Errors
    ///
    /// [`EnvError::InvalidDeployment`] for a negative or non-finite radius.
    pub fn new(center: DVec2, radius: f64, count: usize) -> EnvResult<Self> {
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(EnvError::InvalidDeployment(format!("circle radius {radius}")));
        }
        Ok(Self { center, radius, count })
    }
}

impl Deployment for Circle {
    fn positions(&self, rng: &mut SimRng) -> Vec<DVec2> {
        (0..self.count)
            .map(|_| rng.point_in_disc(self.center, self.radius))
            .collect()
    }
}

/// A regular grid from `min` to `max` (inclusive), row by row, each point
/// optionally displaced by up to `jitter` on both axes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Grid {
    min:    DVec2,
    max:    DVec2,
    step:   DVec2,
    jitter: f64,
}

impl Grid {
    /// # Errors
    ///
    /// [`EnvError::InvalidDeployment`] unless `step` is positive, `max >= min`
    /// on both axes, and `jitter` is non-negative.
    pub fn new(min: DVec2, max: DVec2, step: DVec2, jitter: f64) -> EnvResult<Self> {
        if !(step.is_finite() && step.x > 0.0 && step.y > 0.0) {
            return Err(EnvError::InvalidDeployment(format!("grid step {step}")));
        }
        if !(min.is_finite() && max.is_finite() && max.x >= min.x && max.y >= min.y) {
            return Err(EnvError::InvalidDeployment(format!("grid bounds {min}..{max}")));
        }
        if !(jitter.is_finite() && jitter >= 0.0) {
            return Err(EnvError::InvalidDeployment(format!("grid jitter {jitter}")));
        }
        Ok(Self { min, max, step, jitter })
    }
}

impl Deployment for Grid {
    fn positions(&self, rng: &mut SimRng) -> Vec<DVec2> {
        // Small slack so 0.0..0.9 by 0.3 yields four columns, not three.
        let cols = ((self.max.x - self.min.x) / self.step.x + 1e-9).floor() as usize + 1;
        let rows = ((self.max.y - self.min.y) / self.step.y + 1e-9).floor() as usize + 1;
        let mut out = Vec::with_capacity(cols * rows);
        for j in 0..rows {
            for i in 0..cols {
                let mut p = self.min + DVec2::new(i as f64, j as f64) * self.step;
                if self.jitter > 0.0 {
                    p.x += rng.gen_range(-self.jitter..=self.jitter);
                    p.y += rng.gen_range(-self.jitter..=self.jitter);
                }
                out.push(p);
            }
        }
        out
    }
}

/// Outcome of [`deploy`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Placement {
    /// Agents admitted, in placement order.
    pub placed:  Vec<AgentId>,
    /// Proposed positions refused because they overlapped.
    pub skipped: Vec<DVec2>,
}

/// Add one agent described by `spec` at every position `deployment` proposes.
///
/// # Errors
///
/// Malformed `spec` or non-finite positions abort the deployment; overlap
/// refusals don't (they land in [`Placement::skipped`]).
pub fn deploy<D: Deployment + ?Sized>(
    env:        &mut Environment,
    deployment: &D,
    spec:       &NodeSpec,
    rng:        &mut SimRng,
) -> EnvResult<Placement> {
    let mut placement = Placement::default();
    for position in deployment.positions(rng) {
        match env.add_node(spec.clone(), position) {
            Ok(id) => placement.placed.push(id),
            Err(EnvError::CouldNotPlace(p)) => placement.skipped.push(p),
            Err(e) => return Err(e),
        }
    }
    if !placement.skipped.is_empty() {
        debug!(
            placed = placement.placed.len(),
            skipped = placement.skipped.len(),
            "deployment partially placed"
        );
    }
    Ok(placement)
}
