//! Deterministic per-agent and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each agent owns an independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs across the seed space.  Agents never
//! share RNG state, so the sequence an agent draws depends only on the run
//! seed and its own id, never on how many other agents exist or the order
//! in which they were stepped.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG, consumed by randomised steering behaviours.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// A unit vector with a uniformly distributed direction.
    pub fn unit_vector(&mut self) -> DVec2 {
        DVec2::from_angle(self.0.gen_range(0.0..TAU))
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations (deployments, scenario jitter).
///
/// Used only in single-threaded contexts.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// A point uniformly distributed in the disc of `radius` around `center`.
    pub fn point_in_disc(&mut self, center: DVec2, radius: f64) -> DVec2 {
        let r = radius * self.0.gen_range(0.0..=1.0f64).sqrt();
        center + DVec2::from_angle(self.0.gen_range(0.0..TAU)) * r
    }
}
