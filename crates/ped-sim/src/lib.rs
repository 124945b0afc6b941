//! `ped-sim` — step loop for the rust_ped crowd framework.
//!
//! # One tick
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   for pilot in pilots (ascending AgentId):
//!     ① Plan    — navigation waypoint + steering actions → Movement
//!     ② Commit  — Environment::move_node_to_position (may be refused),
//!                 then turn to face the displacement
//!   observer.on_tick_end / on_snapshot
//! ```
//!
//! Each agent completes both phases before the next agent plans, so every
//! agent sees the moves of lower ids made earlier in the same tick.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Plans all agents on Rayon's thread pool against the      |
//! |            | tick-start state, then commits sequentially by id.       |
//! | `serde`    | `Serialize`/`Deserialize` on `SimConfig` and ids.        |
//!
//! With `parallel`, an agent no longer sees same-tick moves of lower ids
//! while planning.  Runs are still deterministic, but trajectories differ
//! from sequential runs with the same seed.
//!
//! # Quick-start
//!
//! ```
//! use ped_core::{DVec2, Shape, SimConfig};
//! use ped_env::{Environment, NodeSpec};
//! use ped_nav::FixedTarget;
//! use ped_sim::{NoopObserver, SimBuilder};
//! use ped_steering::{OrientingSteering, Weighted};
//!
//! let mut env = Environment::physics();
//! let walker = env.add_node(NodeSpec::new(Shape::circle(0.3).unwrap()), DVec2::ZERO).unwrap();
//!
//! let config = SimConfig { total_ticks: 10, ..SimConfig::default() };
//! let mut sim = SimBuilder::new(config, env, FixedTarget(DVec2::new(5.0, 0.0)))
//!     .agent(walker, OrientingSteering::new(Weighted::distance_weighted()))
//!     .build()
//!     .unwrap();
//! sim.run(&mut NoopObserver).unwrap();
//! assert_eq!(sim.env.get_position(walker), Some(DVec2::new(5.0, 0.0)));
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TrajectoryRecorder, TrajectorySample};
pub use sim::{Pilot, Sim};
