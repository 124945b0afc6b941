//! `ped-env` — the continuous 2D space agents live in.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`arena`]       | `AgentRecord`, `AgentArena` (records indexed by `AgentId`)    |
//! | [`index`]       | `SpatialIndex`: R-tree broad phase over agent positions       |
//! | [`environment`] | `Environment`, `EnvironmentKind`, `LinkingRule`, `NodeSpec`   |
//! | [`deployment`]  | `Deployment` trait, `Point`, `Circle`, `Grid`, `deploy`       |
//! | [`error`]       | `EnvError`, `EnvResult<T>`                                    |
//!
//! # The no-overlap invariant
//!
//! In a [`EnvironmentKind::Physics`] environment no two agents' placed shapes
//! ever intersect.  Every mutating call checks before it commits:
//!
//! - `add_node` refuses the agent ([`EnvError::CouldNotPlace`]);
//! - `move_node_to_position` and `set_heading` leave the agent untouched and
//!   return `false`.  Collisions are routine in a crowd, so a rejected move
//!   is not an error, the agent just stays put this step.

pub mod arena;
pub mod deployment;
pub mod environment;
pub mod error;
pub mod index;


pub use arena::{AgentArena, AgentRecord};
pub use deployment::{Circle, Deployment, Grid, Placement, Point, deploy};
pub use environment::{Environment, EnvironmentKind, LinkingRule, NodeSpec};
pub use error::{EnvError, EnvResult};
pub use index::SpatialIndex;
