//! `ped-core` — foundational types for the `rust_ped` crowd framework.
//!
//! This crate is a dependency of every other `ped-*` crate.  It has no
//! `ped-*` dependencies and few external ones (`glam`, `rand`, `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `RoomId`, `DoorId`                             |
//! | [`geometry`]    | `DVec2` helpers, `Segment`, `ConvexPolygon`, `make_position` |
//! | [`shape`]       | `Shape` (agent footprint), `PlacedShape` + intersection   |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                           |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)                 |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and `SimConfig`.     |

pub mod error;
pub mod geometry;
pub mod ids;
pub mod rng;
pub mod shape;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geometry::{ConvexPolygon, DVec2, Segment, make_position};
pub use ids::{AgentId, DoorId, RoomId};
pub use rng::{AgentRng, SimRng};
pub use shape::{PlacedShape, Shape};
pub use time::{SimClock, SimConfig, Tick};
