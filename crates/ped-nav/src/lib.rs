//! `ped-nav` — where agents are heading.
//!
//! Steering only ever asks two questions of navigation: "which room is this
//! position in" and "where should someone in that room walk next".  The
//! [`NavigationGraph`] trait is exactly those two questions, so a scenario
//! can plug in anything from a fixed point to a full building plan.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`graph`]  | `NavigationGraph` trait, `FixedTarget`, `NoNavigation`       |
//! | [`rooms`]  | `RoomGraph` (CSR doors + R-tree rooms), `RoomGraphBuilder`   |
//! | [`route`]  | Reverse Dijkstra from the destination, next-door tables     |
//! | [`error`]  | `NavError`, `NavResult<T>`                                  |

pub mod error;
pub mod graph;
pub mod rooms;
pub mod route;

#[cfg(test)]
mod tests;

pub use error::{NavError, NavResult};
pub use graph::{FixedTarget, NavigationGraph, NoNavigation};
pub use rooms::{RoomGraph, RoomGraphBuilder};
pub use route::NextHops;
