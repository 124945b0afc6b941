//! `ped-steering` — turning goals and disturbances into one movement.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`action`]    | `SteeringAction`: one candidate displacement, optional target   |
//! | [`context`]   | `SteeringContext<'a>`: read-only view handed to behaviours      |
//! | [`behavior`]  | `SteeringBehavior` trait, `Idle`                                |
//! | [`behaviors`] | `seek`, `Seek`, `Flee`, `Arrive`, `Separation`, `Cohesion`, `Wander` |
//! | [`strategy`]  | `SteeringStrategy` trait, `Weighted` + `Weighting`, `Nearest`   |
//! | [`orienting`] | `OrientingSteering`, `Movement`, `reconcile`, `StepOutcome`     |
//! | [`error`]     | `SteeringError`, `SteeringResult<T>`                            |
//!
//! # One step of one agent
//!
//! 1. Navigation names the next waypoint; `seek` toward it is the
//!    **desired** movement (zero if there is no waypoint).
//! 2. Every behaviour may propose a [`SteeringAction`]; the strategy folds
//!    them into one **disturbing** movement.
//! 3. [`reconcile`] keeps the disturbance from cancelling the goal.
//! 4. The sum is handed to the environment, which may refuse it.  A refused
//!    move is routine: the agent waits this step.
//!
//! Nothing in a step returns an error.  Degenerate inputs (no waypoint,
//! zero vectors, coincident targets) shrink the movement, possibly to zero.

pub mod action;
pub mod behavior;
pub mod behaviors;
pub mod context;
pub mod error;
pub mod orienting;
pub mod strategy;


pub use action::SteeringAction;
pub use behavior::{Idle, SteeringBehavior};
pub use behaviors::{Arrive, Cohesion, Flee, Seek, Separation, Wander, seek};
pub use context::SteeringContext;
pub use error::{SteeringError, SteeringResult};
pub use orienting::{
    DESIRED_MARGIN, Movement, OrientingSteering, StepOutcome, adjust_disturbing, reconcile,
};
pub use strategy::{Nearest, SteeringStrategy, Weighted, Weighting};
