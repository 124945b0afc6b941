//! Environment error type.

use ped_core::{AgentId, CoreError, DVec2};
use thiserror::Error;

/// Errors produced by `ped-env`.
///
/// Rejected moves and rotations are not here: they are reported as `false`.
#[derive(Debug, Error, PartialEq)]
pub enum EnvError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("could not place agent at {0}: overlaps an existing agent")]
    CouldNotPlace(DVec2),

    #[error("invalid position {0}")]
    InvalidPosition(DVec2),

    #[error("invalid walking speed {0}")]
    InvalidSpeed(f64),

    #[error("invalid deployment: {0}")]
    InvalidDeployment(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type EnvResult<T> = Result<T, EnvError>;
