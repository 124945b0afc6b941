use thiserror::Error;

use ped_core::{AgentId, CoreError};
use ped_env::EnvError;

#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{0} is not in the environment")]
    AgentNotFound(AgentId),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Env(#[from] EnvError),
}

pub type SimResult<T> = Result<T, SimError>;
