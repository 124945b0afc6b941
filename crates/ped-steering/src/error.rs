use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SteeringError {
    #[error("steering configuration error: {0}")]
    Config(String),
}

pub type SteeringResult<T> = Result<T, SteeringError>;
