//! Framework error type.
//!
//! Only configuration mistakes end up here: malformed shapes, coordinate
//! vectors of the wrong length, degenerate polygons.  Routine simulation
//! conditions (collisions, zero distances) are never errors.

use thiserror::Error;

/// The base error type for `ped-core`; sub-crates wrap it via `#[from]`.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("expected {expected} coordinates, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `ped-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
