//! Navigation error type.

use thiserror::Error;

use ped_core::{DVec2, RoomId};

/// Errors produced by `ped-nav`.  All of them are raised while building a
/// graph; queries on a built graph never fail.
#[derive(Debug, Error, PartialEq)]
pub enum NavError {
    #[error("room {0} not found in navigation graph")]
    RoomNotFound(RoomId),

    #[error("destination point {point} is not inside {room}")]
    InvalidDestination { room: RoomId, point: DVec2 },

    #[error("door between {a} and {b} has its midpoint {midpoint} off their shared wall")]
    DoorOffWall { a: RoomId, b: RoomId, midpoint: DVec2 },
}

pub type NavResult<T> = Result<T, NavError>;
