//! The navigation seam consumed by steering.

use ped_core::{DVec2, RoomId};

/// Read-only source of navigation targets.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one graph can be shared by every
/// agent, including across Rayon workers under the `parallel` feature.
pub trait NavigationGraph: Send + Sync {
    /// The room containing `position`, or `None` if it is outside every room.
    fn current_room(&self, position: DVec2) -> Option<RoomId>;

    /// Where an agent in `room` should walk next.  `None` means there is
    /// nowhere to go: the destination is unreachable, or already reached.
    fn next_waypoint(&self, room: RoomId) -> Option<DVec2>;
}

/// A single target point visible from everywhere.
///
/// Every position is in room 0, whose waypoint is the point itself.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedTarget(pub DVec2);

impl NavigationGraph for FixedTarget {
    fn current_room(&self, _position: DVec2) -> Option<RoomId> {
        Some(RoomId(0))
    }

    fn next_waypoint(&self, room: RoomId) -> Option<DVec2> {
        (room == RoomId(0)).then_some(self.0)
    }
}

/// No rooms, no targets.  Agents driven only by their steering behaviours.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NoNavigation;

impl NavigationGraph for NoNavigation {
    fn current_room(&self, _position: DVec2) -> Option<RoomId> {
        None
    }

    fn next_waypoint(&self, _room: RoomId) -> Option<DVec2> {
        None
    }
}
