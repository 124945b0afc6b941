//! Room graph representation and builder.
//!
//! # Data layout
//!
//! Rooms are convex polygons indexed by `RoomId`.  Doors are stored in
//! **Compressed Sparse Row (CSR)** format: every door added with
//! [`RoomGraphBuilder::add_door`] becomes two directed doors, sorted by the
//! room they leave, so the doors out of room `r` are the contiguous slice
//!
//! ```text
//! door_to[ room_out_start[r] .. room_out_start[r+1] ]
//! ```
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over room bounding boxes narrows
//! [`RoomGraph::current_room`] to the few rooms whose box contains the
//! point; the exact polygon test runs only on those.

use rstar::{AABB, RTree, RTreeObject};
use tracing::debug;

use ped_core::{ConvexPolygon, DVec2, DoorId, RoomId, Segment};

use crate::route::{self, NextHops};
use crate::{NavError, NavResult, NavigationGraph};

// ── R-tree room entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a room's axis-aligned bounding box.
#[derive(Clone, Debug)]
struct RoomEntry {
    envelope: AABB<[f64; 2]>,
    id:       RoomId,
}

impl RTreeObject for RoomEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

// ── RoomGraph ─────────────────────────────────────────────────────────────────

/// Convex rooms connected by doors, with the route to one destination room
/// precomputed for every room.
///
/// Do not construct directly; use [`RoomGraphBuilder`].
pub struct RoomGraph {
    // ── Room data ─────────────────────────────────────────────────────────
    /// Footprint of each room.  Indexed by `RoomId`.
    pub rooms: Vec<ConvexPolygon>,

    // ── CSR door adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Doors out of room `r` are at DoorIds
    /// `room_out_start[r] .. room_out_start[r+1]`.
    /// Length = `room_count + 1`.
    pub room_out_start: Vec<u32>,

    // ── Door data (indexed by DoorId = position in sorted order) ──────────
    /// Room each directed door leaves.
    pub door_from: Vec<RoomId>,

    /// Room each directed door enters.
    pub door_to: Vec<RoomId>,

    /// Crossing line of each door; both directions share it.
    pub door_segment: Vec<Segment>,

    /// The same door walked the other way.
    pub door_reverse: Vec<DoorId>,

    // ── Routing ───────────────────────────────────────────────────────────
    destination:       RoomId,
    destination_point: Option<DVec2>,
    hops:              NextHops,

    // ── Spatial index ─────────────────────────────────────────────────────
    room_idx: RTree<RoomEntry>,
}

impl RoomGraph {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of directed doors (twice the number of doors added).
    pub fn door_count(&self) -> usize {
        self.door_to.len()
    }

    pub fn room(&self, room: RoomId) -> Option<&ConvexPolygon> {
        self.rooms.get(room.index())
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Doors leaving `room`, as a contiguous id range.
    #[inline]
    pub fn out_doors(&self, room: RoomId) -> impl Iterator<Item = DoorId> + '_ {
        let start = self.room_out_start[room.index()] as usize;
        let end   = self.room_out_start[room.index() + 1] as usize;
        (start..end).map(|i| DoorId(i as u32))
    }

    // ── Routing queries ───────────────────────────────────────────────────

    pub fn destination(&self) -> RoomId {
        self.destination
    }

    pub fn destination_point(&self) -> Option<DVec2> {
        self.destination_point
    }

    /// The door to take out of `room` toward the destination.
    pub fn next_door(&self, room: RoomId) -> Option<DoorId> {
        self.hops.next_door(room)
    }

    /// The room reached through [`next_door`](Self::next_door).
    pub fn next_room(&self, room: RoomId) -> Option<RoomId> {
        self.next_door(room).map(|d| self.door_to[d.index()])
    }

    /// Routing cost from `room` to the destination in metres, `None` if
    /// unreachable.
    pub fn distance_to_destination(&self, room: RoomId) -> Option<f64> {
        self.hops.cost_mm(room).map(route::mm_to_metres)
    }

    /// Rooms visited from `room` to the destination, both ends included.
    /// Empty if the destination can't be reached.
    pub fn path_from(&self, room: RoomId) -> Vec<RoomId> {
        if self.hops.cost_mm(room).is_none() {
            return Vec::new();
        }
        let mut path = vec![room];
        let mut cur = room;
        while let Some(next) = self.next_room(cur) {
            path.push(next);
            cur = next;
        }
        path
    }
}

impl NavigationGraph for RoomGraph {
    /// The room containing `position`.  Boundaries are inclusive, so a point
    /// on a shared wall (a door midpoint, typically) is in both rooms; it
    /// then belongs to the one nearer the destination, lowest id on a tie.
    /// An agent standing in a doorway has already passed through it.
    fn current_room(&self, position: DVec2) -> Option<RoomId> {
        self.room_idx
            .locate_in_envelope_intersecting(&AABB::from_point(position.to_array()))
            .map(|e| e.id)
            .filter(|&id| self.rooms[id.index()].contains(position))
            .min_by_key(|&id| (self.hops.cost_mm(id).unwrap_or(u64::MAX), id))
    }

    fn next_waypoint(&self, room: RoomId) -> Option<DVec2> {
        if room == self.destination {
            return self.destination_point;
        }
        self.next_door(room).map(|d| self.door_segment[d.index()].midpoint())
    }
}

// ── RoomGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoomGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ped_core::{ConvexPolygon, DVec2, Segment};
/// use ped_nav::{NavigationGraph, RoomGraphBuilder};
///
/// let mut b = RoomGraphBuilder::new();
/// let hall = b.add_room(ConvexPolygon::rectangle(DVec2::new(0.0, 0.0), DVec2::new(10.0, 4.0)).unwrap());
/// let exit = b.add_room(ConvexPolygon::rectangle(DVec2::new(10.0, 0.0), DVec2::new(14.0, 4.0)).unwrap());
/// b.add_door(hall, exit, Segment::new(DVec2::new(10.0, 1.0), DVec2::new(10.0, 3.0))).unwrap();
/// let graph = b.destination_point(DVec2::new(13.0, 2.0)).build(exit).unwrap();
///
/// let here = graph.current_room(DVec2::new(2.0, 2.0)).unwrap();
/// assert_eq!(graph.next_waypoint(here), Some(DVec2::new(10.0, 2.0)));
/// ```
#[derive(Default)]
pub struct RoomGraphBuilder {
    rooms:             Vec<ConvexPolygon>,
    raw_doors:         Vec<RawDoor>,
    destination_point: Option<DVec2>,
}

/// Slack, in metres, for a door midpoint to count as on a wall.
const WALL_TOLERANCE: f64 = 1e-6;

/// `true` if `p` is inside `polygon` and within [`WALL_TOLERANCE`] of one of
/// its edges.
fn on_wall(polygon: &ConvexPolygon, p: DVec2) -> bool {
    let v = polygon.vertices();
    let n = v.len();
    let mut nearest = f64::INFINITY;
    for i in 0..n {
        let (a, b) = (v[i], v[(i + 1) % n]);
        let length = a.distance(b);
        if length == 0.0 {
            continue;
        }
        let inward = (b - a).perp_dot(p - a) / length;
        if inward < -WALL_TOLERANCE {
            return false;
        }
        nearest = nearest.min(inward);
    }
    nearest <= WALL_TOLERANCE
}

struct RawDoor {
    from:    RoomId,
    to:      RoomId,
    segment: Segment,
    /// Index of the undirected door this direction belongs to.
    pair:    usize,
}

impl RoomGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a room and return its `RoomId` (sequential from 0).
    pub fn add_room(&mut self, polygon: ConvexPolygon) -> RoomId {
        let id = RoomId(self.rooms.len() as u32);
        self.rooms.push(polygon);
        id
    }

    /// Connect `a` and `b` through `segment`, walkable both ways.
    ///
    /// The segment's midpoint is the waypoint agents walk to, so it must lie
    /// on a wall of both rooms.
    ///
    /// # Errors
    ///
    /// - [`NavError::RoomNotFound`] if either room hasn't been added yet.
    /// - [`NavError::DoorOffWall`] if the midpoint is not on the boundary of
    ///   both rooms.
    pub fn add_door(&mut self, a: RoomId, b: RoomId, segment: Segment) -> NavResult<()> {
        for room in [a, b] {
            if room.index() >= self.rooms.len() {
                return Err(NavError::RoomNotFound(room));
            }
        }
        let midpoint = segment.midpoint();
        if ![a, b].iter().all(|r| on_wall(&self.rooms[r.index()], midpoint)) {
            return Err(NavError::DoorOffWall { a, b, midpoint });
        }
        let pair = self.raw_doors.len() / 2;
        self.raw_doors.push(RawDoor { from: a, to: b, segment, pair });
        self.raw_doors.push(RawDoor { from: b, to: a, segment, pair });
        Ok(())
    }

    /// Where agents in the destination room finally walk to.  Without one,
    /// reaching the destination room ends navigation.
    pub fn destination_point(mut self, point: DVec2) -> Self {
        self.destination_point = Some(point);
        self
    }

    pub fn room_count(&self) -> usize { self.rooms.len() }
    pub fn door_count(&self) -> usize { self.raw_doors.len() }

    /// Consume the builder and route every room toward `destination`.
    ///
    /// # Errors
    ///
    /// - [`NavError::RoomNotFound`] if `destination` isn't a room.
    /// - [`NavError::InvalidDestination`] if the destination point lies
    ///   outside the destination room.
    pub fn build(self, destination: RoomId) -> NavResult<RoomGraph> {
        let Some(dest_polygon) = self.rooms.get(destination.index()) else {
            return Err(NavError::RoomNotFound(destination));
        };
        if let Some(point) = self.destination_point {
            if !dest_polygon.contains(point) {
                return Err(NavError::InvalidDestination { room: destination, point });
            }
        }

        let room_count = self.rooms.len();
        let door_count = self.raw_doors.len();

        // Stable sort keeps doors out of one room in insertion order.
        let mut raw = self.raw_doors;
        raw.sort_by_key(|d| d.from.0);

        let door_from:    Vec<RoomId>  = raw.iter().map(|d| d.from).collect();
        let door_to:      Vec<RoomId>  = raw.iter().map(|d| d.to).collect();
        let door_segment: Vec<Segment> = raw.iter().map(|d| d.segment).collect();

        // Twin lookup: both directions of an undirected door share `pair`.
        let mut first_of_pair = vec![DoorId::INVALID; door_count / 2];
        let mut door_reverse  = vec![DoorId::INVALID; door_count];
        for (i, d) in raw.iter().enumerate() {
            let id = DoorId(i as u32);
            let twin = first_of_pair[d.pair];
            if twin == DoorId::INVALID {
                first_of_pair[d.pair] = id;
            } else {
                door_reverse[i] = twin;
                door_reverse[twin.index()] = id;
            }
        }

        let mut room_out_start = vec![0u32; room_count + 1];
        for d in &raw {
            room_out_start[d.from.index() + 1] += 1;
        }
        for i in 1..=room_count {
            room_out_start[i] += room_out_start[i - 1];
        }
        debug_assert_eq!(room_out_start[room_count] as usize, door_count);

        let entries: Vec<RoomEntry> = self
            .rooms
            .iter()
            .enumerate()
            .map(|(i, polygon)| {
                let (min, max) = polygon.bounds();
                RoomEntry {
                    envelope: AABB::from_corners(min.to_array(), max.to_array()),
                    id:       RoomId(i as u32),
                }
            })
            .collect();
        let room_idx = RTree::bulk_load(entries);

        let mut graph = RoomGraph {
            rooms: self.rooms,
            room_out_start,
            door_from,
            door_to,
            door_segment,
            door_reverse,
            destination,
            destination_point: self.destination_point,
            hops: NextHops::unreachable(room_count),
            room_idx,
        };
        graph.hops = route::next_hops(&graph, destination);

        debug!(
            rooms = room_count,
            doors = door_count / 2,
            reachable = graph.hops.reachable_count(),
            %destination,
            "room graph built"
        );
        Ok(graph)
    }
}
