//! Shortest routes to the destination room.
//!
//! # Algorithm
//!
//! One Dijkstra run *from* the destination over the door graph.  Doors are
//! symmetric, so the shortest route from the destination to room `r`, walked
//! backwards, is the shortest route from `r` to the destination.  When the
//! search settles `r` through door `d` (`prev → r`), the door `r` should take
//! is `d` reversed.  One run therefore yields the next door for every room.
//!
//! # Cost units
//!
//! Costs are integer **millimetres** so the heap ordering is exact and ties
//! break on `RoomId` alone, which keeps routes identical across platforms.
//! A door's cost is the walk from the centroid of the room it leaves to the
//! door midpoint, plus the walk on to the centroid of the room it enters.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ped_core::{DoorId, RoomId};

use crate::rooms::RoomGraph;

/// Per-room next door toward the destination.
#[derive(Clone, Debug, PartialEq)]
pub struct NextHops {
    /// `DoorId::INVALID` for the destination itself and unreachable rooms.
    next_door: Vec<DoorId>,
    /// `u64::MAX` for unreachable rooms.
    cost_mm:   Vec<u64>,
}

impl NextHops {
    /// Every room unreachable.
    pub fn unreachable(room_count: usize) -> Self {
        Self {
            next_door: vec![DoorId::INVALID; room_count],
            cost_mm:   vec![u64::MAX; room_count],
        }
    }

    pub fn next_door(&self, room: RoomId) -> Option<DoorId> {
        self.next_door
            .get(room.index())
            .copied()
            .filter(|&d| d != DoorId::INVALID)
    }

    pub fn cost_mm(&self, room: RoomId) -> Option<u64> {
        self.cost_mm
            .get(room.index())
            .copied()
            .filter(|&c| c != u64::MAX)
    }

    pub fn reachable_count(&self) -> usize {
        self.cost_mm.iter().filter(|&&c| c != u64::MAX).count()
    }
}

// ── Costs ─────────────────────────────────────────────────────────────────────

#[inline]
pub(crate) fn metres_to_mm(m: f64) -> u64 {
    (m * 1000.0).round() as u64
}

#[inline]
pub(crate) fn mm_to_metres(mm: u64) -> f64 {
    mm as f64 / 1000.0
}

/// Cost of walking through `door`, in millimetres.
pub fn door_cost_mm(graph: &RoomGraph, door: DoorId) -> u64 {
    let i = door.index();
    let mid = graph.door_segment[i].midpoint();
    let from = graph.rooms[graph.door_from[i].index()].centroid();
    let to = graph.rooms[graph.door_to[i].index()].centroid();
    metres_to_mm(from.distance(mid) + mid.distance(to))
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Route every room of `graph` toward `destination`.
pub fn next_hops(graph: &RoomGraph, destination: RoomId) -> NextHops {
    let mut hops = NextHops::unreachable(graph.room_count());
    if destination.index() >= graph.room_count() {
        return hops;
    }
    hops.cost_mm[destination.index()] = 0;

    // Min-heap: (cost, room).  Reverse makes BinaryHeap (max) a min-heap;
    // the RoomId secondary key makes tie-breaking deterministic.
    let mut heap: BinaryHeap<Reverse<(u64, RoomId)>> = BinaryHeap::new();
    heap.push(Reverse((0, destination)));

    while let Some(Reverse((cost, room))) = heap.pop() {
        // Skip stale heap entries.
        if cost > hops.cost_mm[room.index()] {
            continue;
        }
        for door in graph.out_doors(room) {
            let neighbor = graph.door_to[door.index()];
            let new_cost = cost.saturating_add(door_cost_mm(graph, door));
            if new_cost < hops.cost_mm[neighbor.index()] {
                hops.cost_mm[neighbor.index()] = new_cost;
                hops.next_door[neighbor.index()] = graph.door_reverse[door.index()];
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }
    hops
}
