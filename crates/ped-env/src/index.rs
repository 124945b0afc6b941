//! R-tree broad phase over agent positions.
//!
//! The index stores each agent as a point.  Range queries return every agent
//! whose *position* is within the radius; the environment widens the radius
//! by the largest footprint so that no true overlap is missed, then filters
//! with the exact shape test.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use ped_core::{AgentId, DVec2};

/// Entry stored in the R-tree: a 2-D point with the owning agent.
#[derive(Clone, Debug, PartialEq)]
struct AgentEntry {
    point: [f64; 2],
    id:    AgentId,
}

impl AgentEntry {
    fn new(id: AgentId, position: DVec2) -> Self {
        Self { point: position.to_array(), id }
    }
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Dynamic point index keyed by [`AgentId`].
pub struct SpatialIndex {
    tree: RTree<AgentEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    pub fn insert(&mut self, id: AgentId, position: DVec2) {
        self.tree.insert(AgentEntry::new(id, position));
    }

    /// Remove the entry for `id` stored at exactly `position`.
    pub fn remove(&mut self, id: AgentId, position: DVec2) -> bool {
        self.tree.remove(&AgentEntry::new(id, position)).is_some()
    }

    /// Agents whose position lies within `range` of `center` (boundary
    /// inclusive), sorted by id so callers iterate deterministically.
    pub fn within_range(&self, center: DVec2, range: f64) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self
            .tree
            .locate_within_distance(center.to_array(), range * range)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
