//! Agent storage: one record per agent, addressed by a stable integer handle.
//!
//! Position, heading, and the derived neighbour list are plain fields on the
//! record, so every lookup is an indexed `Vec` access rather than a map
//! probe.  Removed agents leave a `None` tombstone; handles are never reused.

use ped_core::{AgentId, DVec2, PlacedShape, Shape};

/// Everything the environment knows about one agent.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentRecord {
    /// Untransformed footprint.
    pub shape: Shape,

    pub position: DVec2,

    /// Unit vector, or zero for "no heading yet".
    pub heading: DVec2,

    /// Walking speed in metres per simulated second.
    pub speed: f64,

    /// Agents linked to this one by the environment's linking rule, sorted
    /// by id.  Recomputed whenever this agent or a nearby one moves.
    pub neighbors: Vec<AgentId>,
}

impl AgentRecord {
    /// The footprint at the agent's current position and heading.
    #[inline]
    pub fn placed_shape(&self) -> PlacedShape {
        self.shape.placed(self.position, self.heading)
    }
}

/// Slot arena of [`AgentRecord`]s.
#[derive(Default)]
pub struct AgentArena {
    slots: Vec<Option<AgentRecord>>,
    live:  usize,
}

impl AgentArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live agents.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Store `record` and return its fresh handle.
    pub fn insert(&mut self, record: AgentRecord) -> AgentId {
        let id = AgentId(self.slots.len() as u32);
        self.slots.push(Some(record));
        self.live += 1;
        id
    }

    /// Take the record out, leaving a tombstone.
    pub fn remove(&mut self, agent: AgentId) -> Option<AgentRecord> {
        let record = self.slots.get_mut(agent.index())?.take()?;
        self.live -= 1;
        Some(record)
    }

    #[inline]
    pub fn get(&self, agent: AgentId) -> Option<&AgentRecord> {
        self.slots.get(agent.index())?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut AgentRecord> {
        self.slots.get_mut(agent.index())?.as_mut()
    }

    /// Live records in ascending id order.
    pub fn records(&self) -> impl Iterator<Item = (AgentId, &AgentRecord)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|r| (AgentId(i as u32), r)))
    }

    /// Live ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.records().map(|(id, _)| id)
    }
}
