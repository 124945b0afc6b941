//! The `Environment`: agent positions, headings, and shapes in continuous 2D.
//!
//! # Proximity queries
//!
//! [`Environment::get_nodes_within`] is two-phase.  The broad phase asks the
//! R-tree for every agent whose position is within
//! `(shape.diameter + largest_shape_diameter) / 2` of the query centroid:
//! two shapes can only touch if their centroids are closer than the sum of
//! their circumradii, and the largest diameter bounds every agent's.  The
//! narrow phase keeps only agents whose placed shape really intersects.
//!
//! # Largest diameter bookkeeping
//!
//! Adding an agent is O(1) (`max`).  Removing the agent that holds the
//! maximum (or ties it) rescans the remaining agents, O(n).

use tracing::{debug, trace};

use ped_core::{AgentId, DVec2, PlacedShape, Shape};

use crate::{AgentArena, AgentRecord, EnvError, EnvResult, SpatialIndex};

/// Default walking speed of a pedestrian, metres per second.
pub const DEFAULT_WALKING_SPEED: f64 = 1.4;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Which physical rules the environment enforces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum EnvironmentKind {
    /// Shapes are solid: admissions, moves, and rotations that would overlap
    /// another agent are refused.
    #[default]
    Physics,
    /// Plain Euclidean space: shapes are only used for queries, every move
    /// succeeds.
    Euclidean,
}

/// How agents' neighbourhoods are derived from their positions.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum LinkingRule {
    #[default]
    NoLinks,
    /// Agents whose positions are within this distance are neighbours.
    ConnectWithinDistance(f64),
}

/// Description of an agent to add.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSpec {
    pub shape:   Shape,
    pub heading: DVec2,
    /// Metres per simulated second.
    pub speed:   f64,
}

impl Default for NodeSpec {
    fn default() -> Self {
        Self {
            shape:   Shape::Adimensional,
            heading: DVec2::ZERO,
            speed:   DEFAULT_WALKING_SPEED,
        }
    }
}

impl NodeSpec {
    pub fn new(shape: Shape) -> Self {
        Self { shape, ..Self::default() }
    }

    pub fn with_heading(mut self, heading: DVec2) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }
}

// ── Environment ───────────────────────────────────────────────────────────────

/// Owns every agent's spatial state.
///
/// All mutation goes through methods that leave the no-overlap invariant
/// intact on return; there is no way to observe a half-applied move.
pub struct Environment {
    kind:                   EnvironmentKind,
    linking:                LinkingRule,
    arena:                  AgentArena,
    index:                  SpatialIndex,
    largest_shape_diameter: f64,
}

impl Environment {
    pub fn new(kind: EnvironmentKind) -> Self {
        Self {
            kind,
            linking:                LinkingRule::NoLinks,
            arena:                  AgentArena::new(),
            index:                  SpatialIndex::new(),
            largest_shape_diameter: 0.0,
        }
    }

    /// Shape-aware environment enforcing the no-overlap invariant.
    pub fn physics() -> Self {
        Self::new(EnvironmentKind::Physics)
    }

    /// Environment without collisions.
    pub fn euclidean() -> Self {
        Self::new(EnvironmentKind::Euclidean)
    }

    /// Replace the linking rule and recompute every neighbourhood.
    pub fn with_linking_rule(mut self, rule: LinkingRule) -> Self {
        self.linking = rule;
        let ids: Vec<AgentId> = self.arena.ids().collect();
        for id in ids {
            self.relink(id);
        }
        self
    }

    // ── Read accessors ────────────────────────────────────────────────────

    pub fn kind(&self) -> EnvironmentKind {
        self.kind
    }

    pub fn linking_rule(&self) -> LinkingRule {
        self.linking
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.arena.get(agent).is_some()
    }

    /// Live agents in ascending id order.
    pub fn node_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.arena.ids()
    }

    /// Upper bound on the diameter of every present agent's shape.
    pub fn largest_shape_diameter(&self) -> f64 {
        self.largest_shape_diameter
    }

    pub fn get_position(&self, agent: AgentId) -> Option<DVec2> {
        self.arena.get(agent).map(|r| r.position)
    }

    /// Unit heading, or zero if the agent never turned.
    pub fn get_heading(&self, agent: AgentId) -> Option<DVec2> {
        self.arena.get(agent).map(|r| r.heading)
    }

    pub fn get_speed(&self, agent: AgentId) -> Option<f64> {
        self.arena.get(agent).map(|r| r.speed)
    }

    /// The agent's shape at its current position and heading.  Shapeless
    /// agents report an adimensional point.
    pub fn get_shape(&self, agent: AgentId) -> Option<PlacedShape> {
        self.arena.get(agent).map(AgentRecord::placed_shape)
    }

    /// Neighbours under the current linking rule, sorted by id.
    pub fn neighborhood(&self, agent: AgentId) -> &[AgentId] {
        self.arena.get(agent).map(|r| r.neighbors.as_slice()).unwrap_or(&[])
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Agents whose position is within `range` of `center`, sorted by id.
    pub fn nodes_within_range(&self, center: DVec2, range: f64) -> Vec<AgentId> {
        self.index.within_range(center, range)
    }

    /// Agents whose placed shape intersects `shape`, sorted by id.
    pub fn get_nodes_within(&self, shape: &PlacedShape) -> Vec<AgentId> {
        let reach = shape.diameter() + self.largest_shape_diameter;
        if reach <= 0.0 {
            return Vec::new();
        }
        self.index
            .within_range(shape.centroid(), reach / 2.0)
            .into_iter()
            .filter(|&id| {
                self.arena
                    .get(id)
                    .is_some_and(|r| shape.intersects(&r.placed_shape()))
            })
            .collect()
    }

    /// `true` if `agent`, keeping its heading, could stand at `position`
    /// without overlapping anyone else.
    pub fn can_fit(&self, agent: AgentId, position: DVec2) -> bool {
        self.arena
            .get(agent)
            .is_some_and(|r| self.fits(agent, &r.placed_shape().with_origin(position)))
    }

    fn fits(&self, agent: AgentId, candidate: &PlacedShape) -> bool {
        match self.kind {
            EnvironmentKind::Euclidean => true,
            EnvironmentKind::Physics => self
                .get_nodes_within(candidate)
                .into_iter()
                .all(|other| other == agent),
        }
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Admit a new agent at `position`.
    ///
    /// # Errors
    ///
    /// - [`EnvError::CouldNotPlace`] if its shape would overlap an agent
    ///   already present (physics environments only).
    /// - [`EnvError::InvalidPosition`], [`EnvError::InvalidSpeed`], or a
    ///   wrapped shape error for malformed input.
    pub fn add_node(&mut self, spec: NodeSpec, position: DVec2) -> EnvResult<AgentId> {
        let shape = spec.shape.require_compatible()?;
        if !(spec.speed.is_finite() && spec.speed >= 0.0) {
            return Err(EnvError::InvalidSpeed(spec.speed));
        }
        if !position.is_finite() {
            return Err(EnvError::InvalidPosition(position));
        }

        let heading = spec.heading.normalize_or_zero();
        if self.kind == EnvironmentKind::Physics
            && !self.get_nodes_within(&shape.placed(position, heading)).is_empty()
        {
            debug!(%position, "admission refused: overlaps an existing agent");
            return Err(EnvError::CouldNotPlace(position));
        }

        let id = self.arena.insert(AgentRecord {
            shape,
            position,
            heading,
            speed: spec.speed,
            neighbors: Vec::new(),
        });
        self.index.insert(id, position);
        self.largest_shape_diameter = self.largest_shape_diameter.max(shape.diameter());
        self.relink(id);
        trace!(%id, %position, "agent added");
        Ok(id)
    }

    /// Remove `agent` and unlink it from its neighbours.
    ///
    /// # Errors
    ///
    /// [`EnvError::AgentNotFound`] if the handle is unknown or already removed.
    pub fn remove_node(&mut self, agent: AgentId) -> EnvResult<()> {
        let record = self.arena.remove(agent).ok_or(EnvError::AgentNotFound(agent))?;
        self.index.remove(agent, record.position);
        for n in &record.neighbors {
            if let Some(other) = self.arena.get_mut(*n) {
                other.neighbors.retain(|&x| x != agent);
            }
        }

        let diameter = record.shape.diameter();
        if diameter > 0.0 && self.largest_shape_diameter <= diameter {
            self.largest_shape_diameter = self
                .arena
                .records()
                .map(|(_, r)| r.shape.diameter())
                .fold(0.0, f64::max);
            debug!(
                removed = diameter,
                largest = self.largest_shape_diameter,
                "largest shape diameter rescanned"
            );
        }
        Ok(())
    }

    /// Move `agent` to `position` if it fits there.
    ///
    /// Returns `false` (and changes nothing) when the move would overlap
    /// another agent, the target is not finite, or the agent is unknown.
    pub fn move_node_to_position(&mut self, agent: AgentId, position: DVec2) -> bool {
        let Some(record) = self.arena.get(agent) else {
            return false;
        };
        if !position.is_finite() {
            trace!(%agent, %position, "move refused: non-finite target");
            return false;
        }
        let old = record.position;
        if !self.fits(agent, &record.placed_shape().with_origin(position)) {
            trace!(%agent, %position, "move refused: would overlap");
            return false;
        }

        self.index.remove(agent, old);
        self.index.insert(agent, position);
        if let Some(record) = self.arena.get_mut(agent) {
            record.position = position;
        }
        self.relink(agent);
        true
    }

    /// Move `agent` by `delta`; same rules as [`move_node_to_position`](Self::move_node_to_position).
    pub fn move_node(&mut self, agent: AgentId, delta: DVec2) -> bool {
        match self.get_position(agent) {
            Some(position) => self.move_node_to_position(agent, position + delta),
            None => false,
        }
    }

    /// Turn `agent` to face `direction` (normalised; zero clears the heading).
    ///
    /// Returns `false` and keeps the old heading if the rotated shape would
    /// overlap another agent at the current position.
    pub fn set_heading(&mut self, agent: AgentId, direction: DVec2) -> bool {
        let Some(record) = self.arena.get(agent) else {
            return false;
        };
        let heading = direction.normalize_or_zero();
        if !self.fits(agent, &record.placed_shape().with_heading(heading)) {
            trace!(%agent, %heading, "rotation refused: would overlap");
            return false;
        }
        if let Some(record) = self.arena.get_mut(agent) {
            record.heading = heading;
        }
        true
    }

    /// Recompute `agent`'s neighbour list and patch the lists of the agents
    /// it leaves and joins.
    fn relink(&mut self, agent: AgentId) {
        let Some(record) = self.arena.get_mut(agent) else {
            return;
        };
        let position = record.position;
        let old = std::mem::take(&mut record.neighbors);
        for n in old {
            if let Some(other) = self.arena.get_mut(n) {
                other.neighbors.retain(|&x| x != agent);
            }
        }

        let fresh: Vec<AgentId> = match self.linking {
            LinkingRule::NoLinks => Vec::new(),
            LinkingRule::ConnectWithinDistance(range) => self
                .index
                .within_range(position, range)
                .into_iter()
                .filter(|&n| n != agent)
                .collect(),
        };
        for &n in &fresh {
            if let Some(other) = self.arena.get_mut(n) {
                if let Err(slot) = other.neighbors.binary_search(&agent) {
                    other.neighbors.insert(slot, agent);
                }
            }
        }
        if let Some(record) = self.arena.get_mut(agent) {
            record.neighbors = fresh;
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::physics()
    }
}
