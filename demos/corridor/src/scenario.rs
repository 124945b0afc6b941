//! Scenario file: building plan, crowd, and steering parameters.
//!
//! Points are plain coordinate lists so a malformed file (a point with
//! three coordinates, say) is rejected while loading, before anything runs.

use anyhow::{Context, Result};
use serde::Deserialize;

use ped_core::{ConvexPolygon, DVec2, RoomId, Segment, Shape, SimConfig, SimRng, make_position};
use ped_env::{Environment, Grid, NodeSpec, Placement, deploy};
use ped_nav::{RoomGraph, RoomGraphBuilder};
use ped_steering::{Nearest, OrientingSteering, Separation, Wander, Weighted};

/// The scenario shipped with the demo.
pub const DEFAULT_SCENARIO: &str = include_str!("../scenario.json");

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub sim:         SimConfig,
    /// Convex rooms, one vertex list each.
    pub rooms:       Vec<Vec<Vec<f64>>>,
    pub doors:       Vec<DoorSpec>,
    pub destination: DestinationSpec,
    pub crowd:       CrowdSpec,
    pub steering:    SteeringSpec,
}

#[derive(Debug, Deserialize)]
pub struct DoorSpec {
    pub rooms: [u32; 2],
    pub from:  Vec<f64>,
    pub to:    Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct DestinationSpec {
    pub room:  u32,
    pub point: Vec<f64>,
}

/// A grid of identical circular pedestrians.
#[derive(Debug, Deserialize)]
pub struct CrowdSpec {
    pub min:    Vec<f64>,
    pub max:    Vec<f64>,
    pub step:   Vec<f64>,
    pub jitter: f64,
    pub radius: f64,
    pub speed:  f64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Weighted,
    Nearest,
}

#[derive(Debug, Deserialize)]
pub struct SteeringSpec {
    pub strategy:         StrategyKind,
    pub separation_range: f64,
    pub wander_jitter:    f64,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(text).context("parsing scenario")?;
        scenario.sim.validate()?;
        Ok(scenario)
    }

    pub fn build_graph(&self) -> Result<RoomGraph> {
        let mut b = RoomGraphBuilder::new();
        for (i, vertices) in self.rooms.iter().enumerate() {
            let points = vertices
                .iter()
                .map(|v| make_position(v))
                .collect::<Result<Vec<DVec2>, _>>()
                .with_context(|| format!("room {i}"))?;
            b.add_room(ConvexPolygon::new(points).with_context(|| format!("room {i}"))?);
        }
        for door in &self.doors {
            let segment = Segment::new(make_position(&door.from)?, make_position(&door.to)?);
            b.add_door(RoomId(door.rooms[0]), RoomId(door.rooms[1]), segment)?;
        }
        let point = make_position(&self.destination.point).context("destination point")?;
        Ok(b.destination_point(point).build(RoomId(self.destination.room))?)
    }

    /// A physics environment holding the crowd.
    pub fn populate(&self) -> Result<(Environment, Placement)> {
        let c = &self.crowd;
        let grid = Grid::new(make_position(&c.min)?, make_position(&c.max)?, make_position(&c.step)?, c.jitter)?;
        let spec = NodeSpec::new(Shape::circle(c.radius)?).with_speed(c.speed);

        let mut env = Environment::physics();
        let mut rng = SimRng::new(self.sim.seed);
        let placement = deploy(&mut env, &grid, &spec, &mut rng)?;
        Ok((env, placement))
    }

    pub fn steering(&self) -> Result<OrientingSteering> {
        let s = &self.steering;
        let base = match s.strategy {
            StrategyKind::Weighted => OrientingSteering::new(Weighted::distance_weighted()),
            StrategyKind::Nearest => OrientingSteering::new(Nearest),
        };
        Ok(base
            .with_behavior(Separation::new(s.separation_range)?)
            .with_behavior(Wander::new(s.wander_jitter)?))
    }
}
