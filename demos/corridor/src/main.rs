//! corridor — evacuate a grid of pedestrians from a hall, through a narrow
//! corridor, into an exit room.
//!
//! Usage: `corridor [scenario.json]`.  Without an argument the bundled
//! scenario is used.  Set `RUST_LOG=debug` for per-tick logging.

mod scenario;

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use ped_core::{AgentId, DVec2, RoomId, Tick};
use ped_env::Environment;
use ped_nav::{NavigationGraph, RoomGraph};
use ped_sim::{SimBuilder, SimObserver, TrajectoryRecorder};

use scenario::{DEFAULT_SCENARIO, Scenario};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Rows printed in the final table.
const TABLE_ROWS: usize = 12;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Counts moves per tick and keeps trajectories at every snapshot.
#[derive(Default)]
struct Progress {
    trajectories: TrajectoryRecorder,
    moves:        usize,
    idle_ticks:   u64,
}

impl SimObserver for Progress {
    fn on_tick_end(&mut self, _tick: Tick, moved: usize) {
        self.moves += moved;
        if moved == 0 {
            self.idle_ticks += 1;
        }
    }

    fn on_snapshot(&mut self, tick: Tick, env: &Environment) {
        self.trajectories.on_snapshot(tick, env);
        info!(tick = tick.0, moves = self.moves, "snapshot");
    }
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    // ── 1. Load scenario ──────────────────────────────────────────────────
    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => DEFAULT_SCENARIO.to_owned(),
    };
    let scenario = Scenario::from_json(&text)?;

    // ── 2. Building and crowd ─────────────────────────────────────────────
    let graph = scenario.build_graph()?;
    let (env, placement) = scenario.populate()?;
    println!(
        "Building: {} rooms, {} doors.  Crowd: {} placed, {} skipped.",
        graph.room_count(),
        graph.door_count() / 2,
        placement.placed.len(),
        placement.skipped.len(),
    );
    let starts: Vec<(AgentId, DVec2)> = placement
        .placed
        .iter()
        .filter_map(|&id| env.get_position(id).map(|p| (id, p)))
        .collect();

    // ── 3. Steering ───────────────────────────────────────────────────────
    let mut builder = SimBuilder::new(scenario.sim.clone(), env, graph);
    for &id in &placement.placed {
        builder = builder.agent(id, scenario.steering()?);
    }
    let mut sim = builder.build()?;

    // ── 4. Run ────────────────────────────────────────────────────────────
    let mut progress = Progress::default();
    let started = Instant::now();
    sim.run(&mut progress)?;
    let elapsed = started.elapsed();

    // ── 5. Summary ────────────────────────────────────────────────────────
    let exit = sim.nav.destination();
    let arrived = sim
        .env
        .node_ids()
        .filter(|&id| arrived_in(&sim.nav, &sim.env, id, exit))
        .count();

    println!();
    println!("=== Run complete in {:.2?} ===", elapsed);
    println!("  final tick:   {}", sim.clock);
    println!("  moves:        {}", progress.moves);
    println!("  idle ticks:   {}", progress.idle_ticks);
    println!("  in exit room: {arrived} / {}", sim.env.node_count());
    println!();
    println!("{:<10} {:>16} {:>16} {:>8} {:>10}", "agent", "start", "final", "room", "walked m");
    for &(id, start) in starts.iter().take(TABLE_ROWS) {
        let Some(end) = sim.env.get_position(id) else { continue };
        let room = sim
            .nav
            .current_room(end)
            .map_or_else(|| "-".to_owned(), |r| r.0.to_string());
        println!(
            "{:<10} {:>16} {:>16} {:>8} {:>10.2}",
            id.to_string(),
            format!("({:.2}, {:.2})", start.x, start.y),
            format!("({:.2}, {:.2})", end.x, end.y),
            room,
            walked(&progress.trajectories, id),
        );
    }
    if starts.len() > TABLE_ROWS {
        println!("  ... {} more", starts.len() - TABLE_ROWS);
    }

    Ok(())
}

fn arrived_in(graph: &RoomGraph, env: &Environment, agent: AgentId, room: RoomId) -> bool {
    env.get_position(agent)
        .and_then(|p| graph.current_room(p))
        .is_some_and(|r| r == room)
}

/// Path length between consecutive snapshots.
fn walked(trajectories: &TrajectoryRecorder, agent: AgentId) -> f64 {
    trajectories
        .path_of(agent)
        .windows(2)
        .map(|w| w[0].distance(w[1]))
        .sum()
}
