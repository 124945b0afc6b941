//! Integration tests for ped-sim.

use ped_core::{AgentId, DVec2, Shape, SimConfig, SimRng, Tick};
use ped_env::{Circle, Environment, NodeSpec, deploy};
use ped_nav::{FixedTarget, NoNavigation};
use ped_steering::{OrientingSteering, Separation, Wander, Weighted};

use crate::{NoopObserver, SimBuilder, SimObserver, TrajectoryRecorder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig {
        tick_duration_secs:    1.0,
        total_ticks,
        seed:                  42,
        output_interval_ticks: 1,
    }
}

fn disc(radius: f64) -> NodeSpec {
    NodeSpec::new(Shape::circle(radius).unwrap())
}

fn plain() -> OrientingSteering {
    OrientingSteering::new(Weighted::distance_weighted())
}

fn jostling() -> OrientingSteering {
    plain()
        .with_behavior(Wander::new(0.5).unwrap())
        .with_behavior(Separation::new(1.0).unwrap())
}

/// Twenty walkers scattered in a disc of radius 6.  The deployment seed is
/// fixed so only the run seed varies between crowds.
fn crowd() -> Environment {
    let mut env = Environment::physics();
    let circle = Circle::new(DVec2::ZERO, 6.0, 20).unwrap();
    deploy(&mut env, &circle, &disc(0.25), &mut SimRng::new(7)).unwrap();
    env
}

fn run_crowd(seed: u64, ticks: u64) -> TrajectoryRecorder {
    let config = SimConfig { seed, ..test_config(ticks) };
    let mut sim = SimBuilder::new(config, crowd(), FixedTarget(DVec2::new(20.0, 0.0)))
        .all_agents(|_| jostling())
        .build()
        .unwrap();
    let mut recorder = TrajectoryRecorder::new();
    sim.run(&mut recorder).unwrap();
    recorder
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use ped_core::CoreError;

    use super::*;
    use crate::SimError;

    #[test]
    fn builds_with_registered_agents() {
        let mut env = Environment::physics();
        let a = env.add_node(disc(0.3), DVec2::ZERO).unwrap();
        let b = env.add_node(disc(0.3), DVec2::new(2.0, 0.0)).unwrap();
        let sim = SimBuilder::new(test_config(5), env, NoNavigation)
            .agent(b, plain())
            .agent(a, plain())
            .build()
            .unwrap();
        let ids: Vec<AgentId> = sim.pilots.iter().map(|p| p.agent).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn invalid_config_errors() {
        let config = SimConfig { tick_duration_secs: 0.0, ..test_config(5) };
        let result = SimBuilder::new(config, Environment::physics(), NoNavigation).build();
        assert!(matches!(result, Err(SimError::Core(CoreError::Config(_)))));
    }

    #[test]
    fn unknown_agent_errors() {
        let result = SimBuilder::new(test_config(5), Environment::physics(), NoNavigation)
            .agent(AgentId(4), plain())
            .build();
        assert!(matches!(result, Err(SimError::AgentNotFound(AgentId(4)))));
    }

    #[test]
    fn duplicate_agent_errors() {
        let mut env = Environment::physics();
        let a = env.add_node(disc(0.3), DVec2::ZERO).unwrap();
        let result = SimBuilder::new(test_config(5), env, NoNavigation)
            .all_agents(|_| plain())
            .agent(a, plain())
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }
}

// ── Basic run ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        starts:    usize,
        ends:      usize,
        snapshots: Vec<Tick>,
        moved:     Vec<usize>,
        finished:  Option<Tick>,
    }

    impl SimObserver for Counter {
        fn on_tick_start(&mut self, _t: Tick) { self.starts += 1; }
        fn on_tick_end(&mut self, _t: Tick, moved: usize) {
            self.ends += 1;
            self.moved.push(moved);
        }
        fn on_snapshot(&mut self, t: Tick, _env: &Environment) { self.snapshots.push(t); }
        fn on_sim_end(&mut self, t: Tick) { self.finished = Some(t); }
    }

    #[test]
    fn runs_to_end_tick() {
        let mut sim = SimBuilder::new(test_config(10), Environment::physics(), NoNavigation)
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.clock.current_tick, Tick(10));
    }

    #[test]
    fn observer_called_correct_number_of_times() {
        let config = SimConfig { output_interval_ticks: 2, ..test_config(10) };
        let mut sim = SimBuilder::new(config, Environment::physics(), NoNavigation)
            .build()
            .unwrap();
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.starts, 10);
        assert_eq!(obs.ends, 10);
        assert_eq!(obs.snapshots, vec![Tick(0), Tick(2), Tick(4), Tick(6), Tick(8)]);
        assert_eq!(obs.finished, Some(Tick(10)));
    }

    #[test]
    fn zero_interval_disables_snapshots() {
        let config = SimConfig { output_interval_ticks: 0, ..test_config(4) };
        let mut sim = SimBuilder::new(config, Environment::physics(), NoNavigation)
            .build()
            .unwrap();
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();
        assert!(obs.snapshots.is_empty());
    }

    #[test]
    fn run_ticks_ignores_end_tick() {
        let mut sim = SimBuilder::new(test_config(2), Environment::physics(), NoNavigation)
            .build()
            .unwrap();
        let mut obs = Counter::default();
        sim.run_ticks(5, &mut obs).unwrap();
        assert_eq!(sim.clock.current_tick, Tick(5));
        assert_eq!(obs.ends, 5);
        assert_eq!(obs.finished, None);
    }

    #[test]
    fn moved_count_reported() {
        let mut env = Environment::physics();
        let walker = env.add_node(disc(0.3).with_speed(1.0), DVec2::ZERO).unwrap();
        let mut sim = SimBuilder::new(test_config(5), env, FixedTarget(DVec2::new(3.0, 0.0)))
            .agent(walker, plain())
            .build()
            .unwrap();
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.moved, vec![1, 1, 1, 0, 0]);
    }
}

// ── Navigation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod navigation_tests {
    use ped_core::{ConvexPolygon, Segment};
    use ped_nav::RoomGraphBuilder;

    use super::*;

    #[test]
    fn walks_through_door_to_destination() {
        let mut b = RoomGraphBuilder::new();
        let hall = b.add_room(ConvexPolygon::rectangle(DVec2::new(0.0, 0.0), DVec2::new(10.0, 4.0)).unwrap());
        let exit = b.add_room(ConvexPolygon::rectangle(DVec2::new(10.0, 0.0), DVec2::new(20.0, 4.0)).unwrap());
        b.add_door(hall, exit, Segment::new(DVec2::new(10.0, 1.0), DVec2::new(10.0, 3.0))).unwrap();
        let graph = b.destination_point(DVec2::new(15.0, 2.0)).build(exit).unwrap();

        let mut env = Environment::physics();
        let walker = env.add_node(disc(0.3), DVec2::new(2.0, 2.0)).unwrap();
        let mut sim = SimBuilder::new(test_config(15), env, graph)
            .agent(walker, plain())
            .build()
            .unwrap();
        let mut recorder = TrajectoryRecorder::new();
        sim.run(&mut recorder).unwrap();

        assert_eq!(sim.env.get_position(walker), Some(DVec2::new(15.0, 2.0)));
        let path = recorder.path_of(walker);
        assert!(path.contains(&DVec2::new(10.0, 2.0)), "passes the door midpoint");
        assert!(path.iter().all(|p| p.y == 2.0), "no lateral drift");
    }

    #[test]
    fn unsteered_agents_are_obstacles() {
        let mut env = Environment::physics();
        let walker = env.add_node(disc(0.3).with_speed(1.0), DVec2::ZERO).unwrap();
        let post = env.add_node(disc(0.3), DVec2::new(3.0, 0.0)).unwrap();
        let mut sim = SimBuilder::new(test_config(10), env, FixedTarget(DVec2::new(6.0, 0.0)))
            .agent(walker, plain())
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.env.get_position(post), Some(DVec2::new(3.0, 0.0)));
        assert_eq!(sim.env.get_position(walker), Some(DVec2::new(2.0, 0.0)));
    }
}

// ── Crowds ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod crowd_tests {
    use super::*;

    /// Counts overlapping pairs at every snapshot.
    #[derive(Default)]
    struct OverlapCheck {
        snapshots:  usize,
        violations: usize,
    }

    impl SimObserver for OverlapCheck {
        fn on_snapshot(&mut self, _t: Tick, env: &Environment) {
            self.snapshots += 1;
            let shapes: Vec<_> = env.node_ids().filter_map(|id| env.get_shape(id)).collect();
            for (i, a) in shapes.iter().enumerate() {
                for b in &shapes[i + 1..] {
                    if a.intersects(b) {
                        self.violations += 1;
                    }
                }
            }
        }
    }

    #[test]
    fn crowd_never_overlaps() {
        let mut sim = SimBuilder::new(test_config(40), crowd(), FixedTarget(DVec2::new(20.0, 0.0)))
            .all_agents(|_| jostling())
            .build()
            .unwrap();
        let mut check = OverlapCheck::default();
        sim.run(&mut check).unwrap();
        assert_eq!(check.snapshots, 40);
        assert_eq!(check.violations, 0);
    }

    #[test]
    fn same_seed_same_trajectories() {
        let a = run_crowd(1234, 25);
        let b = run_crowd(1234, 25);
        assert!(!a.samples.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_different_trajectories() {
        let a = run_crowd(1, 25);
        let b = run_crowd(2, 25);
        assert_eq!(a.samples.len(), b.samples.len());
        assert_ne!(a, b);
    }

    #[test]
    fn moves_commit_in_ascending_id_order() {
        // The trailing walker has the lower id: its first move is into the
        // spot the leader has not left yet, so it is refused.
        let mut env = Environment::physics();
        let trailing = env.add_node(disc(0.3).with_speed(1.0), DVec2::new(0.0, 0.0)).unwrap();
        let leading = env.add_node(disc(0.3).with_speed(1.0), DVec2::new(1.0, 0.0)).unwrap();
        let mut sim = SimBuilder::new(test_config(3), env, FixedTarget(DVec2::new(10.0, 0.0)))
            .all_agents(|_| plain())
            .build()
            .unwrap();
        let mut counts = Vec::new();
        for _ in 0..3 {
            let before = (sim.env.get_position(trailing), sim.env.get_position(leading));
            sim.run_ticks(1, &mut NoopObserver).unwrap();
            let after = (sim.env.get_position(trailing), sim.env.get_position(leading));
            counts.push(usize::from(before.0 != after.0) + usize::from(before.1 != after.1));
        }
        assert_eq!(counts, vec![1, 2, 2]);
        assert_eq!(sim.env.get_position(trailing), Some(DVec2::new(2.0, 0.0)));
        assert_eq!(sim.env.get_position(leading), Some(DVec2::new(4.0, 0.0)));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_planning_is_reproducible() {
        let a = run_crowd(99, 30);
        let b = run_crowd(99, 30);
        assert!(!a.samples.is_empty());
        assert_eq!(a, b);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_commits_never_overlap() {
        for seed in [3, 17, 256] {
            let config = SimConfig { seed, ..test_config(30) };
            let mut sim = SimBuilder::new(config, crowd(), FixedTarget(DVec2::new(20.0, 0.0)))
                .all_agents(|_| jostling())
                .build()
                .unwrap();
            let mut check = OverlapCheck::default();
            sim.run(&mut check).unwrap();
            assert_eq!(check.snapshots, 30);
            assert_eq!(check.violations, 0, "seed {seed}");
        }
    }

    #[test]
    fn spawn_and_despawn_mid_run() {
        let mut sim = SimBuilder::new(test_config(10), Environment::physics(), NoNavigation)
            .build()
            .unwrap();
        let a = sim.spawn(disc(0.5), DVec2::ZERO, plain()).unwrap();
        assert!(sim.spawn(disc(0.5), DVec2::new(0.5, 0.0), plain()).is_err());
        let b = sim.spawn(disc(0.5), DVec2::new(3.0, 0.0), plain()).unwrap();
        sim.run_ticks(2, &mut NoopObserver).unwrap();

        sim.despawn(a).unwrap();
        assert_eq!(sim.pilots.len(), 1);
        assert_eq!(sim.pilots[0].agent, b);
        assert!(sim.despawn(a).is_err());
        assert_eq!(sim.env.node_count(), 1);
    }
}
