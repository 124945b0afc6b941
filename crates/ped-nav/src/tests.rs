//! Unit tests for ped-nav.
//!
//! All tests use a hand-drawn floor plan so expected costs can be worked
//! out by hand.

#[cfg(test)]
mod helpers {
    use ped_core::{ConvexPolygon, DVec2, RoomId, Segment};

    use crate::{RoomGraph, RoomGraphBuilder};

    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> ConvexPolygon {
        ConvexPolygon::rectangle(DVec2::new(x0, y0), DVec2::new(x1, y1)).unwrap()
    }

    pub fn door(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::new(DVec2::new(x0, y0), DVec2::new(x1, y1))
    }

    /// Floor plan (x right, y up):
    ///
    /// ```text
    ///   +---------+
    ///   |    D    |
    ///   +--d3-----+---+------+          +------+
    ///   |    A    d1 B d2  C |          |  E   |
    ///   +---------+---+------+          +------+
    ///   0        10  14     20          30    40
    /// ```
    ///
    /// A, B, C are 4 m deep; D sits on top of A; E is unreachable.
    /// Destination C, destination point (18, 2).
    pub fn floor_plan() -> (RoomGraph, [RoomId; 5]) {
        let mut b = RoomGraphBuilder::new();
        let a = b.add_room(rect(0.0, 0.0, 10.0, 4.0));
        let bb = b.add_room(rect(10.0, 0.0, 14.0, 4.0));
        let c = b.add_room(rect(14.0, 0.0, 20.0, 4.0));
        let d = b.add_room(rect(0.0, 4.0, 10.0, 8.0));
        let e = b.add_room(rect(30.0, 0.0, 40.0, 4.0));

        b.add_door(a, bb, door(10.0, 1.0, 10.0, 3.0)).unwrap();
        b.add_door(bb, c, door(14.0, 1.0, 14.0, 3.0)).unwrap();
        b.add_door(a, d, door(4.0, 4.0, 6.0, 4.0)).unwrap();

        let graph = b.destination_point(DVec2::new(18.0, 2.0)).build(c).unwrap();
        (graph, [a, bb, c, d, e])
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use ped_core::{ConvexPolygon, DVec2, RoomId};

    use super::helpers::{door, floor_plan, rect};
    use crate::{NavError, RoomGraphBuilder};

    #[test]
    fn csr_out_doors() {
        let (g, [a, b, c, d, e]) = floor_plan();
        assert_eq!(g.room_count(), 5);
        assert_eq!(g.door_count(), 6);
        assert_eq!(g.out_doors(a).count(), 2);
        assert_eq!(g.out_doors(b).count(), 2);
        assert_eq!(g.out_doors(c).count(), 1);
        assert_eq!(g.out_doors(d).count(), 1);
        assert_eq!(g.out_doors(e).count(), 0);
        for door in g.out_doors(a) {
            assert_eq!(g.door_from[door.index()], a);
        }
    }

    #[test]
    fn reverse_door_is_twin() {
        let (g, _) = floor_plan();
        for i in 0..g.door_count() {
            let rev = g.door_reverse[i].index();
            assert_eq!(g.door_from[rev], g.door_to[i]);
            assert_eq!(g.door_to[rev], g.door_from[i]);
            assert_eq!(g.door_segment[rev], g.door_segment[i]);
        }
    }

    #[test]
    fn door_to_unknown_room_rejected() {
        let mut b = RoomGraphBuilder::new();
        let a = b.add_room(rect(0.0, 0.0, 1.0, 1.0));
        let err = b.add_door(a, RoomId(3), door(1.0, 0.0, 1.0, 1.0)).unwrap_err();
        assert_eq!(err, NavError::RoomNotFound(RoomId(3)));
    }

    #[test]
    fn unknown_destination_rejected() {
        let mut b = RoomGraphBuilder::new();
        b.add_room(rect(0.0, 0.0, 1.0, 1.0));
        assert!(matches!(b.build(RoomId(1)), Err(NavError::RoomNotFound(RoomId(1)))));
        assert!(matches!(
            RoomGraphBuilder::new().build(RoomId(0)),
            Err(NavError::RoomNotFound(_))
        ));
    }

    #[test]
    fn door_off_shared_wall_rejected() {
        let mut b = RoomGraphBuilder::new();
        let a = b.add_room(rect(0.0, 0.0, 10.0, 4.0));
        let c = b.add_room(rect(14.0, 0.0, 20.0, 4.0));
        // Midpoint (12, 0) is on neither room's wall.
        let err = b.add_door(a, c, door(10.0, 0.0, 14.0, 0.0)).unwrap_err();
        assert_eq!(err, NavError::DoorOffWall { a, b: c, midpoint: DVec2::new(12.0, 0.0) });
        // Midpoint inside A but away from every wall.
        let inner = b.add_room(rect(4.0, 1.0, 6.0, 3.0));
        assert!(matches!(
            b.add_door(a, inner, door(5.0, 1.5, 5.0, 2.5)),
            Err(NavError::DoorOffWall { .. })
        ));
        assert_eq!(b.door_count(), 0);
    }

    #[test]
    fn door_on_slanted_wall_accepted() {
        let mut b = RoomGraphBuilder::new();
        let lower = b.add_room(
            ConvexPolygon::new(vec![DVec2::new(0.0, 0.0), DVec2::new(3.0, 0.0), DVec2::new(0.0, 3.0)])
                .unwrap(),
        );
        let upper = b.add_room(
            ConvexPolygon::new(vec![DVec2::new(3.0, 0.0), DVec2::new(3.0, 3.0), DVec2::new(0.0, 3.0)])
                .unwrap(),
        );
        b.add_door(lower, upper, door(1.0, 2.0, 2.0, 1.0)).unwrap();
        assert_eq!(b.door_count(), 2);
    }

    #[test]
    fn destination_point_outside_room_rejected() {
        let mut b = RoomGraphBuilder::new();
        let a = b.add_room(rect(0.0, 0.0, 1.0, 1.0));
        let err = b.destination_point(DVec2::new(5.0, 5.0)).build(a).err();
        assert_eq!(
            err,
            Some(NavError::InvalidDestination { room: a, point: DVec2::new(5.0, 5.0) })
        );
    }
}

// ── Room lookup ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod lookup {
    use ped_core::DVec2;

    use super::helpers::{door, floor_plan, rect};
    use crate::{NavigationGraph, RoomGraphBuilder};

    #[test]
    fn point_inside_room() {
        let (g, [a, _, c, d, e]) = floor_plan();
        assert_eq!(g.current_room(DVec2::new(2.0, 2.0)), Some(a));
        assert_eq!(g.current_room(DVec2::new(19.0, 0.5)), Some(c));
        assert_eq!(g.current_room(DVec2::new(5.0, 7.0)), Some(d));
        assert_eq!(g.current_room(DVec2::new(35.0, 2.0)), Some(e));
    }

    #[test]
    fn shared_wall_belongs_to_room_nearer_destination() {
        let (g, [a, b, c, d, _]) = floor_plan();
        assert_eq!(g.current_room(DVec2::new(10.0, 2.0)), Some(b));
        assert_eq!(g.current_room(DVec2::new(14.0, 2.0)), Some(c));
        assert_eq!(g.current_room(DVec2::new(5.0, 4.0)), Some(a));
        assert_ne!(g.current_room(DVec2::new(5.0, 4.0)), Some(d));
    }

    #[test]
    fn doorway_tie_goes_to_lower_id() {
        // Two rooms equally far from a third; their shared wall is a tie.
        let mut bld = RoomGraphBuilder::new();
        let left = bld.add_room(rect(0.0, 0.0, 2.0, 2.0));
        let right = bld.add_room(rect(2.0, 0.0, 4.0, 2.0));
        let top = bld.add_room(rect(0.0, 2.0, 4.0, 4.0));
        bld.add_door(left, top, door(0.5, 2.0, 1.5, 2.0)).unwrap();
        bld.add_door(right, top, door(2.5, 2.0, 3.5, 2.0)).unwrap();
        let g = bld.build(top).unwrap();
        assert_eq!(g.distance_to_destination(left), g.distance_to_destination(right));
        assert_eq!(g.current_room(DVec2::new(2.0, 1.0)), Some(left));
    }

    #[test]
    fn outside_every_room() {
        let (g, _) = floor_plan();
        assert_eq!(g.current_room(DVec2::new(25.0, 2.0)), None);
        assert_eq!(g.current_room(DVec2::new(-1.0, -1.0)), None);
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use ped_core::{DVec2, RoomId};

    use super::helpers::{door, floor_plan, rect};
    use crate::{NavigationGraph, RoomGraphBuilder};

    #[test]
    fn waypoints_are_door_midpoints() {
        let (g, [a, b, c, d, _]) = floor_plan();
        assert_eq!(g.next_waypoint(a), Some(DVec2::new(10.0, 2.0)));
        assert_eq!(g.next_waypoint(b), Some(DVec2::new(14.0, 2.0)));
        assert_eq!(g.next_waypoint(d), Some(DVec2::new(5.0, 4.0)));
        assert_eq!(g.next_waypoint(c), Some(DVec2::new(18.0, 2.0)));
    }

    #[test]
    fn unreachable_room_has_no_waypoint() {
        let (g, [.., e]) = floor_plan();
        assert_eq!(g.next_waypoint(e), None);
        assert_eq!(g.next_room(e), None);
        assert_eq!(g.distance_to_destination(e), None);
        assert!(g.path_from(e).is_empty());
        assert_eq!(g.next_waypoint(RoomId(99)), None);
    }

    #[test]
    fn path_and_cost() {
        let (g, [a, b, c, d, _]) = floor_plan();
        assert_eq!(g.path_from(d), vec![d, a, b, c]);
        assert_eq!(g.path_from(c), vec![c]);
        // B centroid (12, 2) -> door (14, 2) -> C centroid (17, 2).
        assert!((g.distance_to_destination(b).unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(g.distance_to_destination(c), Some(0.0));
    }

    #[test]
    fn cheaper_route_wins() {
        // A strip S runs under A, B and C, with doors at its far ends.
        // From A, the detour through S costs ~25.4 m against 12 m via B;
        // from S, the door straight into C beats going back through A.
        let mut bld = RoomGraphBuilder::new();
        let a = bld.add_room(rect(0.0, 0.0, 10.0, 4.0));
        let b = bld.add_room(rect(10.0, 0.0, 14.0, 4.0));
        let c = bld.add_room(rect(14.0, 0.0, 20.0, 4.0));
        let s = bld.add_room(rect(0.0, -2.0, 20.0, 0.0));
        bld.add_door(a, s, door(0.5, 0.0, 1.5, 0.0)).unwrap();
        bld.add_door(s, c, door(18.5, 0.0, 19.5, 0.0)).unwrap();
        bld.add_door(a, b, door(10.0, 1.0, 10.0, 3.0)).unwrap();
        bld.add_door(b, c, door(14.0, 1.0, 14.0, 3.0)).unwrap();
        let g = bld.build(c).unwrap();
        assert_eq!(g.next_room(a), Some(b));
        assert!((g.distance_to_destination(a).unwrap() - 12.0).abs() < 1e-9);
        assert_eq!(g.next_room(s), Some(c));
    }

    #[test]
    fn no_destination_point_ends_navigation() {
        let mut bld = RoomGraphBuilder::new();
        let a = bld.add_room(rect(0.0, 0.0, 1.0, 1.0));
        let b = bld.add_room(rect(1.0, 0.0, 2.0, 1.0));
        bld.add_door(a, b, door(1.0, 0.0, 1.0, 1.0)).unwrap();
        let g = bld.build(b).unwrap();
        assert_eq!(g.next_waypoint(a), Some(DVec2::new(1.0, 0.5)));
        assert_eq!(g.next_waypoint(b), None);
    }
}

// ── Trivial navigators ────────────────────────────────────────────────────────

#[cfg(test)]
mod trivial {
    use ped_core::{DVec2, RoomId};

    use crate::{FixedTarget, NavigationGraph, NoNavigation};

    #[test]
    fn fixed_target_everywhere() {
        let nav = FixedTarget(DVec2::new(3.0, 4.0));
        let room = nav.current_room(DVec2::new(-100.0, 7.0)).unwrap();
        assert_eq!(room, RoomId(0));
        assert_eq!(nav.next_waypoint(room), Some(DVec2::new(3.0, 4.0)));
        assert_eq!(nav.next_waypoint(RoomId(1)), None);
    }

    #[test]
    fn no_navigation_has_no_rooms() {
        assert_eq!(NoNavigation.current_room(DVec2::ZERO), None);
        assert_eq!(NoNavigation.next_waypoint(RoomId(0)), None);
    }
}
