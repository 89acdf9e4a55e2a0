mod common;

use approx::assert_relative_eq;
use common::*;
use docking::*;

#[test]
fn ports_in_range_soft_then_hard_dock() {
    let Pair {
        mut world,
        vessel_a,
        vessel_b,
        port_a,
        port_b,
    } = horizontal_pair(Configs::default());

    set_docked(&mut world, port_a, true);

    assert_eq!(dock_state(&world, port_a), DockState::SoftDocked);
    assert_eq!(dock_state(&world, port_b), DockState::SoftDocked);
    assert_eq!(world.ports[&port_a].docking_target(), Some(port_b));
    assert_eq!(world.ports[&port_b].docking_target(), Some(port_a));
    assert!(world.are_docked(vessel_a, vessel_b));
    assert!(world.are_docked(vessel_b, vessel_a));
    assert!(world.items[&port_a].linked_to.contains(&port_b));
    assert!(world.items[&port_b].linked_to.contains(&port_a));
    assert_eq!(world.ports[&port_a].docking_dir(), 1);
    assert_eq!(world.ports[&port_b].docking_dir(), -1);
    assert_eq!(world.physics.joint_count(), 1);

    step_until_hard_docked(&mut world, port_a, 600).expect("never hard docked");
    assert_eq!(dock_state(&world, port_b), DockState::HardDocked);
    assert!(!world.ports[&port_a].joint().unwrap().compliant);
    assert_eq!(world.physics.joint_count(), 1);

    let events = world.drain_events().collect::<Vec<_>>();
    assert!(sync_events(&events).contains(&port_a));

    let hulls = world.ports[&port_a].hulls().unwrap();
    assert!(world.ports[&port_b].hulls().is_none());
    assert_eq!(world.structures.hulls.len(), 2);
    for hull in hulls {
        let rect = world.structures.hulls[&hull].rect;
        assert_relative_eq!(rect.width, 16.0, epsilon = 1e-3);
        assert_relative_eq!(rect.height, 64.0, epsilon = 1e-3);
    }
    assert_eq!(world.structures.hulls[&hulls[0]].vessel, vessel_a);
    assert_eq!(world.structures.hulls[&hulls[1]].vessel, vessel_b);

    assert_eq!(world.structures.gaps.len(), 1);
    let gap_id = world.ports[&port_a].gap().unwrap();
    let gap = &world.structures.gaps[&gap_id];
    assert!(gap.is_horizontal);
    assert_relative_eq!(gap.rect.width, 4.0, epsilon = 1e-3);
    assert!(
        hull_world_rect(&world, gap.linked_to[0]).x < hull_world_rect(&world, gap.linked_to[1]).x
    );

    let bodies = world.ports[&port_a].static_bodies();
    assert_eq!(bodies.len(), 4);
    assert!(bodies.iter().all(|body| world.physics.is_wall(*body)));

    let linked = &world.items[&port_a].linked_to;
    assert!(linked.contains(&hulls[0]));
    assert!(linked.contains(&hulls[1]));
    assert!(linked.contains(&gap_id));
}

#[test]
fn progress_is_continuous_and_reaches_one() {
    let Pair {
        mut world,
        port_a,
        port_b,
        ..
    } = horizontal_pair(Configs::default());

    set_docked(&mut world, port_a, true);

    let mut previous = 0.0;
    for _ in 0..600 {
        world.step();
        let progress = world.ports[&port_a].progress();
        assert!(progress >= previous - 1e-6);
        assert!(progress <= 1.0);
        if dock_state(&world, port_a) == DockState::SoftDocked {
            assert!(progress <= 0.5);
        }
        previous = progress;
    }

    assert_eq!(dock_state(&world, port_a), DockState::HardDocked);
    assert_relative_eq!(world.ports[&port_a].progress(), 1.0, epsilon = 0.01);
    assert_relative_eq!(world.ports[&port_b].progress(), 1.0, epsilon = 0.01);

    world.drain_events();
    world.step();
    let events = world.drain_events().collect::<Vec<_>>();
    assert_eq!(signals_of(&events, port_a, SIGNAL_STATE_OUT), vec!["1"]);
    assert_eq!(signals_of(&events, port_b, SIGNAL_STATE_OUT), vec!["1"]);
}

#[test]
fn toggle_undocks_and_tears_everything_down() {
    let mut pair = horizontal_pair(Configs::default());
    add_power(&mut pair);
    let Pair {
        mut world,
        vessel_a,
        vessel_b,
        port_a,
        port_b,
    } = pair;

    receive_signal(&mut world, port_a, SIGNAL_TOGGLE, "1");
    step_until_hard_docked(&mut world, port_a, 600).expect("never hard docked");
    let bodies = world.ports[&port_a].static_bodies().to_vec();
    world.drain_events();

    receive_signal(&mut world, port_a, SIGNAL_TOGGLE, "1");

    let events = world.drain_events().collect::<Vec<_>>();
    let synced = sync_events(&events);
    assert!(synced.contains(&port_a));
    assert!(synced.contains(&port_b));

    for port in [port_a, port_b] {
        let docking_port = &world.ports[&port];
        assert_eq!(docking_port.docking_target(), None);
        assert!(!docking_port.is_docked());
        assert!(docking_port.joint().is_none());
        assert!(docking_port.hulls().is_none());
        assert!(docking_port.gap().is_none());
        assert!(world.items[&port].linked_to.is_empty());
        assert_eq!(dock_state(&world, port), DockState::Undocked);
    }
    assert!(!world.are_docked(vessel_a, vessel_b));
    assert!(!world.are_docked(vessel_b, vessel_a));
    assert!(world.structures.hulls.is_empty());
    assert!(world.structures.gaps.is_empty());
    assert_eq!(world.physics.joint_count(), 0);
    assert!(bodies.iter().all(|body| !world.physics.contains_body(*body)));

    let wire = world.items[&port_a].wire.as_ref().unwrap();
    assert_eq!(wire.ends, [None, None]);
    assert!(!wire.hidden);
    assert!(!wire.locked);

    let before = world.ports[&port_a].progress();
    for _ in 0..120 {
        world.step();
    }
    assert!(world.ports[&port_a].progress() < before);
    assert!(world.ports[&port_a].progress() < 0.01);
    assert_eq!(dock_state(&world, port_a), DockState::Undocked);

    let events = world.drain_events().collect::<Vec<_>>();
    assert!(signals_of(&events, port_a, SIGNAL_STATE_OUT)
        .iter()
        .all(|value| *value == "0"));
    assert!(!signals_of(&events, port_a, SIGNAL_PROXIMITY_SENSOR).is_empty());
}

#[test]
fn hard_dock_wires_power_connections() {
    let mut pair = horizontal_pair(Configs::default());
    add_power(&mut pair);
    let Pair {
        mut world,
        port_a,
        port_b,
        ..
    } = pair;

    dock(&mut world, port_a, port_b).unwrap();
    hard_dock(&mut world, port_a).unwrap();

    let wire = world.items[&port_a].wire.as_ref().unwrap();
    assert!(wire.hidden);
    assert!(wire.locked);
    assert_eq!(
        wire.ends,
        [
            Some(ConnectionRef {
                item: port_a,
                connection: 1
            }),
            Some(ConnectionRef {
                item: port_b,
                connection: 1
            }),
        ]
    );
    assert!(world.items[&port_b].connections[1].wires.contains(&port_a));
    assert!(world.items[&port_b].connections[0].wires.is_empty());

    // Undocking from the side that owns nothing still clears both.
    undock(&mut world, port_b);

    let wire = world.items[&port_a].wire.as_ref().unwrap();
    assert_eq!(wire.ends, [None, None]);
    assert!(world.items[&port_b].connections[1].wires.is_empty());
    assert!(world.structures.hulls.is_empty());
    assert_eq!(world.physics.joint_count(), 0);
}

#[test]
fn power_is_left_alone_when_disabled() {
    let mut configs = Configs::default();
    configs.docking.connect_power = false;
    let mut pair = horizontal_pair(configs);
    add_power(&mut pair);
    let Pair {
        mut world,
        port_a,
        port_b,
        ..
    } = pair;

    dock(&mut world, port_a, port_b).unwrap();
    hard_dock(&mut world, port_a).unwrap();

    let wire = world.items[&port_a].wire.as_ref().unwrap();
    assert_eq!(wire.ends, [None, None]);
    assert!(!wire.hidden);
}

#[test]
fn hard_docking_twice_merges_once() {
    let Pair {
        mut world,
        port_a,
        port_b,
        ..
    } = horizontal_pair(Configs::default());

    dock(&mut world, port_a, port_b).unwrap();
    hard_dock(&mut world, port_a).unwrap();
    hard_dock(&mut world, port_a).unwrap();

    assert_eq!(world.structures.hulls.len(), 2);
    assert_eq!(world.structures.gaps.len(), 1);
    assert_eq!(world.physics.joint_count(), 1);
}

#[test]
fn vertical_docking_has_no_static_edges() {
    let Pair {
        mut world,
        vessel_a,
        vessel_b,
        port_a,
        port_b,
    } = vertical_pair(Configs::default());

    dock(&mut world, port_a, port_b).unwrap();
    let merged_before = world.structures.hulls.len();
    hard_dock(&mut world, port_a).unwrap();

    assert_eq!(merged_before, 0);
    assert_eq!(dock_state(&world, port_a), DockState::HardDocked);
    assert!(world.ports[&port_a].static_bodies().is_empty());

    let hulls = world.ports[&port_a].hulls().unwrap();
    assert_eq!(world.structures.hulls[&hulls[0]].vessel, vessel_a);
    assert_eq!(world.structures.hulls[&hulls[1]].vessel, vessel_b);
    for hull in hulls {
        let rect = world.structures.hulls[&hull].rect;
        assert_relative_eq!(rect.width, 64.0, epsilon = 1e-3);
        assert_relative_eq!(rect.height, 16.0, epsilon = 1e-3);
    }

    let gap = world.structures.gaps.values().next().unwrap();
    assert!(!gap.is_horizontal);
    assert_relative_eq!(gap.rect.height, 4.0, epsilon = 1e-3);
    // Upper hull first.
    assert_eq!(gap.linked_to, [hulls[1], hulls[0]]);
    assert!(
        hull_world_rect(&world, gap.linked_to[0]).y > hull_world_rect(&world, gap.linked_to[1]).y
    );
}

#[test]
fn docking_to_own_vessel_changes_nothing() {
    let Pair {
        mut world,
        vessel_a,
        port_a,
        ..
    } = horizontal_pair(Configs::default());

    let other = world
        .spawn_item(vessel_a, Rect::from_center(vector![110.0, 0.0], 32.0, 64.0))
        .unwrap();
    add_docking_port(&mut world, other, DockingPort::new(true)).unwrap();

    assert_eq!(
        dock(&mut world, port_a, other),
        Err(DockingError::SelfDock(vessel_a))
    );

    for port in [port_a, other] {
        assert_eq!(world.ports[&port].docking_target(), None);
        assert!(!world.ports[&port].is_docked());
        assert!(world.items[&port].linked_to.is_empty());
    }
    assert!(world.vessels[&vessel_a].docked_to.is_empty());
    assert_eq!(world.physics.joint_count(), 0);
    assert!(world.events.is_empty());
}

#[test]
fn docking_already_docked_vessels_is_a_no_op() {
    let Pair {
        mut world,
        port_a,
        port_b,
        ..
    } = horizontal_pair(Configs::default());

    dock(&mut world, port_a, port_b).unwrap();
    let joint = world.ports[&port_a].joint();
    dock(&mut world, port_a, port_b).unwrap();
    dock(&mut world, port_b, port_a).unwrap();

    assert_eq!(world.physics.joint_count(), 1);
    assert_eq!(world.ports[&port_a].joint(), joint);
    assert!(world.ports[&port_b].joint().is_none());
}

#[test]
fn docking_elsewhere_leaves_the_previous_target() {
    let Pair {
        mut world,
        vessel_a,
        vessel_b,
        port_a,
        port_b,
    } = horizontal_pair(Configs::default());

    let vessel_c = world
        .spawn_vessel(vector![0.0, 0.0], vector![0.0, 0.0], VESSEL_MASS)
        .unwrap();
    let port_c = world
        .spawn_item(vessel_c, Rect::from_center(vector![80.0, 0.0], 32.0, 64.0))
        .unwrap();
    add_docking_port(&mut world, port_c, DockingPort::new(true)).unwrap();

    dock(&mut world, port_a, port_b).unwrap();
    hard_dock(&mut world, port_a).unwrap();
    dock(&mut world, port_c, port_a).unwrap();

    assert!(!world.are_docked(vessel_a, vessel_b));
    assert!(world.are_docked(vessel_a, vessel_c));
    assert_eq!(world.ports[&port_b].docking_target(), None);
    assert!(!world.ports[&port_b].is_docked());
    assert_eq!(world.ports[&port_a].docking_target(), Some(port_c));
    assert!(world.structures.hulls.is_empty());
    assert_eq!(world.physics.joint_count(), 1);
    assert_eq!(dock_state(&world, port_a), DockState::SoftDocked);
}

#[test]
fn undocking_an_undocked_port_does_nothing() {
    let Pair {
        mut world, port_a, ..
    } = horizontal_pair(Configs::default());

    undock(&mut world, port_a);
    set_docked(&mut world, port_a, false);

    assert!(world.events.is_empty());
    assert!(!world.ports[&port_a].is_docked());
}

#[test]
fn set_state_signal_docks_and_undocks() {
    let Pair {
        mut world,
        port_a,
        port_b,
        ..
    } = horizontal_pair(Configs::default());

    receive_signal(&mut world, port_a, SIGNAL_SET_STATE, "1");
    assert_eq!(world.ports[&port_a].docking_target(), Some(port_b));

    receive_signal(&mut world, port_a, SIGNAL_SET_ACTIVE, "1");
    assert_eq!(world.physics.joint_count(), 1);

    receive_signal(&mut world, port_a, SIGNAL_SET_STATE, "0");
    assert_eq!(world.ports[&port_a].docking_target(), None);

    receive_signal(&mut world, port_a, "unrelated", "1");
    assert_eq!(world.ports[&port_a].docking_target(), None);
}

#[test]
fn replicas_ignore_signals() {
    let mut configs = Configs::default();
    configs.role = NetRole::Replica;
    let Pair {
        mut world, port_a, ..
    } = horizontal_pair(configs);

    receive_signal(&mut world, port_a, SIGNAL_TOGGLE, "1");
    receive_signal(&mut world, port_a, SIGNAL_SET_STATE, "1");

    assert!(!world.ports[&port_a].is_docked());
    assert_eq!(world.physics.joint_count(), 0);
}

#[test]
fn removing_a_docked_port_undocks_its_partner() {
    let Pair {
        mut world,
        vessel_a,
        vessel_b,
        port_a,
        port_b,
    } = horizontal_pair(Configs::default());

    dock(&mut world, port_a, port_b).unwrap();
    hard_dock(&mut world, port_a).unwrap();

    assert!(remove_docking_port(&mut world, port_a).is_some());

    assert!(!world.ports.contains_key(&port_a));
    assert!(world.items.contains_key(&port_a));
    assert_eq!(world.ports[&port_b].docking_target(), None);
    assert!(!world.are_docked(vessel_a, vessel_b));
    assert!(world.structures.hulls.is_empty());
    assert_eq!(world.physics.joint_count(), 0);

    // Stepping with one port left is fine.
    world.step();
    assert!(remove_docking_port(&mut world, port_a).is_none());
}

#[test]
fn map_load_drops_stale_hulls_and_redocks() {
    let Pair {
        mut world,
        vessel_a,
        vessel_b,
        port_a,
        port_b,
    } = horizontal_pair(Configs::default());

    let hull = world
        .create_hull(vessel_a, Rect::new(100.0, 32.0, 16.0, 64.0), None)
        .unwrap();
    let gap = world
        .create_gap(vessel_a, Rect::new(114.0, 32.0, 4.0, 64.0), true, [hull, hull], None)
        .unwrap();
    let item = world.items.get_mut(&port_a).unwrap();
    item.link(hull);
    item.link(gap);
    item.link(port_b);

    on_map_loaded(&mut world, port_a);

    assert!(world.structures.hulls.is_empty());
    assert!(world.structures.gaps.is_empty());
    assert_eq!(world.ports[&port_a].docking_target(), Some(port_b));
    assert!(!world.ports[&port_a].is_docked());

    world.step();

    assert!(world.are_docked(vessel_a, vessel_b));
    assert_eq!(dock_state(&world, port_a), DockState::SoftDocked);
    assert_eq!(world.ports[&port_b].docking_target(), Some(port_a));
}

#[test]
fn missing_hull_prefab_still_hard_docks() {
    let Pair {
        mut world,
        port_a,
        port_b,
        ..
    } = horizontal_pair(Configs::default());
    world.structures.hull_prefab = None;

    dock(&mut world, port_a, port_b).unwrap();
    let err = hard_dock(&mut world, port_a).unwrap_err();

    assert_eq!(
        err.downcast_ref::<DockingError>(),
        Some(&DockingError::MissingHullPrefab)
    );
    assert_eq!(dock_state(&world, port_a), DockState::HardDocked);
    assert!(world.structures.hulls.is_empty());
    assert!(world.structures.gaps.is_empty());
}

#[test]
fn horizontal_hulls_reach_from_port_centers_to_the_seam() {
    let Pair {
        mut world,
        vessel_a,
        port_a,
        port_b,
        ..
    } = horizontal_pair(Configs::default());

    dock(&mut world, port_a, port_b).unwrap();
    hard_dock(&mut world, port_a).unwrap();

    // Port A is centered on x 100, port B on x 120. Both span y 32..-32.
    let [left, right] = world.ports[&port_a].hulls().unwrap();
    let left = hull_world_rect(&world, left);
    let right = hull_world_rect(&world, right);

    assert_relative_eq!(left.x, 100.0, epsilon = 1e-3);
    assert_relative_eq!(left.right(), 116.0, epsilon = 1e-3);
    assert_relative_eq!(right.x, 104.0, epsilon = 1e-3);
    assert_relative_eq!(right.right(), 120.0, epsilon = 1e-3);
    for hull in [left, right] {
        assert_relative_eq!(hull.y, 32.0, epsilon = 1e-3);
        assert_relative_eq!(hull.bottom(), -32.0, epsilon = 1e-3);
    }

    // Vessel B sits at x 200, so its hull is stored 200 to the left.
    let [_, right_id] = world.ports[&port_a].hulls().unwrap();
    assert_relative_eq!(world.structures.hulls[&right_id].rect.x, -96.0, epsilon = 1e-3);

    let gap = &world.structures.gaps[&world.ports[&port_a].gap().unwrap()];
    assert_eq!(gap.vessel, vessel_a);
    assert!(gap.rect.x < left.right() && gap.rect.right() > left.right());
    assert_relative_eq!(gap.rect.x, 114.0, epsilon = 1e-3);
    assert_relative_eq!(gap.rect.y, 32.0, epsilon = 1e-3);
}

#[test]
fn vertical_hulls_reach_from_port_centers_to_the_seam() {
    let Pair {
        mut world,
        vessel_a,
        port_a,
        port_b,
        ..
    } = vertical_pair(Configs::default());

    dock(&mut world, port_a, port_b).unwrap();
    hard_dock(&mut world, port_a).unwrap();

    // Port A is centered on y 100, port B above it on y 120. Both span x -32..32.
    let [lower, upper] = world.ports[&port_a].hulls().unwrap();
    let lower = hull_world_rect(&world, lower);
    let upper = hull_world_rect(&world, upper);

    assert_relative_eq!(lower.y, 116.0, epsilon = 1e-3);
    assert_relative_eq!(lower.bottom(), 100.0, epsilon = 1e-3);
    assert_relative_eq!(upper.y, 120.0, epsilon = 1e-3);
    assert_relative_eq!(upper.bottom(), 104.0, epsilon = 1e-3);
    for hull in [lower, upper] {
        assert_relative_eq!(hull.x, -32.0, epsilon = 1e-3);
        assert_relative_eq!(hull.width, 64.0, epsilon = 1e-3);
    }

    let gap = &world.structures.gaps[&world.ports[&port_a].gap().unwrap()];
    assert_eq!(gap.vessel, vessel_a);
    assert!(gap.rect.y > lower.y && gap.rect.bottom() < lower.y);
    assert_relative_eq!(gap.rect.y, 118.0, epsilon = 1e-3);
    assert_relative_eq!(gap.rect.x, -32.0, epsilon = 1e-3);
}

#[test]
fn undrained_signals_do_not_pile_up() {
    let Pair {
        mut world,
        port_a,
        port_b,
        ..
    } = horizontal_pair(Configs::default());

    world.step();
    let per_tick = world.events.len();
    assert_eq!(per_tick, 4);

    for _ in 0..100 {
        world.step();
    }
    assert_eq!(world.events.len(), per_tick);

    // Network syncs are kept until drained.
    set_docked(&mut world, port_a, true);
    undock(&mut world, port_b);
    world.step();
    world.step();
    let events = world.drain_events().collect::<Vec<_>>();
    let synced = sync_events(&events);
    assert!(synced.contains(&port_a));
    assert!(synced.contains(&port_b));
}
