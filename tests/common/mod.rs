#![allow(dead_code)]

use docking::*;

pub const VESSEL_MASS: f32 = 1000.0;

pub struct Pair {
    pub world: World,
    pub vessel_a: EntityId,
    pub vessel_b: EntityId,
    pub port_a: EntityId,
    pub port_b: EntityId,
}

/// Port A at world (100, 0), port B at world (120, 0).
pub fn horizontal_pair(configs: Configs) -> Pair {
    pair(
        configs,
        true,
        vector![200.0, 0.0],
        vector![100.0, 0.0],
        vector![-80.0, 0.0],
        vector![32.0, 64.0],
    )
}

/// Port A at world (0, 100) below port B at world (0, 120).
pub fn vertical_pair(configs: Configs) -> Pair {
    pair(
        configs,
        false,
        vector![0.0, 200.0],
        vector![0.0, 100.0],
        vector![0.0, -80.0],
        vector![64.0, 32.0],
    )
}

fn pair(
    configs: Configs,
    is_horizontal: bool,
    vessel_b_position: Vector<Real>,
    port_a_center: Vector<Real>,
    port_b_center: Vector<Real>,
    port_size: Vector<Real>,
) -> Pair {
    let mut world = World::new(configs);

    let vessel_a = world
        .spawn_vessel(vector![0.0, 0.0], vector![0.0, 0.0], VESSEL_MASS)
        .unwrap();
    let vessel_b = world
        .spawn_vessel(vessel_b_position, vector![0.0, 0.0], VESSEL_MASS)
        .unwrap();

    let port_a = world
        .spawn_item(
            vessel_a,
            Rect::from_center(port_a_center, port_size.x, port_size.y),
        )
        .unwrap();
    let port_b = world
        .spawn_item(
            vessel_b,
            Rect::from_center(port_b_center, port_size.x, port_size.y),
        )
        .unwrap();

    add_docking_port(&mut world, port_a, DockingPort::new(is_horizontal)).unwrap();
    add_docking_port(&mut world, port_b, DockingPort::new(is_horizontal)).unwrap();

    Pair {
        world,
        vessel_a,
        vessel_b,
        port_a,
        port_b,
    }
}

/// Give port A a wire and both ports a power connection.
pub fn add_power(pair: &mut Pair) {
    for port in [pair.port_a, pair.port_b] {
        let item = pair.world.items.get_mut(&port).unwrap();
        item.connections.push(Connection::new("signal_in", false));
        item.connections.push(Connection::new("power", true));
    }
    pair.world.items.get_mut(&pair.port_a).unwrap().wire = Some(Wire::default());
}

/// Step until both ports are hard docked. Returns the number of ticks it took.
pub fn step_until_hard_docked(world: &mut World, port: EntityId, max_ticks: usize) -> Option<usize> {
    for tick in 0..max_ticks {
        world.step();
        if dock_state(world, port) == DockState::HardDocked {
            return Some(tick + 1);
        }
    }
    None
}

pub fn signals_of(events: &[DockingEvent], port: EntityId, connection: &str) -> Vec<&'static str> {
    events
        .iter()
        .filter_map(|event| match event {
            DockingEvent::Signal { item, signal }
                if *item == port && signal.connection == connection =>
            {
                Some(signal.value)
            }
            _ => None,
        })
        .collect()
}

pub fn sync_events(events: &[DockingEvent]) -> Vec<EntityId> {
    events
        .iter()
        .filter_map(|event| match event {
            DockingEvent::NetworkSync { port } => Some(*port),
            _ => None,
        })
        .collect()
}

pub fn hull_world_rect(world: &World, hull: EntityId) -> Rect {
    let hull = &world.structures.hulls[&hull];
    hull.rect.offset(world.vessel_offset(hull.vessel).unwrap())
}
