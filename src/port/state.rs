use super::*;

/// What a port sees this tick. Gathered before planning its step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortView {
    pub has_target: bool,
    pub state: DockState,
    /// Distance between the anchors of the soft joint this port owns.
    pub soft_anchor_distance: Option<f32>,
    /// Another port is in range. Only looked for without a target.
    pub adjacent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortAction {
    HardDock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortStep {
    pub progress: f32,
    pub docked: bool,
    pub action: Option<PortAction>,
    pub signals: SmallVec<[Signal; 2]>,
}

/// One tick of a port's state machine, without touching the world.
pub fn plan_port_step(
    progress: f32,
    docked: bool,
    view: &PortView,
    dt: f32,
    configs: &DockingConfigs,
) -> PortStep {
    let rate = (configs.progress_rate * dt).min(1.0);
    let approach = |target: f32| progress + (target - progress) * rate;

    let bool_signal = |connection, value: bool| Signal {
        connection,
        value: if value { "1" } else { "0" },
    };

    if !view.has_target {
        let progress = approach(0.0);

        return PortStep {
            progress,
            docked: docked && progress >= configs.undocked_progress_cutoff,
            action: None,
            signals: smallvec![
                bool_signal(SIGNAL_STATE_OUT, false),
                bool_signal(SIGNAL_PROXIMITY_SENSOR, view.adjacent),
            ],
        };
    }

    match view.state {
        DockState::SoftDocked => {
            let converged = view
                .soft_anchor_distance
                .is_some_and(|distance| distance < configs.hard_dock_threshold);

            PortStep {
                progress: approach(0.5),
                docked,
                action: converged.then_some(PortAction::HardDock),
                signals: smallvec![bool_signal(SIGNAL_STATE_OUT, false)],
            }
        }
        DockState::HardDocked => PortStep {
            progress: approach(1.0),
            docked,
            action: None,
            signals: smallvec![bool_signal(SIGNAL_STATE_OUT, true)],
        },
        // Target without a joint, the dock did not go through.
        DockState::Undocked => PortStep {
            progress: approach(0.0),
            docked,
            action: None,
            signals: smallvec![bool_signal(SIGNAL_STATE_OUT, false)],
        },
    }
}

pub fn port_view(world: &World, port: EntityId) -> Option<PortView> {
    let docking_port = world.ports.get(&port)?;
    let has_target = docking_port.docking_target.is_some();

    let soft_anchor_distance = docking_port
        .joint
        .filter(|joint| joint.compliant)
        .and_then(|joint| world.physics.joint_world_anchors(joint.handle))
        .map(|(a, b)| (a - b).norm());

    Some(PortView {
        has_target,
        state: dock_state(world, port),
        soft_anchor_distance,
        adjacent: !has_target && find_adjacent_port(world, port).is_some(),
    })
}

/// Run one tick of `port`.
pub fn update_port(world: &mut World, port: EntityId, dt: f32) {
    let Some(docking_port) = world.ports.get(&port) else {
        return;
    };

    // Target without being docked happens after a map load or a network update.
    if let (Some(target), false) = (docking_port.docking_target, docking_port.docked) {
        if let Err(err) = dock(world, port, target) {
            log::error!("Port {:?} could not dock to {:?}: {}", port, target, err);
            if let Some(docking_port) = world.ports.get_mut(&port) {
                docking_port.docking_target = None;
            }
        }
    }

    let Some(view) = port_view(world, port) else {
        return;
    };
    let Some(docking_port) = world.ports.get_mut(&port) else {
        return;
    };

    let step = plan_port_step(
        docking_port.progress,
        docking_port.docked,
        &view,
        dt,
        &world.configs.docking,
    );
    docking_port.progress = step.progress;
    docking_port.docked = step.docked;

    world.events.extend(
        step.signals
            .into_iter()
            .map(|signal| DockingEvent::Signal { item: port, signal }),
    );

    if let Some(PortAction::HardDock) = step.action {
        if let Err(err) = hard_dock(world, port) {
            log::error!("Port {:?} could not hard dock: {}", port, err);
        }
    }
}

fn port_vessel(world: &World, port: EntityId) -> Result<EntityId, DockingError> {
    if !world.ports.contains_key(&port) {
        return Err(DockingError::UnknownPort(port));
    }
    world
        .items
        .get(&port)
        .map(|item| item.vessel)
        .filter(|vessel| world.vessels.contains_key(vessel))
        .ok_or(DockingError::MissingEntity(port))
}

/// Join `port` and `target` with a soft joint.
///
/// Does nothing if the two vessels are already docked to each other.
pub fn dock(world: &mut World, port: EntityId, target: EntityId) -> Result<(), DockingError> {
    let vessel = port_vessel(world, port)?;
    let target_vessel = port_vessel(world, target)?;

    if vessel == target_vessel {
        log::error!("Tried to dock vessel {:?} to itself", vessel);
        return Err(DockingError::SelfDock(vessel));
    }

    if world.are_docked(vessel, target_vessel) {
        return Ok(());
    }

    // Leave whatever either port was docked to.
    for id in [port, target] {
        if world.ports[&id].docked {
            undock(world, id);
        }
    }

    if let Some(item) = world.items.get_mut(&port) {
        item.link(target);
    }
    if let Some(item) = world.items.get_mut(&target) {
        item.link(port);
    }

    if let Some(vessel) = world.vessels.get_mut(&vessel) {
        if !vessel.docked_to.contains(&target_vessel) {
            vessel.docked_to.push(target_vessel);
        }
    }
    if let Some(target_vessel) = world.vessels.get_mut(&target_vessel) {
        if !target_vessel.docked_to.contains(&vessel) {
            target_vessel.docked_to.push(vessel);
        }
    }

    let position = world.item_world_position(port).unwrap_or_default();
    let target_position = world.item_world_position(target).unwrap_or_default();
    let is_horizontal = world.ports[&port].is_horizontal;
    let docking_dir = if is_horizontal {
        sign(target_position.x - position.x)
    } else {
        sign(position.y - target_position.y)
    };

    if let Some(docking_port) = world.ports.get_mut(&port) {
        docking_port.docking_target = Some(target);
        docking_port.docked = true;
        docking_port.docking_dir = docking_dir;
    }
    if let Some(target_port) = world.ports.get_mut(&target) {
        target_port.docking_target = Some(port);
        target_port.docked = true;
        target_port.docking_dir = -docking_dir;
    }

    link_waypoints(world, port, target);

    create_joint(world, port, target, false);

    log::debug!(
        "Port {:?} soft docked to {:?} (vessels {:?} and {:?})",
        port,
        target,
        vessel,
        target_vessel
    );

    Ok(())
}

/// Anchors sit half the docked distance from each port, toward the other port.
fn create_joint(world: &mut World, port: EntityId, target: EntityId, rigid: bool) {
    let (Some(position), Some(target_position)) = (
        world.item_world_position(port),
        world.item_world_position(target),
    ) else {
        return;
    };
    let (Some(body1), Some(body2)) = (
        vessel_body(world, port),
        vessel_body(world, target),
    ) else {
        return;
    };
    let Some(docking_port) = world.ports.get(&port) else {
        return;
    };

    let direction = if docking_port.is_horizontal {
        vector![sign(target_position.x - position.x) as f32, 0.0]
    } else {
        vector![0.0, sign(target_position.y - position.y) as f32]
    };
    let offset = direction * docking_port.docked_distance * 0.5;

    let scale = world.configs.physics.sim_scale;
    let anchor1 = Point::from((position + offset) * scale);
    let anchor2 = Point::from((target_position - offset) * scale);

    let configs = &world.configs.docking;
    let kind = if rigid {
        JointKind::Rigid {
            anchor1,
            anchor2,
            frequency: configs.rigid_joint_frequency,
        }
    } else {
        JointKind::Compliant {
            anchor1,
            anchor2,
            frequency: configs.soft_joint_frequency,
            damping: configs.soft_joint_damping_ratio,
        }
    };

    let handle = world.physics.add_joint(body1, body2, kind);
    if let Some(docking_port) = world.ports.get_mut(&port) {
        docking_port.joint = Some(DockingJoint {
            handle,
            compliant: !rigid,
        });
    }
}

fn vessel_body(world: &World, item: EntityId) -> Option<RigidBodyHandle> {
    let vessel = world.items.get(&item)?.vessel;
    world.vessels.get(&vessel).map(|vessel| vessel.body)
}

/// Swap the soft joint for a rigid one and merge the hulls.
pub fn hard_dock(world: &mut World, port: EntityId) -> anyhow::Result<()> {
    let docking_port = world
        .ports
        .get_mut(&port)
        .ok_or(DockingError::UnknownPort(port))?;
    let target = docking_port
        .docking_target
        .ok_or_else(|| anyhow::anyhow!("Port {:?} has no docking target", port))?;

    if let Some(joint) = docking_port.joint.take() {
        world.physics.remove_joint(joint.handle);
    }

    if world.configs.docking.connect_power {
        connect_wire_between_ports(world, port, target);
    }

    create_joint(world, port, target, true);

    let links_hull = |item: EntityId| {
        world.items.get(&item).is_some_and(|item| {
            item.linked_to
                .iter()
                .any(|id| world.structures.hulls.contains_key(id))
        })
    };
    if !links_hull(port) && !links_hull(target) {
        merge_compartments(world, port)?;
        world.events.push(DockingEvent::NetworkSync { port });
    }

    log::debug!("Port {:?} hard docked to {:?}", port, target);

    Ok(())
}

/// Run the port's wire between both ports' power connections.
pub fn connect_wire_between_ports(world: &mut World, port: EntityId, target: EntityId) {
    let Some(wire) = world.items.get_mut(&port).and_then(|item| item.wire.as_mut()) else {
        return;
    };
    wire.hidden = true;
    wire.locked = true;

    let Some(power) = world.items.get(&port).and_then(|item| item.power_connection()) else {
        return;
    };
    let Some(recipient) = world
        .items
        .get(&target)
        .and_then(|item| item.power_connection())
    else {
        return;
    };

    world.disconnect_wire_from(port, port);
    world.disconnect_wire_from(port, target);

    world.connect_wire(
        port,
        ConnectionRef {
            item: port,
            connection: power,
        },
    );
    world.connect_wire(
        port,
        ConnectionRef {
            item: target,
            connection: recipient,
        },
    );
}

/// Separate `port` from its target, tearing down everything the dock created on both sides.
///
/// Does nothing if the port is not docked.
pub fn undock(world: &mut World, port: EntityId) {
    let Some(docking_port) = world.ports.get(&port) else {
        return;
    };
    let Some(target) = docking_port.docking_target.filter(|_| docking_port.docked) else {
        return;
    };

    world.events.push(DockingEvent::NetworkSync { port });

    let vessel = world.items.get(&port).map(|item| item.vessel);
    let target_vessel = world.items.get(&target).map(|item| item.vessel);

    if let Some((vessel, target_vessel)) = vessel.zip(target_vessel) {
        if let Some(v) = world.vessels.get_mut(&target_vessel) {
            v.docked_to.retain(|id| *id != vessel);
        }
        if let Some(v) = world.vessels.get_mut(&vessel) {
            v.docked_to.retain(|id| *id != target_vessel);
        }

        unlink_waypoints(world, vessel, target_vessel);
    }

    if let Some(item) = world.items.get_mut(&port) {
        item.linked_to.clear();
    }

    // Cleared before recursing so the target's undock stops here.
    if let Some(docking_port) = world.ports.get_mut(&port) {
        docking_port.docking_target = None;
    }
    undock(world, target);
    if let Some(target_port) = world.ports.get_mut(&target) {
        if target_port.docking_target == Some(port) {
            target_port.docking_target = None;
        }
    }

    if world.items.get(&port).is_some_and(|item| item.wire.is_some()) {
        world.drop_wire(port);
    }

    if let Some(joint) = world.ports.get_mut(&port).and_then(|p| p.joint.take()) {
        world.physics.remove_joint(joint.handle);
    }

    remove_compartments(world, port);

    if let Some(docking_port) = world.ports.get_mut(&port) {
        docking_port.docked = false;
    }

    log::debug!("Port {:?} undocked from {:?}", port, target);
}

/// Dock with the adjacent port or undock.
pub fn set_docked(world: &mut World, port: EntityId, value: bool) {
    let Some(docking_port) = world.ports.get(&port) else {
        return;
    };

    if value && !docking_port.docked {
        let target = docking_port
            .docking_target
            .or_else(|| find_adjacent_port(world, port));
        if let Some(target) = target {
            if let Err(err) = dock(world, port, target) {
                log::error!("Port {:?} could not dock to {:?}: {}", port, target, err);
            }
        }
    } else if !value && docking_port.docked {
        undock(world, port);
    }
}

/// Handle a signal arriving at the port's item. Replicas ignore signals.
pub fn receive_signal(world: &mut World, port: EntityId, connection: &str, signal: &str) {
    if world.configs.role == NetRole::Replica {
        return;
    }
    let Some(docked) = world.ports.get(&port).map(|p| p.docked) else {
        return;
    };

    match connection {
        SIGNAL_TOGGLE => set_docked(world, port, !docked),
        SIGNAL_SET_ACTIVE | SIGNAL_SET_STATE => set_docked(world, port, signal != "0"),
        _ => {}
    }
}

/// Restore a port from a loaded map.
///
/// Hulls and gaps it linked to are stale and get removed. A linked docking port
/// becomes the target, the next update docks to it.
pub fn on_map_loaded(world: &mut World, port: EntityId) {
    let Some(linked) = world
        .items
        .get_mut(&port)
        .map(|item| std::mem::take(&mut item.linked_to))
    else {
        return;
    };

    for id in linked {
        match world.entity(id) {
            Some(EntityKind::Hull) => world.remove_hull(id),
            Some(EntityKind::Gap) => world.remove_gap(id),
            Some(EntityKind::Item) if world.ports.contains_key(&id) => {
                if let Some(docking_port) = world.ports.get_mut(&port) {
                    docking_port.docking_target = Some(id);
                }
            }
            _ => {}
        }
    }
}
