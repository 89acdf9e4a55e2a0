use super::*;

#[derive(Debug, Clone)]
pub struct MergedCompartments {
    /// Ordered along the docking axis, lowest coordinate first.
    pub hulls: [EntityId; 2],
    pub gap: EntityId,
    /// Static edges, only for horizontal docking.
    pub bodies: SmallVec<[RigidBodyHandle; 4]>,
}

/// Carve a hull out of each docked port and open a gap between them.
///
/// The port and its target must be docked. Nothing is created on error.
pub fn merge_compartments(world: &mut World, port: EntityId) -> anyhow::Result<MergedCompartments> {
    if world.structures.hull_prefab.is_none() {
        return Err(DockingError::MissingHullPrefab.into());
    }

    let docking_port = world
        .ports
        .get(&port)
        .ok_or(DockingError::UnknownPort(port))?;
    let target = docking_port
        .docking_target
        .ok_or_else(|| anyhow::anyhow!("Port {:?} has no docking target", port))?;
    let is_horizontal = docking_port.is_horizontal;
    let half_distance = docking_port.docked_distance * 0.5;
    let hull_ids = docking_port.hull_ids;
    let gap_id = docking_port.gap_id;

    let mut rects = [
        world
            .item_world_rect(port)
            .ok_or(DockingError::MissingEntity(port))?,
        world
            .item_world_rect(target)
            .ok_or(DockingError::MissingEntity(target))?,
    ];
    let mut vessels = [world.items[&port].vessel, world.items[&target].vessel];

    let world_rects = if is_horizontal {
        if rects[0].center().x > rects[1].center().x {
            rects.swap(0, 1);
            vessels.swap(0, 1);
        }

        [
            Rect::new(
                rects[0].center().x,
                rects[0].y,
                half_distance,
                rects[0].height,
            ),
            Rect::new(
                rects[1].center().x - half_distance,
                rects[1].y,
                half_distance,
                rects[1].height,
            ),
        ]
    } else {
        if rects[0].center().y > rects[1].center().y {
            rects.swap(0, 1);
            vessels.swap(0, 1);
        }

        // Lower hull reaches up from its port's center, upper hull reaches down.
        [
            Rect::new(
                rects[0].x,
                rects[0].center().y + half_distance,
                rects[0].width,
                half_distance,
            ),
            Rect::new(
                rects[1].x,
                rects[1].center().y,
                rects[1].width,
                half_distance,
            ),
        ]
    };

    let mut local_rects = world_rects;
    for (rect, vessel) in local_rects.iter_mut().zip(vessels) {
        let offset = world
            .vessel_offset(vessel)
            .ok_or(DockingError::MissingEntity(vessel))?;
        *rect = rect.offset(-offset);
    }

    let first_hull = world.create_hull(vessels[0], local_rects[0], hull_ids[0])?;
    let second_hull = match world.create_hull(vessels[1], local_rects[1], hull_ids[1]) {
        Ok(id) => id,
        Err(err) => {
            world.remove_hull(first_hull);
            return Err(err);
        }
    };
    let hulls = [first_hull, second_hull];

    let gap_linked_to = if is_horizontal {
        if world_rects[0].x < world_rects[1].x {
            [hulls[0], hulls[1]]
        } else {
            [hulls[1], hulls[0]]
        }
    } else if world_rects[0].y > world_rects[1].y {
        [hulls[0], hulls[1]]
    } else {
        [hulls[1], hulls[0]]
    };

    let thickness = world.configs.docking.gap_thickness;
    let gap_rect = if is_horizontal {
        Rect::new(
            local_rects[0].right() - thickness * 0.5,
            local_rects[0].y,
            thickness,
            local_rects[0].height,
        )
    } else {
        Rect::new(
            local_rects[0].x,
            local_rects[0].y + thickness * 0.5,
            local_rects[0].width,
            thickness,
        )
    };
    let gap = match world.create_gap(vessels[0], gap_rect, is_horizontal, gap_linked_to, gap_id) {
        Ok(id) => id,
        Err(err) => {
            world.remove_hull(hulls[0]);
            world.remove_hull(hulls[1]);
            return Err(err);
        }
    };

    // Top and bottom walls of both hulls, in the interior frame.
    // Vertical docking gets none.
    let mut bodies = SmallVec::new();
    if is_horizontal {
        let scale = world.configs.physics.sim_scale;
        let friction = world.configs.docking.static_edge_friction;
        for rect in local_rects.iter() {
            for y in [rect.y, rect.bottom()] {
                bodies.push(world.physics.add_static_edge(
                    point![rect.x * scale, y * scale],
                    point![rect.right() * scale, y * scale],
                    friction,
                ));
            }
        }
    }

    if let Some(docking_port) = world.ports.get_mut(&port) {
        docking_port.hulls = Some(hulls);
        docking_port.gap = Some(gap);
        docking_port.bodies = bodies.clone();
        docking_port.hull_ids = [Some(hulls[0]), Some(hulls[1])];
        docking_port.gap_id = Some(gap);
    }
    if let Some(item) = world.items.get_mut(&port) {
        item.link(hulls[0]);
        item.link(hulls[1]);
        item.link(gap);
    }

    log::debug!(
        "Port {:?} merged hulls {:?} with gap {:?} between vessels {:?}",
        port,
        hulls,
        gap,
        vessels
    );

    Ok(MergedCompartments { hulls, gap, bodies })
}

/// Remove the hulls, gap and static edges `port` created.
pub fn remove_compartments(world: &mut World, port: EntityId) {
    let Some(docking_port) = world.ports.get_mut(&port) else {
        return;
    };

    let hulls = docking_port.hulls.take();
    let gap = docking_port.gap.take();
    let bodies = std::mem::take(&mut docking_port.bodies);
    docking_port.hull_ids = [None; 2];
    docking_port.gap_id = None;

    for hull in hulls.into_iter().flatten() {
        world.remove_hull(hull);
    }
    if let Some(gap) = gap {
        world.remove_gap(gap);
    }
    for body in bodies {
        world.physics.remove_body(body);
    }
}
