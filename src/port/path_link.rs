use super::*;

/// Link every path node inside one port to every path node inside the other.
pub fn link_waypoints(world: &mut World, port: EntityId, target: EntityId) {
    let (Some(item), Some(target_item)) = (world.items.get(&port), world.items.get(&target)) else {
        return;
    };

    let nodes = world.waypoints.path_nodes_in(item.vessel, &item.rect);
    let target_nodes = world
        .waypoints
        .path_nodes_in(target_item.vessel, &target_item.rect);

    for node in nodes.iter().copied() {
        for target_node in target_nodes.iter().copied() {
            world.waypoints.link(node, target_node);
        }
    }
}

/// Remove links from `vessel`'s path nodes to `other`'s nodes.
/// Links within a vessel are kept.
pub fn unlink_waypoints(world: &mut World, vessel: EntityId, other: EntityId) {
    let graph = &world.waypoints;

    let crossing = graph
        .nodes
        .iter()
        .filter(|(_, node)| node.vessel == vessel && node.spawn_type == SpawnType::Path)
        .flat_map(|(id, node)| {
            node.links
                .iter()
                .copied()
                .filter(move |linked| {
                    graph
                        .nodes
                        .get(linked)
                        .is_some_and(|linked| linked.vessel == other)
                })
                .map(move |linked| (*id, linked))
        })
        .collect::<Vec<_>>();

    for (a, b) in crossing {
        world.waypoints.unlink(a, b);
    }
}
