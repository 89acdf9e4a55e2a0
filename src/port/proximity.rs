use super::*;

/// First registered port on another vessel within `port`'s distance tolerance.
pub fn find_adjacent_port(world: &World, port: EntityId) -> Option<EntityId> {
    let tolerance = world.ports.get(&port)?.distance_tolerance;
    let vessel = world.items.get(&port)?.vessel;
    let position = world.item_world_position(port)?;

    world
        .ports
        .keys()
        .copied()
        .filter(|other| *other != port)
        .find(|other| {
            let Some(other_item) = world.items.get(other) else {
                return false;
            };
            if other_item.vessel == vessel {
                return false;
            }
            let Some(other_position) = world.item_world_position(*other) else {
                return false;
            };

            (other_position.x - position.x).abs() <= tolerance.x
                && (other_position.y - position.y).abs() <= tolerance.y
        })
}
