use super::*;

/// Where a wire end is plugged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionRef {
    pub item: EntityId,
    pub connection: usize,
}

#[derive(Debug, Clone)]
pub struct Connection {
    pub name: String,
    pub is_power: bool,
    /// Items whose wire is plugged here.
    pub wires: SmallVec<[EntityId; 4]>,
}
impl Connection {
    pub fn new(name: impl Into<String>, is_power: bool) -> Self {
        Self {
            name: name.into(),
            is_power,
            wires: SmallVec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Wire {
    pub hidden: bool,
    pub locked: bool,
    pub ends: [Option<ConnectionRef>; 2],
}

impl World {
    /// Plug a free end of `wire_item`'s wire into `to`.
    ///
    /// Returns `false` if there is no wire, no free end or no such connection.
    pub fn connect_wire(&mut self, wire_item: EntityId, to: ConnectionRef) -> bool {
        let Some(end) = self
            .items
            .get(&wire_item)
            .and_then(|item| item.wire.as_ref())
            .and_then(|wire| wire.ends.iter().position(|end| end.is_none()))
        else {
            return false;
        };

        let Some(connection) = self
            .items
            .get_mut(&to.item)
            .and_then(|item| item.connections.get_mut(to.connection))
        else {
            return false;
        };
        if !connection.wires.contains(&wire_item) {
            connection.wires.push(wire_item);
        }

        if let Some(wire) = self.items.get_mut(&wire_item).and_then(|item| item.wire.as_mut()) {
            wire.ends[end] = Some(to);
        }

        true
    }

    /// Unplug every end of `wire_item`'s wire that is plugged into `item`.
    pub fn disconnect_wire_from(&mut self, wire_item: EntityId, item: EntityId) {
        let Some(wire) = self.items.get_mut(&wire_item).and_then(|item| item.wire.as_mut()) else {
            return;
        };

        let mut unplugged = SmallVec::<[ConnectionRef; 2]>::new();
        for end in wire.ends.iter_mut() {
            if let Some(connection) = end.filter(|connection| connection.item == item) {
                unplugged.push(connection);
                *end = None;
            }
        }

        for connection in unplugged {
            self.unplug(wire_item, connection);
        }
    }

    /// Unplug both ends and release the wire.
    pub fn drop_wire(&mut self, wire_item: EntityId) {
        let Some(wire) = self.items.get_mut(&wire_item).and_then(|item| item.wire.as_mut()) else {
            return;
        };

        let ends = std::mem::take(&mut wire.ends);
        wire.hidden = false;
        wire.locked = false;

        for connection in ends.into_iter().flatten() {
            self.unplug(wire_item, connection);
        }
    }

    fn unplug(&mut self, wire_item: EntityId, connection: ConnectionRef) {
        if let Some(connection) = self
            .items
            .get_mut(&connection.item)
            .and_then(|item| item.connections.get_mut(connection.connection))
        {
            connection.wires.retain(|id| *id != wire_item);
        }
    }
}
