pub mod structure;
pub mod waypoint;
pub mod wire;

use super::*;
pub use structure::*;
pub use waypoint::*;
pub use wire::*;

/// Simulation context of the docking subsystem.
///
/// Ports are updated in registry order, then physics is stepped.
pub struct World {
    pub configs: Configs,
    pub tick: u64,
    pub physics: Physics,

    pub entity_ids: EntityIdDispenser,
    pub vessels: IndexMap<EntityId, Vessel, RandomState>,
    pub items: IndexMap<EntityId, Item, RandomState>,
    pub structures: Structures,
    pub waypoints: WaypointGraph,

    /// Every docking port keyed by its item.
    /// Iteration order is registration order.
    pub ports: IndexMap<EntityId, DockingPort, RandomState>,

    /// Produced by ports, drained by whoever runs the world.
    /// Signals only last one tick, undrained ones are dropped by the next `step`.
    pub events: Vec<DockingEvent>,
}
impl World {
    pub fn new(configs: Configs) -> Self {
        Self {
            physics: Physics::new(&configs.physics),
            configs,
            tick: 0,
            entity_ids: Default::default(),
            vessels: Default::default(),
            items: Default::default(),
            structures: Default::default(),
            waypoints: Default::default(),
            ports: Default::default(),
            events: Default::default(),
        }
    }

    pub fn step(&mut self) {
        self.tick += 1;
        self.events
            .retain(|event| !matches!(event, DockingEvent::Signal { .. }));

        let dt = self.configs.physics.dt;

        let mut port_idx = 0;
        while let Some((&port_id, _)) = self.ports.get_index(port_idx) {
            update_port(self, port_id, dt);
            port_idx += 1;
        }

        self.physics.step();
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, DockingEvent> {
        self.events.drain(..)
    }

    pub fn entity(&self, id: EntityId) -> Option<EntityKind> {
        if self.items.contains_key(&id) {
            Some(EntityKind::Item)
        } else if self.structures.hulls.contains_key(&id) {
            Some(EntityKind::Hull)
        } else if self.structures.gaps.contains_key(&id) {
            Some(EntityKind::Gap)
        } else if self.vessels.contains_key(&id) {
            Some(EntityKind::Vessel)
        } else {
            None
        }
    }

    /// Take `wanted` if it is free, otherwise a fresh id.
    pub(crate) fn take_entity_id(&mut self, wanted: Option<EntityId>) -> anyhow::Result<EntityId> {
        if let Some(wanted) = wanted {
            if self.entity_ids.claim(wanted) {
                return Ok(wanted);
            }
            log::warn!("Entity id {:?} already in use, dispensing a new one", wanted);
        }

        self.entity_ids
            .new_id()
            .ok_or_else(|| anyhow::anyhow!("Out of entity ids"))
    }

    /// `world_position` is where the vessel's origin is in the world.
    /// `hidden_position` is the same origin in the vessel's interior frame.
    pub fn spawn_vessel(
        &mut self,
        world_position: Vector<Real>,
        hidden_position: Vector<Real>,
        mass: f32,
    ) -> anyhow::Result<EntityId> {
        let id = self.take_entity_id(None)?;

        let body = self.physics.add_vessel_body(
            id,
            world_position * self.configs.physics.sim_scale,
            mass,
            self.configs.physics.vessel_linear_damping,
        );

        self.vessels.insert(
            id,
            Vessel {
                body,
                hidden_position,
                docked_to: SmallVec::new(),
                hull_grid: Default::default(),
            },
        );

        Ok(id)
    }

    /// `rect` is in the vessel's interior frame.
    pub fn spawn_item(&mut self, vessel: EntityId, rect: Rect) -> anyhow::Result<EntityId> {
        if !self.vessels.contains_key(&vessel) {
            anyhow::bail!("Can not spawn item on missing vessel {:?}", vessel);
        }

        let id = self.take_entity_id(None)?;
        self.items.insert(
            id,
            Item {
                vessel,
                rect,
                linked_to: SmallVec::new(),
                connections: SmallVec::new(),
                wire: None,
            },
        );

        Ok(id)
    }

    /// Position of the vessel's origin in display units.
    pub fn vessel_world_position(&self, vessel: EntityId) -> Option<Vector<Real>> {
        let vessel = self.vessels.get(&vessel)?;
        Some(self.physics.body(vessel.body).translation() / self.configs.physics.sim_scale)
    }

    /// Add this to an interior frame position to get its world position.
    pub fn vessel_offset(&self, vessel: EntityId) -> Option<Vector<Real>> {
        let world_position = self.vessel_world_position(vessel)?;
        Some(world_position - self.vessels.get(&vessel)?.hidden_position)
    }

    pub fn set_vessel_velocity(&mut self, vessel: EntityId, linvel: Vector<Real>) {
        if let Some(body) = self.vessels.get(&vessel).map(|vessel| vessel.body) {
            let scale = self.configs.physics.sim_scale;
            self.physics.body_mut(body).set_linvel(linvel * scale, true);
        }
    }

    pub fn item_world_rect(&self, item: EntityId) -> Option<Rect> {
        let item = self.items.get(&item)?;
        Some(item.rect.offset(self.vessel_offset(item.vessel)?))
    }

    pub fn item_world_position(&self, item: EntityId) -> Option<Vector<Real>> {
        self.item_world_rect(item).map(|rect| rect.center())
    }

    pub fn are_docked(&self, a: EntityId, b: EntityId) -> bool {
        self.vessels
            .get(&a)
            .is_some_and(|vessel| vessel.docked_to.contains(&b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Vessel,
    Item,
    Hull,
    Gap,
}

pub struct Vessel {
    pub body: RigidBodyHandle,
    pub hidden_position: Vector<Real>,
    /// Symmetric.
    pub docked_to: SmallVec<[EntityId; 2]>,
    pub hull_grid: HullGrid,
}

pub struct Item {
    pub vessel: EntityId,
    /// Interior frame.
    pub rect: Rect,
    /// Link records kept for saving and signals.
    pub linked_to: SmallVec<[EntityId; 4]>,
    pub connections: SmallVec<[Connection; 2]>,
    pub wire: Option<Wire>,
}
impl Item {
    pub fn link(&mut self, other: EntityId) {
        if !self.linked_to.contains(&other) {
            self.linked_to.push(other);
        }
    }

    pub fn power_connection(&self) -> Option<usize> {
        self.connections.iter().position(|c| c.is_power)
    }
}
