pub mod hull_merge;
pub mod path_link;
pub mod proximity;
pub mod state;
pub mod sync;

use super::*;
pub use hull_merge::*;
pub use path_link::*;
pub use proximity::*;
pub use state::*;
pub use sync::*;

pub const SIGNAL_TOGGLE: &str = "toggle";
pub const SIGNAL_SET_ACTIVE: &str = "set_active";
pub const SIGNAL_SET_STATE: &str = "set_state";
pub const SIGNAL_STATE_OUT: &str = "state_out";
pub const SIGNAL_PROXIMITY_SENSOR: &str = "proximity_sensor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockState {
    Undocked,
    /// Held by a spring, progress heads to 0.5.
    SoftDocked,
    /// Held rigidly with merged hulls, progress heads to 1.0.
    HardDocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub connection: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockingEvent {
    /// Sent by the port's item.
    Signal { item: EntityId, signal: Signal },
    /// The port's state changed and should be sent to replicas.
    NetworkSync { port: EntityId },
}

/// Edge of a vessel where another vessel can attach.
///
/// Registered in `World::ports` under its item's id.
#[derive(Debug, Clone)]
pub struct DockingPort {
    /// Maximum distance on each axis to another port for them to dock.
    pub distance_tolerance: Vector<Real>,
    /// Distance between the two ports once hard docked.
    pub docked_distance: f32,
    pub is_horizontal: bool,

    docking_target: Option<EntityId>,
    docked: bool,
    /// `[0..1]`
    progress: f32,
    /// Direction the target is in along the docking axis.
    docking_dir: i8,

    joint: Option<DockingJoint>,
    hulls: Option<[EntityId; 2]>,
    gap: Option<EntityId>,
    bodies: SmallVec<[RigidBodyHandle; 4]>,

    /// Ids the next hulls/gap will take. Set by the server on replicas.
    hull_ids: [Option<EntityId>; 2],
    gap_id: Option<EntityId>,
}
impl DockingPort {
    pub fn new(is_horizontal: bool) -> Self {
        Self {
            distance_tolerance: vector![32.0, 32.0],
            docked_distance: 32.0,
            is_horizontal,
            docking_target: None,
            docked: false,
            progress: 0.0,
            docking_dir: 0,
            joint: None,
            hulls: None,
            gap: None,
            bodies: SmallVec::new(),
            hull_ids: [None; 2],
            gap_id: None,
        }
    }

    pub fn docking_target(&self) -> Option<EntityId> {
        self.docking_target
    }

    pub fn is_docked(&self) -> bool {
        self.docked
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn docking_dir(&self) -> i8 {
        self.docking_dir
    }

    pub fn joint(&self) -> Option<DockingJoint> {
        self.joint
    }

    pub fn hulls(&self) -> Option<[EntityId; 2]> {
        self.hulls
    }

    pub fn gap(&self) -> Option<EntityId> {
        self.gap
    }

    pub fn static_bodies(&self) -> &[RigidBodyHandle] {
        &self.bodies
    }

    pub fn hull_ids(&self) -> [Option<EntityId>; 2] {
        self.hull_ids
    }

    pub fn gap_id(&self) -> Option<EntityId> {
        self.gap_id
    }

    /// Each id is looked up once, so `changes` may chain (5 to 6, 6 to 7).
    pub(crate) fn replace_structure_ids(&mut self, changes: &[(EntityId, EntityId)]) {
        let replace = |id: &mut EntityId| {
            if let Some((_, new)) = changes.iter().find(|(old, _)| *old == *id) {
                *id = *new;
            }
        };

        if let Some(hulls) = self.hulls.as_mut() {
            hulls.iter_mut().for_each(replace);
        }
        self.gap.iter_mut().for_each(replace);
        self.hull_ids.iter_mut().flatten().for_each(replace);
        self.gap_id.iter_mut().for_each(replace);
    }
}
impl Default for DockingPort {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Register `port` on `item`.
pub fn add_docking_port(
    world: &mut World,
    item: EntityId,
    port: DockingPort,
) -> anyhow::Result<()> {
    if !world.items.contains_key(&item) {
        anyhow::bail!("Can not add docking port to missing item {:?}", item);
    }
    if world.ports.contains_key(&item) {
        anyhow::bail!("Item {:?} already has a docking port", item);
    }

    world.ports.insert(item, port);
    Ok(())
}

/// Undock and unregister.
pub fn remove_docking_port(world: &mut World, item: EntityId) -> Option<DockingPort> {
    undock(world, item);
    world.ports.shift_remove(&item)
}

/// State of the pair the port is in. Both ports of a pair report the same state.
pub fn dock_state(world: &World, port: EntityId) -> DockState {
    let Some(port) = world.ports.get(&port) else {
        return DockState::Undocked;
    };
    let Some(target) = port.docking_target else {
        return DockState::Undocked;
    };

    let joint = port
        .joint
        .or_else(|| world.ports.get(&target).and_then(|target| target.joint));
    match joint {
        Some(joint) if joint.compliant => DockState::SoftDocked,
        Some(_) => DockState::HardDocked,
        None => DockState::Undocked,
    }
}
