use super::*;
use std::{collections::VecDeque, num::NonZeroU16};

/// Shared id namespace of vessels, items, hulls and gaps.
///
/// `0` is never dispensed and stands for "no entity" on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(NonZeroU16);
impl EntityId {
    pub fn from_u16(id: u16) -> Option<Self> {
        NonZeroU16::new(id).map(Self)
    }

    pub fn as_u16(self) -> u16 {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WaypointId(pub u32);

/// Takes up 2^16 * 2 bytes of memory.
#[derive(Clone, Serialize, Deserialize)]
pub struct EntityIdDispenser {
    free: VecDeque<u16>,
    used: AHashSet<u16>,
}
impl EntityIdDispenser {
    pub fn new_id(&mut self) -> Option<EntityId> {
        while let Some(id) = self.free.pop_front() {
            if self.used.insert(id) {
                return EntityId::from_u16(id);
            }
        }
        None
    }

    /// Take a specific id, eg. one assigned by the server.
    ///
    /// Returns `false` if the id was already in use.
    pub fn claim(&mut self, id: EntityId) -> bool {
        // The stale copy left in `free` is skipped by `new_id`.
        self.used.insert(id.as_u16())
    }

    pub fn delete_id(&mut self, id: EntityId) {
        if self.used.remove(&id.as_u16()) {
            self.free.push_back(id.as_u16());
        }
    }

    pub fn is_used(&self, id: EntityId) -> bool {
        self.used.contains(&id.as_u16())
    }
}
impl Default for EntityIdDispenser {
    fn default() -> Self {
        Self {
            free: (1..=u16::MAX).collect(),
            used: Default::default(),
        }
    }
}
