use super::*;
use bytes::{Buf, BufMut};

/// Docking state of a port as sent to replicas.
///
/// Wire layout, little endian:
/// - u8: docked
/// - if docked: u16 target item, u16 hull 0, u16 hull 1, u16 gap
///
/// Ids the authority does not have yet (soft docked) are sent as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockingSync {
    Undocked,
    Docked {
        target: EntityId,
        hulls: [Option<EntityId>; 2],
        gap: Option<EntityId>,
    },
}
impl DockingSync {
    pub const UNDOCKED_LEN: usize = 1;
    pub const DOCKED_LEN: usize = 9;

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::DOCKED_LEN);
        buf.put_docking_sync(self);
        buf
    }

    pub fn decode(mut bytes: &[u8]) -> anyhow::Result<Self> {
        bytes.get_docking_sync()
    }
}

pub trait DockingSyncEncoding: BufMut {
    /// Advance by 1 or 9.
    fn put_docking_sync(&mut self, sync: &DockingSync) {
        match sync {
            DockingSync::Undocked => self.put_u8(0),
            DockingSync::Docked { target, hulls, gap } => {
                self.put_u8(1);
                self.put_u16_le(target.as_u16());
                self.put_u16_le(hulls[0].map(EntityId::as_u16).unwrap_or(0));
                self.put_u16_le(hulls[1].map(EntityId::as_u16).unwrap_or(0));
                self.put_u16_le(gap.map(EntityId::as_u16).unwrap_or(0));
            }
        }
    }
}
impl DockingSyncEncoding for Vec<u8> {}
impl DockingSyncEncoding for bytes::BytesMut {}

pub trait DockingSyncDecoding: Buf {
    fn get_docking_sync(&mut self) -> anyhow::Result<DockingSync> {
        if self.remaining() < DockingSync::UNDOCKED_LEN {
            anyhow::bail!("Buffer too small for docking sync");
        }

        if self.get_u8() == 0 {
            return Ok(DockingSync::Undocked);
        }

        if self.remaining() < DockingSync::DOCKED_LEN - 1 {
            anyhow::bail!(
                "Buffer too small for docked sync, {} bytes remaining",
                self.remaining()
            );
        }

        let target = self.get_u16_le();
        let hull0 = self.get_u16_le();
        let hull1 = self.get_u16_le();
        let gap = self.get_u16_le();

        let Some(target) = EntityId::from_u16(target) else {
            anyhow::bail!("Docked sync without a target");
        };

        Ok(DockingSync::Docked {
            target,
            hulls: [EntityId::from_u16(hull0), EntityId::from_u16(hull1)],
            gap: EntityId::from_u16(gap),
        })
    }
}
impl DockingSyncDecoding for &[u8] {}
impl DockingSyncDecoding for bytes::Bytes {}

/// State of `port` to send to replicas.
pub fn write_docking_sync(world: &World, port: EntityId) -> Option<DockingSync> {
    let docking_port = world.ports.get(&port)?;

    let Some(target) = docking_port.docking_target.filter(|_| docking_port.docked) else {
        return Some(DockingSync::Undocked);
    };

    // Hulls belong to whichever port of the pair merged them.
    let owner = [Some(docking_port), world.ports.get(&target)]
        .into_iter()
        .flatten()
        .find(|p| p.hulls.is_some())
        .unwrap_or(docking_port);

    Some(DockingSync::Docked {
        target,
        hulls: owner.hull_ids,
        gap: owner.gap_id,
    })
}

/// Apply a state received from the authority.
///
/// Rejected messages are logged and change nothing.
pub fn read_docking_sync(
    world: &mut World,
    port: EntityId,
    sync: DockingSync,
) -> Result<(), DockingError> {
    if !world.ports.contains_key(&port) {
        log::error!("Docking sync for unknown port {:?}", port);
        return Err(DockingError::UnknownPort(port));
    }

    match sync {
        DockingSync::Undocked => {
            undock(world, port);
            Ok(())
        }
        DockingSync::Docked { target, hulls, gap } => {
            let err = match world.entity(target) {
                None => Some(DockingError::MissingEntity(target)),
                Some(EntityKind::Item) if !world.ports.contains_key(&target) => {
                    Some(DockingError::MissingDockingPort(target))
                }
                Some(EntityKind::Item) => None,
                Some(_) => Some(DockingError::NotAnItem(target)),
            };
            if let Some(err) = err {
                log::error!("Invalid docking port network event: {}", err);
                return Err(err);
            }

            // Docking first, leaving a previous target would clear the adopted ids.
            dock(world, port, target)?;
            adopt_structure_ids(world, port, target, hulls, gap);

            Ok(())
        }
    }
}

/// Make the pair's hulls and gap use the authority's ids, now or once created.
///
/// Ids are stored on both ports since either may end up merging.
fn adopt_structure_ids(
    world: &mut World,
    port: EntityId,
    target: EntityId,
    hull_ids: [Option<EntityId>; 2],
    gap_id: Option<EntityId>,
) {
    let merged = [(port, target), (target, port)]
        .into_iter()
        .find_map(|(id, partner)| {
            let docking_port = world.ports.get(&id)?;
            if docking_port.docking_target != Some(partner) {
                return None;
            }
            Some((id, docking_port.hulls?, docking_port.gap))
        });

    let (hull_ids, gap_id) = match merged {
        Some((owner, hulls, gap)) => {
            let mut changes = SmallVec::<[(EntityId, EntityId); 3]>::new();
            changes.extend(
                hulls
                    .into_iter()
                    .zip(hull_ids)
                    .filter_map(|(old, new)| Some((old, new?))),
            );
            changes.extend(gap.zip(gap_id));

            if let Err(err) = world.reassign_structure_ids(&changes) {
                log::error!("Could not adopt structure ids {:?}: {}", changes, err);
            }

            // Only what actually took effect.
            match world.ports.get(&owner) {
                Some(owner) => (owner.hull_ids, owner.gap_id),
                None => return,
            }
        }
        None => (hull_ids, gap_id),
    };

    for id in [port, target] {
        if let Some(docking_port) = world.ports.get_mut(&id) {
            for (pending, new) in docking_port.hull_ids.iter_mut().zip(hull_ids) {
                if new.is_some() {
                    *pending = new;
                }
            }
            if gap_id.is_some() {
                docking_port.gap_id = gap_id;
            }
        }
    }
}
