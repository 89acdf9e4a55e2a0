use super::*;

const KIND_OFFSET: u32 = 64;
const KIND_VESSEL: u128 = 1;
const KIND_WALL: u128 = 2;

/// - 16: vessel entity id (vessel bodies only)
/// - 48: unused
/// - 8: kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserData {
    Vessel(EntityId),
    Wall,
    /// Not created by us.
    Unknown,
}
impl UserData {
    pub fn pack(self) -> u128 {
        match self {
            UserData::Vessel(id) => id.as_u16() as u128 | KIND_VESSEL << KIND_OFFSET,
            UserData::Wall => KIND_WALL << KIND_OFFSET,
            UserData::Unknown => 0,
        }
    }

    pub fn unpack(user_data: u128) -> Self {
        match user_data >> KIND_OFFSET {
            KIND_VESSEL => EntityId::from_u16(user_data as u16)
                .map(UserData::Vessel)
                .unwrap_or(UserData::Unknown),
            KIND_WALL => UserData::Wall,
            _ => UserData::Unknown,
        }
    }
}
