use crate::ids::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DockingError {
    #[error("tried to dock vessel {0:?} to itself")]
    SelfDock(EntityId),
    #[error("entity {0:?} does not exist")]
    MissingEntity(EntityId),
    #[error("entity {0:?} is not an item")]
    NotAnItem(EntityId),
    #[error("item {0:?} doesn't have a docking port")]
    MissingDockingPort(EntityId),
    #[error("no hull prefab to create compartments from")]
    MissingHullPrefab,
    #[error("docking port {0:?} is not registered")]
    UnknownPort(EntityId),
}
