pub mod configs;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod logger;
pub mod physics;
pub mod port;
pub mod world;

pub use ahash::{AHashMap, AHashSet, RandomState};
pub use configs::*;
pub use error::*;
pub use geometry::*;
pub use ids::*;
pub use indexmap::IndexMap;
pub use physics::*;
pub use port::*;
pub use rapier2d::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};
pub use world::*;
