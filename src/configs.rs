use super::*;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Configs {
    pub docking: DockingConfigs,
    pub physics: PhysicsConfigs,
    pub role: NetRole,
}
impl Configs {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }
}

/// Which side of the network split this world runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NetRole {
    /// Owns the docking state and sends it.
    #[default]
    Authority,
    /// Replays docking state received from the authority.
    /// Ignores docking signals.
    Replica,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DockingConfigs {
    /// Soft joint anchors closer than this (simulation units) become a hard dock.
    pub hard_dock_threshold: f32,
    /// Docking progress moves toward its target by `min(1, progress_rate * dt)` per tick.
    pub progress_rate: f32,
    /// Without a target, `docked` is cleared once progress drops under this.
    pub undocked_progress_cutoff: f32,

    pub soft_joint_frequency: f32,
    pub soft_joint_damping_ratio: f32,
    pub rigid_joint_frequency: f32,

    /// Width of the gap straddling the seam.
    pub gap_thickness: f32,
    pub static_edge_friction: f32,

    /// Wire the two ports' power connections together on hard dock.
    pub connect_power: bool,
}
impl Default for DockingConfigs {
    fn default() -> Self {
        Self {
            hard_dock_threshold: 0.05,
            progress_rate: 10.0,
            undocked_progress_cutoff: 0.01,
            soft_joint_frequency: 1.0,
            soft_joint_damping_ratio: 0.8,
            rigid_joint_frequency: 1.0,
            gap_thickness: 4.0,
            static_edge_friction: 0.5,
            connect_power: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfigs {
    /// Seconds per tick.
    pub dt: f32,
    /// Simulation units per display unit.
    pub sim_scale: f32,
    pub vessel_linear_damping: f32,
}
impl Default for PhysicsConfigs {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            sim_scale: 0.01,
            vessel_linear_damping: 0.5,
        }
    }
}
