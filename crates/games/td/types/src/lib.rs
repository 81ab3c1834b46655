//! Canonical serializable types for the Tower Defense game.
//!
//! Produced by `sim_td` every tick and consumed read-only by whatever renders
//! the board or drives the HUD. Nothing in here can mutate simulation state.

use serde::{Deserialize, Serialize};

/// Pixel-space point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// The three values the HUD displays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub money: u32,
    pub lives: u32,
    pub wave: u32,
}

/// Dominant direction of travel, for picking a walk animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

/// Current wave status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WaveStatus {
    /// Waiting for the next wave to start.
    Pause {
        /// Wave number that starts next.
        next_wave: u32,
        /// Simulation clock tick when it starts, if scheduled.
        #[serde(default)]
        starts_at: Option<u64>,
    },
    /// A wave is in progress.
    InWave {
        /// Spawn instructions still queued (each fires once per spawn point).
        spawns_remaining: u32,
        /// Enemies spawned so far this wave.
        spawned: u32,
    },
}

impl Default for WaveStatus {
    fn default() -> Self {
        Self::Pause {
            next_wave: 1,
            starts_at: None,
        }
    }
}

/// Information about an enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyInfo {
    pub id: String,
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub heading: Heading,
    pub dying: bool,
    pub health: i32,
    pub max_health: i32,
}

/// Information about a tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerInfo {
    pub id: String,
    pub kind: String,
    pub col: u16,
    pub row: u16,
    pub x: f32,
    pub y: f32,
    pub range: f32,
    /// Enemy currently locked on, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Information about a projectile in flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileInfo {
    pub x: f32,
    pub y: f32,
}

/// Shop entry for one tower archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerOffer {
    pub kind: String,
    pub cost: u32,
    pub placed: u32,
    pub limit: u32,
}

/// Full game state observation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TdObservation {
    pub tick: u64,
    pub clock: u64,
    pub ticks_per_second: u32,
    pub paused: bool,
    /// "win", "lose", or absent while the game runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,

    pub map_width: u16,
    pub map_height: u16,
    pub tile_size: f32,

    pub hud: Hud,
    pub waves_total: Option<u32>,
    pub wave_status: WaveStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<Vec<Point>>,

    pub offers: Vec<TowerOffer>,
    pub towers: Vec<TowerInfo>,
    pub enemies: Vec<EnemyInfo>,
    pub projectiles: Vec<ProjectileInfo>,
}
