use crate::error::TdError;
use crate::map::MapKind;
use serde::{Deserialize, Serialize};
use sim_core::Micros;

/// Enemy archetypes. Behavior differs only through [`EnemySpec`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnemyKind {
    /// Fast, low health. The bulk of every wave.
    Runner,
    /// Slow, high health, costly to leak.
    Brute,
    /// Very fast, very low health.
    Dart,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Runner, EnemyKind::Brute, EnemyKind::Dart];

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Runner => "Runner",
            EnemyKind::Brute => "Brute",
            EnemyKind::Dart => "Dart",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    /// Pixels per second before wave scaling.
    pub speed: f32,
    pub health: i32,
    pub life_loss: u32,
    pub reward: u32,
}

/// Tower archetypes. Behavior differs only through [`TowerSpec`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TowerKind {
    Basic,
    Fast,
    LongRange,
}

impl TowerKind {
    pub const ALL: [TowerKind; 3] = [TowerKind::Basic, TowerKind::Fast, TowerKind::LongRange];

    pub fn index(self) -> usize {
        match self {
            TowerKind::Basic => 0,
            TowerKind::Fast => 1,
            TowerKind::LongRange => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TowerKind::Basic => "Basic",
            TowerKind::Fast => "Fast",
            TowerKind::LongRange => "LongRange",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerSpec {
    /// Price of the first tower of this kind; also the basis of the sell refund.
    pub cost: u32,
    /// Added to the price for every tower of this kind already standing.
    pub cost_step: u32,
    /// Targeting radius in pixels.
    pub range: f32,
    pub fire_period_ms: u32,
    /// Maximum standing towers of this kind before any map bonus.
    pub limit: u32,
}

impl TowerSpec {
    pub fn fire_period(&self) -> Micros {
        Micros::from_millis(self.fire_period_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub speed: f32,
    pub damage: i32,
    pub hit_radius: f32,
}

/// Obstacle scattering applied to buildable tiles after the layout is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleParams {
    pub max_adjacent: usize,
    pub max_distant: usize,
    pub max_total: usize,
}

impl Default for ObstacleParams {
    fn default() -> Self {
        Self {
            max_adjacent: 5,
            max_distant: 7,
            max_total: 12,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TdConfig {
    pub map: MapKind,
    /// ASCII rows that replace the built-in layout when present.
    pub layout: Option<Vec<String>>,
    pub obstacles: Option<ObstacleParams>,
    /// Overrides the map's per-kind tower limit bonus.
    pub limit_bonus: Option<u32>,
    pub tile_size: f32,
    pub tick_hz: u32,
    /// Clearing this wave with lives left wins the game. `None` plays forever.
    pub waves_total: Option<u32>,

    // Wave pacing
    pub first_wave_delay_ms: u32,
    pub inter_wave_pause_ms: u32,
    pub spawn_interval_ms: u32,
    pub dart_delay_ms: u32,
    pub brute_delay_ms: u32,
    pub brute_after_last_runner_ms: u32,

    // Agents
    pub waypoint_radius: f32,
    pub teardown_ms: u32,
    pub runner: EnemySpec,
    pub brute: EnemySpec,
    pub dart: EnemySpec,
    pub basic: TowerSpec,
    pub fast: TowerSpec,
    pub long_range: TowerSpec,
    pub projectile: ProjectileSpec,

    // Economy
    pub money_start: u32,
    pub lives_start: u32,
}

impl TdConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, TdError> {
        Ok(toml::from_str(s)?)
    }

    pub fn enemy(&self, kind: EnemyKind) -> &EnemySpec {
        match kind {
            EnemyKind::Runner => &self.runner,
            EnemyKind::Brute => &self.brute,
            EnemyKind::Dart => &self.dart,
        }
    }

    pub fn tower(&self, kind: TowerKind) -> &TowerSpec {
        match kind {
            TowerKind::Basic => &self.basic,
            TowerKind::Fast => &self.fast,
            TowerKind::LongRange => &self.long_range,
        }
    }

    pub fn duration_to_ticks(&self, d: Micros) -> u64 {
        d.to_ticks(self.tick_hz)
    }

    pub fn millis_to_ticks(&self, ms: u32) -> u64 {
        self.duration_to_ticks(Micros::from_millis(ms))
    }

    /// Seconds of simulated time covered by one tick.
    pub fn dt(&self) -> f32 {
        Micros::per_tick(self.tick_hz).as_secs_f32()
    }

    pub fn effective_limit_bonus(&self) -> u32 {
        match (self.limit_bonus, &self.layout) {
            (Some(bonus), _) => bonus,
            (None, Some(_)) => 0,
            (None, None) => self.map.limit_bonus(),
        }
    }
}

impl Default for TdConfig {
    fn default() -> Self {
        Self {
            map: MapKind::Serpentine,
            layout: None,
            obstacles: None,
            limit_bonus: None,
            tile_size: 48.0,
            tick_hz: 60,
            waves_total: Some(10),

            first_wave_delay_ms: 2_000,
            inter_wave_pause_ms: 3_000,
            spawn_interval_ms: 500,
            dart_delay_ms: 5_000,
            brute_delay_ms: 10_000,
            brute_after_last_runner_ms: 3_000,

            waypoint_radius: 2.0,
            teardown_ms: 500,
            runner: EnemySpec {
                speed: 100.0,
                health: 5,
                life_loss: 1,
                reward: 5,
            },
            brute: EnemySpec {
                speed: 60.0,
                health: 8,
                life_loss: 5,
                reward: 10,
            },
            dart: EnemySpec {
                speed: 150.0,
                health: 3,
                life_loss: 2,
                reward: 4,
            },
            basic: TowerSpec {
                cost: 20,
                cost_step: 20,
                range: 100.0,
                fire_period_ms: 1_000,
                limit: 5,
            },
            fast: TowerSpec {
                cost: 30,
                cost_step: 30,
                range: 80.0,
                fire_period_ms: 500,
                limit: 5,
            },
            long_range: TowerSpec {
                cost: 40,
                cost_step: 100,
                range: 150.0,
                fire_period_ms: 1_500,
                limit: 3,
            },
            projectile: ProjectileSpec {
                speed: 500.0,
                damage: 3,
                hit_radius: 5.0,
            },

            money_start: 100,
            lives_start: 20,
        }
    }
}
