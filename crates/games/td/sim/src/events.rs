use crate::config::{EnemyKind, TowerKind};
use crate::economy::{PlacementError, SellError};
use crate::world::{EnemyId, TowerId};

#[derive(Clone, Debug, PartialEq)]
pub enum TdEvent {
    WaveStarted {
        wave: u32,
    },
    WaveCleared {
        wave: u32,
    },
    EnemySpawned {
        id: EnemyId,
        kind: EnemyKind,
        path: usize,
    },
    EnemyLeaked {
        id: EnemyId,
        life_loss: u32,
    },
    EnemyKilled {
        id: EnemyId,
        reward: u32,
    },
    /// Teardown finished after a kill.
    EnemyRemoved {
        id: EnemyId,
    },
    ProjectileFired {
        tower: TowerId,
        target: EnemyId,
    },
    TowerPlaced {
        id: TowerId,
        kind: TowerKind,
        col: u16,
        row: u16,
        cost: u32,
    },
    TowerSold {
        id: TowerId,
        refund: u32,
    },
    PlacementRejected {
        kind: TowerKind,
        col: u16,
        row: u16,
        reason: PlacementError,
    },
    SaleRejected {
        reason: SellError,
    },
    Paused,
    Resumed,
    /// Pushed at the end of any tick that changed money, lives or wave.
    Hud {
        money: u32,
        lives: u32,
        wave: u32,
    },
    GameOver,
    Victory,
}
