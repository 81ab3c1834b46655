use crate::config::TowerKind;
use crate::world::TowerId;

/// Input from the UI layer. Tile coordinates are already resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum TdAction {
    PlaceTower { kind: TowerKind, col: u16, row: u16 },
    SellTower { tower: TowerId },
    /// Sell whatever tower stands on the tile.
    SellAt { col: u16, row: u16 },
    SetPaused(bool),
    /// Start over on the same map and config.
    Restart,
}
