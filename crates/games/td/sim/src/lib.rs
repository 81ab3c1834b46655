pub mod actions;
pub mod config;
pub mod economy;
pub mod enemy;
pub mod error;
pub mod events;
pub mod game;
pub mod map;
pub mod observe;
pub mod pathing;
pub mod projectile;
pub mod systems;
pub mod timers;
pub mod tower;
pub mod waves;
pub mod world;

pub use actions::TdAction;
pub use config::{EnemyKind, TdConfig, TowerKind};
pub use economy::{PlacementError, SellError};
pub use error::TdError;
pub use events::TdEvent;
pub use game::TdGame;
pub use map::{MapError, MapKind, Tile, TileMap};
pub use world::{EnemyId, ProjectileId, TdState, TowerId};
