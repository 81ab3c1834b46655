use crate::map::MapError;
use thiserror::Error;

/// Fatal errors raised while building a game. Nothing after construction fails.
#[derive(Debug, Error)]
pub enum TdError {
    #[error("invalid map: {0}")]
    Map(#[from] MapError),

    /// The map resolved to zero spawn paths, so no wave could ever spawn.
    #[error("map has no usable spawn point or no goal")]
    NoSpawnPoints,

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("tick rate must be positive")]
    ZeroTickRate,
}
