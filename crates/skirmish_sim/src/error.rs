//! Error types for the simulation

use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not read the config file
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid physics settings: {0}")]
    Physics(#[from] skirmish_physics::PhysicsError),

    #[error("Invalid enemy profile: {0}")]
    Enemy(#[from] skirmish_ai::ProfileError),

    #[error("Invalid player settings: {0}")]
    Player(#[from] PlayerConfigError),

    /// Values that cannot produce a working simulation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Reasons a [`PlayerConfig`](crate::player::PlayerConfig) is unusable
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayerConfigError {
    #[error("player max_health must be positive")]
    ZeroHealth,

    #[error("player needs at least one weapon")]
    NoWeapons,

    #[error("weapon {weapon} has an empty magazine")]
    EmptyMagazine { weapon: String },

    #[error("recoil_decay {0} outside 0.0 - 1.0")]
    RecoilDecayOutOfRange(f32),
}

/// Simulation errors
#[derive(Debug, Error)]
pub enum SimError {
    /// Requested a level with no spawn table
    #[error("Level {level} out of range (1..={max})")]
    LevelOutOfRange { level: u32, max: u32 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Physics(#[from] skirmish_physics::PhysicsError),
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;
