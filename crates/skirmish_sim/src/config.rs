//! Simulation configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variable: `SKIRMISH_SEED=1234`
//! 2. Config file passed to [`SimConfig::load`]
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! seed = 42
//! level_complete_delay = 0.5
//!
//! [physics]
//! gravity = -20.0
//!
//! [enemy]
//! accuracy = 0.6
//! detection_range = 30.0
//!
//! [player]
//! max_health = 150
//!
//! [hit]
//! enemy_radius = 3.0
//! ```
//!
//! Every section and field is optional.

use crate::error::ConfigError;
use crate::level::MAX_LEVEL;
use crate::player::PlayerConfig;
use serde::{Deserialize, Serialize};
use skirmish_ai::EnemyProfile;
use skirmish_combat::HitConfig;
use skirmish_physics::PhysicsConfig;
use std::path::Path;

/// Environment variable overriding the RNG seed
pub const SEED_ENV: &str = "SKIRMISH_SEED";

/// Complete simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for every random draw in the simulation
    pub seed: u64,
    /// Seconds between the last kill and the level-complete signal
    pub level_complete_delay: f32,
    /// Last level; advancing past it completes the game
    pub max_level: u32,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyProfile,
    pub hit: HitConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            level_complete_delay: 0.5,
            max_level: MAX_LEVEL,
            physics: PhysicsConfig::default(),
            player: PlayerConfig::default(),
            enemy: EnemyProfile::default(),
            hit: HitConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse from TOML text. Missing fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut config: Self = toml::from_str(&content)?;
        log::info!("Loaded config from {}", path.display());
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `SKIRMISH_SEED` if set
    pub fn apply_env_overrides(&mut self) {
        let value = std::env::var(SEED_ENV).ok();
        self.override_seed(value.as_deref());
    }

    /// Replace the seed from a textual value; bad values are ignored
    pub fn override_seed(&mut self, value: Option<&str>) -> bool {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return false;
        };
        match value.parse() {
            Ok(seed) => {
                self.seed = seed;
                log::info!("Seed from env: {}", seed);
                true
            }
            Err(e) => {
                log::warn!("Ignoring {}={:?}: {}", SEED_ENV, value, e);
                false
            }
        }
    }

    /// Check the values describe a workable simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        self.enemy.validate()?;
        self.player.validate()?;

        if self.max_level == 0 || self.max_level > MAX_LEVEL {
            return Err(ConfigError::Invalid(format!(
                "max_level {} outside 1..={}",
                self.max_level, MAX_LEVEL
            )));
        }
        if self.level_complete_delay < 0.0 {
            return Err(ConfigError::Invalid(
                "level_complete_delay must not be negative".into(),
            ));
        }
        if self.hit.player_radius <= 0.0 || self.hit.enemy_radius <= 0.0 {
            return Err(ConfigError::Invalid("hit radii must be positive".into()));
        }
        if self.hit.zones.offsets.is_empty() {
            return Err(ConfigError::Invalid("at least one hit zone is required".into()));
        }
        Ok(())
    }
}
