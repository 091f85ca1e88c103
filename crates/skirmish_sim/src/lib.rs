//! Skirmish Sim - Combat Orchestration
//!
//! This crate ties the physics, combat and AI crates into a playable
//! first-person skirmish.
//!
//! # Features
//!
//! - Player controller: look, movement, stance, weapon handling and recoil
//! - Three levels of town arenas with fixed enemy spawn tables
//! - Per-tick hit resolution between every projectile and every combatant
//! - Level flow: death, respawn, level complete, game complete
//! - Pluggable input, audio and effects
//! - TOML configuration with environment overrides
//!
//! # Example
//!
//! ```ignore
//! use skirmish_sim::prelude::*;
//!
//! let config = SimConfig::load("skirmish.toml")?;
//! let mut sim = CombatSimulation::new(config)?;
//! let mut input = InputState::new();
//!
//! input.fire = true;
//! for event in sim.tick(&mut input, 1.0 / 60.0).iter() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod arena;
pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod level;
pub mod player;
pub mod services;
pub mod simulation;

pub mod prelude {
    pub use crate::arena::{FlatGround, TownArena, Vehicle};
    pub use crate::config::{SimConfig, SEED_ENV};
    pub use crate::error::{ConfigError, PlayerConfigError, Result, SimError};
    pub use crate::events::{CombatEvent, CombatEventHandler, EventCollector, Shooter};
    pub use crate::input::{InputProvider, InputState};
    pub use crate::level::{enemy_count, spawn_points, WorldBuilder, MAX_LEVEL};
    pub use crate::player::{Player, PlayerConfig, PlayerReport, PlayerShot};
    pub use crate::services::{
        sounds, AudioError, AudioSink, EffectSink, NullAudio, NullEffects, RecordingAudio,
        RecordingEffects,
    };
    pub use crate::simulation::{CombatSimulation, GameState};
    pub use glam::Vec3;
}

pub use prelude::*;
