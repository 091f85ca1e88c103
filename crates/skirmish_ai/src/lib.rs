//! Skirmish AI - Enemy Agents
//!
//! This crate provides the decision making for enemy combatants.
//!
//! # Features
//!
//! - Generic prioritized finite state machine with a state timer
//! - Enemy brain: idle, patrol, chase, shoot, reload and retreat
//! - Line-of-sight perception through the collider registry
//! - Tactical positioning, flanking and cover selection
//!
//! # Example
//!
//! ```ignore
//! use skirmish_ai::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
//! let mut enemy = Enemy::new(0, Vec3::new(20.0, 0.0, 20.0), EnemyProfile::default());
//!
//! let report = enemy.update(&registry, &physics, player_position, &mut rng, 0.016);
//! if let Some(shot) = report.fired {
//!     audio.play("rifle_shot", 0.2);
//! }
//! ```

pub mod agent;
pub mod brain;
pub mod error;
pub mod perception;
pub mod profile;
pub mod state_machine;
pub mod tactics;

pub mod prelude {
    pub use crate::agent::{Enemy, EnemyReport, FiredShot};
    pub use crate::brain::{build_brain, AiContext, EnemyBrain, EnemyState};
    pub use crate::error::ProfileError;
    pub use crate::perception::{has_line_of_sight, Sighting};
    pub use crate::profile::EnemyProfile;
    pub use crate::state_machine::{State, StateMachine, Transition};
    pub use crate::tactics::{cover_away_from, nearest_cover, patrol_route, tactical_position};
    pub use glam::Vec3;
}

pub use prelude::*;
