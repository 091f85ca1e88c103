//! Skirmish Combat - Health, Weapons and Projectiles
//!
//! This crate provides the combat primitives shared by the player and the
//! enemy agents.
//!
//! # Features
//!
//! - Integer health clamped to `[0, max]` with edge-triggered death
//! - Magazine weapons with fire cooldown, reserve ammo and timed reloads
//! - Straight-line projectiles with lifetime expiry
//! - Multi-zone hit testing against combatant bodies
//!
//! # Example
//!
//! ```ignore
//! use skirmish_combat::prelude::*;
//!
//! let mut rifle = Weapon::new(WeaponProfile::rifle());
//! let mut pool = ProjectilePool::new();
//!
//! if let Some(shot) = rifle.fire() {
//!     pool.spawn(eye, forward, shot.bullet_speed, shot.damage);
//! }
//!
//! for projectile in pool.active_mut() {
//!     if let Some(hit) = resolve_hit(projectile, &mut enemy, &HitZones::default(), 3.0) {
//!         println!("dealt {} (killed: {})", hit.dealt, hit.killed);
//!     }
//! }
//! ```

pub mod health;
pub mod hit;
pub mod projectile;
pub mod weapon;

pub mod prelude {
    pub use crate::health::{DamageOutcome, Health};
    pub use crate::hit::{resolve_hit, Combatant, HitConfig, HitOutcome, HitZones};
    pub use crate::projectile::{Projectile, ProjectilePool, DEFAULT_MAX_LIFETIME};
    pub use crate::weapon::{ReloadAttempt, Shot, Weapon, WeaponKind, WeaponProfile};
}

pub use prelude::*;
