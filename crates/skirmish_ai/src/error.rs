//! Error types for enemy profiles

use thiserror::Error;

/// Reasons an [`EnemyProfile`](crate::profile::EnemyProfile) cannot drive an agent
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("enemy max_health must be positive")]
    ZeroHealth,

    #[error("enemy magazine_size must be positive")]
    EmptyMagazine,

    #[error("enemy needs at least one patrol point")]
    NoPatrolPoints,

    /// The agent would give up the chase before it could shoot
    #[error("shoot_range {shoot_range} exceeds the chase give-up range {give_up_range}")]
    ShootRangeBeyondChase { shoot_range: f32, give_up_range: f32 },

    #[error("retreat threshold {threshold} exceeds max_health {max_health}")]
    ThresholdAboveMaxHealth { threshold: u32, max_health: u32 },
}
