//! Enemy tunables

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Per-agent constants, including the enemy's single implicit weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyProfile {
    pub max_health: u32,
    /// Base movement speed in units/s
    pub move_speed: f32,
    /// Range at which a visible target is acquired
    pub detection_range: f32,
    /// Range at which the agent opens fire
    pub shoot_range: f32,
    /// 0.0 - 1.0; aim noise shrinks as this grows
    pub accuracy: f32,
    /// Minimum seconds between shots
    pub fire_rate: f32,
    pub magazine_size: u32,
    pub reload_time: f32,
    pub bullet_speed: f32,
    pub bullet_damage: u32,

    /// Muzzle and eye height above the feet
    pub chest_height: f32,
    /// Obstruction slack near the target for line of sight
    pub sight_tolerance: f32,

    pub patrol_radius: f32,
    pub patrol_points: usize,
    /// Distance at which a movement target counts as reached
    pub reach_distance: f32,
    /// Below this distance the agent stops steering and coasts
    pub arrive_distance: f32,
    /// Seconds idle before patrolling
    pub idle_patrol_delay: f32,

    /// Chase gives up beyond `detection_range * lose_range_factor`
    pub lose_range_factor: f32,
    /// Shoot falls back to chase beyond `shoot_range * shoot_exit_factor`
    pub shoot_exit_factor: f32,
    /// Preferred engagement distance as a fraction of `shoot_range`
    pub ideal_range_factor: f32,
    /// Flank rotation in radians
    pub flank_angle: f32,

    pub retreat_health: u32,
    pub recover_health: u32,
    pub cover_distance: f32,
    pub retreat_distance: f32,

    pub retreat_speed_factor: f32,
    pub reload_speed_factor: f32,
    pub shoot_speed_factor: f32,

    pub suppression_per_hit: f32,
    /// Suppression lost per second
    pub suppression_decay: f32,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        Self {
            max_health: 100,
            move_speed: 3.0,
            detection_range: 30.0,
            shoot_range: 25.0,
            accuracy: 0.6,
            fire_rate: 0.5,
            magazine_size: 30,
            reload_time: 2.0,
            bullet_speed: 80.0,
            bullet_damage: 10,

            chest_height: 1.5,
            sight_tolerance: 1.0,

            patrol_radius: 10.0,
            patrol_points: 4,
            reach_distance: 2.0,
            arrive_distance: 0.5,
            idle_patrol_delay: 3.0,

            lose_range_factor: 1.5,
            shoot_exit_factor: 1.2,
            ideal_range_factor: 0.7,
            flank_angle: std::f32::consts::FRAC_PI_3,

            retreat_health: 30,
            recover_health: 50,
            cover_distance: 10.0,
            retreat_distance: 15.0,

            retreat_speed_factor: 1.3,
            reload_speed_factor: 0.8,
            shoot_speed_factor: 0.3,

            suppression_per_hit: 0.3,
            suppression_decay: 1.0,
        }
    }
}

impl EnemyProfile {
    /// Per-axis aim noise magnitude
    pub fn inaccuracy(&self) -> f32 {
        (1.0 - self.accuracy.clamp(0.0, 1.0)) * 0.1
    }

    /// Preferred engagement distance
    pub fn ideal_range(&self) -> f32 {
        self.shoot_range * self.ideal_range_factor
    }

    /// Check the values describe a workable agent
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.max_health == 0 {
            return Err(ProfileError::ZeroHealth);
        }
        if self.magazine_size == 0 {
            return Err(ProfileError::EmptyMagazine);
        }
        if self.patrol_points == 0 {
            return Err(ProfileError::NoPatrolPoints);
        }
        let give_up_range = self.detection_range * self.lose_range_factor;
        if self.shoot_range > give_up_range {
            return Err(ProfileError::ShootRangeBeyondChase {
                shoot_range: self.shoot_range,
                give_up_range,
            });
        }
        let threshold = self.recover_health.max(self.retreat_health);
        if threshold > self.max_health {
            return Err(ProfileError::ThresholdAboveMaxHealth {
                threshold,
                max_health: self.max_health,
            });
        }
        Ok(())
    }
}
