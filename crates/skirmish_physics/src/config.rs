//! Physics configuration

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};

/// Movement and collision tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical acceleration in units/s² (negative is down)
    pub gravity: f32,

    /// Horizontal half-width of a combatant body box
    pub body_radius: f32,

    /// Height of a combatant body box, measured up from the feet
    pub body_height: f32,

    /// How far above the feet the ground probe starts
    pub ground_probe_offset: f32,

    /// Length of the downward ground probe
    pub ground_probe_length: f32,

    /// Horizontal velocity multiplier per tick when there is no movement intent
    pub idle_damping: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -20.0,
            body_radius: 0.5,
            body_height: 1.8,
            ground_probe_offset: 0.1,
            ground_probe_length: 0.2,
            idle_damping: 0.8,
        }
    }
}

impl PhysicsConfig {
    /// Reject values the resolver cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.body_radius <= 0.0 || self.body_height <= 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "body must have positive extents (radius {}, height {})",
                self.body_radius, self.body_height
            )));
        }
        if self.ground_probe_length <= self.ground_probe_offset {
            return Err(PhysicsError::InvalidConfig(
                "ground probe must reach below the feet".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.idle_damping) {
            return Err(PhysicsError::InvalidConfig(format!(
                "idle damping {} outside [0, 1]",
                self.idle_damping
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PhysicsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_short_probe() {
        let config = PhysicsConfig {
            ground_probe_length: 0.05,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
