//! Combatant movement: velocity integration, gravity, ground probing and pushout

use crate::aabb::Aabb;
use crate::config::PhysicsConfig;
use crate::registry::ColliderRegistry;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How a body is held vertically
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Footing {
    /// Falls under gravity and lands on whatever the ground probe finds.
    /// The tracked position sits `eye_height` above the feet.
    Probe { eye_height: f32 },
    /// Always on a flat floor; the tracked position is the feet.
    Pinned { floor_y: f32 },
}

impl Footing {
    pub const STANDING_EYE_HEIGHT: f32 = 1.7;
    pub const CROUCHING_EYE_HEIGHT: f32 = 1.2;

    pub fn standing() -> Self {
        Self::Probe {
            eye_height: Self::STANDING_EYE_HEIGHT,
        }
    }

    pub fn crouching() -> Self {
        Self::Probe {
            eye_height: Self::CROUCHING_EYE_HEIGHT,
        }
    }

    pub fn floor() -> Self {
        Self::Pinned { floor_y: 0.0 }
    }

    /// Distance from the feet up to the tracked position
    pub fn feet_offset(&self) -> f32 {
        match self {
            Self::Probe { eye_height } => *eye_height,
            Self::Pinned { .. } => 0.0,
        }
    }
}

/// Outcome of one movement step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveReport {
    pub grounded: bool,
    pub collided: bool,
}

/// Position and velocity of a moving combatant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
}

impl MovementBody {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            grounded: false,
        }
    }

    /// Teleport and stop
    pub fn reset(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.grounded = false;
    }

    /// Feet position for a given footing
    pub fn feet(&self, footing: Footing) -> Vec3 {
        self.position - Vec3::Y * footing.feet_offset()
    }

    /// Apply an upward impulse if standing on something
    pub fn jump(&mut self, impulse: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.velocity.y = impulse;
        self.grounded = false;
        true
    }

    /// Advance one tick.
    ///
    /// `wish` is the desired horizontal velocity (direction times speed). With
    /// no wish the horizontal velocity decays by `idle_damping` instead of
    /// stopping dead.
    pub fn step(
        &mut self,
        registry: &ColliderRegistry,
        config: &PhysicsConfig,
        wish: Option<Vec3>,
        footing: Footing,
        delta_time: f32,
    ) -> MoveReport {
        match wish {
            Some(wish) => {
                self.velocity.x = wish.x;
                self.velocity.z = wish.z;
            }
            None => {
                self.velocity.x *= config.idle_damping;
                self.velocity.z *= config.idle_damping;
            }
        }

        if matches!(footing, Footing::Probe { .. }) {
            self.velocity.y += config.gravity * delta_time;
        } else {
            self.velocity.y = 0.0;
        }

        let mut next = self.position + self.velocity * delta_time;

        let mut support_top = None;
        let grounded = match footing {
            Footing::Probe { eye_height } => {
                let feet = next - Vec3::Y * eye_height;
                match registry.check_grounded(feet, config) {
                    Some(hit) => {
                        let top = registry
                            .bounds(hit.collider)
                            .map_or(hit.point.y, |b| b.max.y);
                        // Falling bodies land; feet sunk into the support (a
                        // taller footing, a rising body) are lifted out of it
                        if self.velocity.y < 0.0 {
                            self.velocity.y = 0.0;
                            next.y = top + eye_height;
                        } else if feet.y < top {
                            next.y = top + eye_height;
                        }
                        support_top = Some(top);
                        true
                    }
                    None => false,
                }
            }
            Footing::Pinned { floor_y } => {
                next.y = floor_y;
                true
            }
        };

        let mut feet = next - Vec3::Y * footing.feet_offset();
        // The support is stood on, never pushed out of sideways
        if let Some(top) = support_top {
            feet.y = feet.y.max(top);
        }
        let body = Aabb::from_feet(feet, config.body_radius, config.body_height);
        let pushout = registry.resolve_pushout(&body, next, self.velocity);

        self.position = pushout.position;
        self.velocity = pushout.velocity;
        self.grounded = grounded;

        MoveReport {
            grounded,
            collided: pushout.collided,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::{ColliderKind, StaticBox};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    const DT: f32 = 1.0 / 60.0;

    fn flat_ground() -> ColliderRegistry {
        let mut registry = ColliderRegistry::new();
        registry.add_collider(
            Arc::new(StaticBox::new(Vec3::new(0.0, -0.5, 0.0), Vec3::new(200.0, 1.0, 200.0))),
            ColliderKind::Ground,
        );
        registry
    }

    #[test]
    fn test_falls_and_lands_at_eye_height() {
        let registry = flat_ground();
        let config = PhysicsConfig::default();
        let mut body = MovementBody::new(Vec3::new(0.0, 3.0, 0.0));

        for _ in 0..120 {
            body.step(&registry, &config, None, Footing::standing(), DT);
        }
        assert!(body.grounded);
        assert_relative_eq!(body.position.y, 1.7, epsilon = 1e-5);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_crouch_lowers_eye() {
        let registry = flat_ground();
        let config = PhysicsConfig::default();
        let mut body = MovementBody::new(Vec3::new(0.0, 1.25, 0.0));
        body.step(&registry, &config, None, Footing::crouching(), DT);
        assert!(body.grounded);
        assert_relative_eq!(body.position.y, 1.2, epsilon = 1e-5);
    }

    #[test]
    fn test_idle_deceleration() {
        let registry = flat_ground();
        let config = PhysicsConfig::default();
        let mut body = MovementBody::new(Vec3::new(0.0, 1.7, 0.0));
        body.velocity = Vec3::new(5.0, 0.0, -5.0);

        body.step(&registry, &config, None, Footing::standing(), DT);
        assert_relative_eq!(body.velocity.x, 4.0, epsilon = 1e-5);
        assert_relative_eq!(body.velocity.z, -4.0, epsilon = 1e-5);

        body.step(&registry, &config, None, Footing::standing(), DT);
        assert_relative_eq!(body.velocity.x, 3.2, epsilon = 1e-5);
    }

    #[test]
    fn test_wish_sets_horizontal_velocity() {
        let registry = flat_ground();
        let config = PhysicsConfig::default();
        let mut body = MovementBody::new(Vec3::new(0.0, 1.7, 0.0));
        body.step(&registry, &config, Some(Vec3::new(0.0, 0.0, -5.0)), Footing::standing(), 0.1);
        assert_relative_eq!(body.position.z, -0.5, epsilon = 1e-5);
        assert_eq!(body.velocity.z, -5.0);
    }

    #[test]
    fn test_jump_requires_ground() {
        let registry = flat_ground();
        let config = PhysicsConfig::default();
        let mut body = MovementBody::new(Vec3::new(0.0, 1.7, 0.0));
        assert!(!body.jump(8.0));

        body.step(&registry, &config, None, Footing::standing(), DT);
        assert!(body.jump(8.0));
        body.step(&registry, &config, None, Footing::standing(), DT);
        assert!(body.position.y > 1.7);
    }

    #[test]
    fn test_taller_footing_lifts_instead_of_pushing() {
        let registry = flat_ground();
        let config = PhysicsConfig::default();
        let mut body = MovementBody::new(Vec3::new(5.0, 1.2, 3.0));
        body.step(&registry, &config, None, Footing::crouching(), DT);
        assert!(body.jump(8.0));

        // Standing up on the jump tick puts the feet half a unit into the ground
        let report = body.step(&registry, &config, None, Footing::standing(), DT);
        assert_relative_eq!(body.position.x, 5.0, epsilon = 1e-5);
        assert_relative_eq!(body.position.z, 3.0, epsilon = 1e-5);
        assert_relative_eq!(body.position.y, 1.7, epsilon = 1e-5);
        assert!(body.velocity.y > 7.0);
        assert!(!report.collided);
    }

    #[test]
    fn test_landing_on_raised_box_keeps_position() {
        let mut registry = flat_ground();
        registry.add_collider(
            Arc::new(StaticBox::on_floor(Vec3::ZERO, Vec3::new(40.0, 2.3, 40.0))),
            ColliderKind::Building,
        );
        let config = PhysicsConfig::default();
        let mut body = MovementBody::new(Vec3::new(3.0, 4.2, -2.0));

        for _ in 0..120 {
            let report = body.step(&registry, &config, None, Footing::standing(), DT);
            assert!(!report.collided, "pushed sideways at {:?}", body.position);
        }
        assert_relative_eq!(body.position.x, 3.0, epsilon = 1e-5);
        assert_relative_eq!(body.position.z, -2.0, epsilon = 1e-5);
        assert_relative_eq!(body.position.y, 4.0, epsilon = 1e-4);
    }

    #[test]
    fn test_pinned_stays_on_floor_and_is_pushed() {
        let mut registry = ColliderRegistry::new();
        registry.add_collider(
            Arc::new(StaticBox::on_floor(Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 6.0))),
            ColliderKind::Crate,
        );
        let config = PhysicsConfig::default();
        let mut body = MovementBody::new(Vec3::new(0.0, 0.0, 0.0));

        let mut collided = false;
        for _ in 0..60 {
            let report = body.step(&registry, &config, Some(Vec3::new(3.0, 0.0, 0.0)), Footing::floor(), DT);
            collided |= report.collided;
            assert!(report.grounded);
        }
        assert!(collided);
        assert_eq!(body.position.y, 0.0);
        // Never ends up inside the crate (x >= 1.0 is its face)
        assert!(body.position.x <= 0.5 + 1e-4);
    }
}
