//! Multi-zone hit testing between projectiles and combatants

use crate::health::{DamageOutcome, Health};
use crate::projectile::Projectile;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Shared surface of the player and enemy agents
pub trait Combatant {
    /// Tracked position
    fn position(&self) -> Vec3;

    /// Point the hit zones are stacked on (the feet)
    fn hit_base(&self) -> Vec3 {
        self.position()
    }

    fn health(&self) -> &Health;

    fn is_alive(&self) -> bool {
        self.health().is_alive()
    }

    fn take_damage(&mut self, amount: u32) -> DamageOutcome;
}

/// Vertical sample points approximating a body as a capsule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitZones {
    /// Heights above the base: feet, legs, torso, chest, head
    pub offsets: Vec<f32>,
}

impl Default for HitZones {
    fn default() -> Self {
        Self {
            offsets: vec![0.0, 0.5, 1.0, 1.5, 1.8],
        }
    }
}

impl HitZones {
    /// True if `point` is strictly within `radius` of any zone
    pub fn test(&self, point: Vec3, base: Vec3, radius: f32) -> bool {
        let radius_sq = radius * radius;
        self.offsets
            .iter()
            .any(|offset| point.distance_squared(base + Vec3::Y * *offset) < radius_sq)
    }
}

/// Hit radii per target type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HitConfig {
    /// Zone radius when the player is the target
    pub player_radius: f32,
    /// Zone radius when an enemy is the target; generous for fast bullets
    pub enemy_radius: f32,
    pub zones: HitZones,
}

impl Default for HitConfig {
    fn default() -> Self {
        Self {
            player_radius: 0.5,
            enemy_radius: 3.0,
            zones: HitZones::default(),
        }
    }
}

/// A confirmed hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    /// Projectile position at impact
    pub point: Vec3,
    /// Projectile travel direction
    pub direction: Vec3,
    /// Damage actually removed
    pub dealt: u32,
    /// This hit killed the target
    pub killed: bool,
}

/// Test one projectile against one target and apply the hit.
///
/// The projectile is deactivated on the first matching zone, so a single call
/// never applies damage twice. Inactive projectiles and dead targets never hit.
pub fn resolve_hit<T>(
    projectile: &mut Projectile,
    target: &mut T,
    zones: &HitZones,
    radius: f32,
) -> Option<HitOutcome>
where
    T: Combatant + ?Sized,
{
    if !projectile.is_active() || !target.is_alive() {
        return None;
    }
    if !zones.test(projectile.position, target.hit_base(), radius) {
        return None;
    }
    if !projectile.deactivate() {
        return None;
    }

    let DamageOutcome { dealt, killed } = target.take_damage(projectile.damage);
    Some(HitOutcome {
        point: projectile.position,
        direction: projectile.direction,
        dealt,
        killed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy {
        position: Vec3,
        health: Health,
        hits: u32,
    }

    impl Dummy {
        fn at(position: Vec3, health: u32) -> Self {
            Self {
                position,
                health: Health::new(health),
                hits: 0,
            }
        }
    }

    impl Combatant for Dummy {
        fn position(&self) -> Vec3 {
            self.position
        }

        fn health(&self) -> &Health {
            &self.health
        }

        fn take_damage(&mut self, amount: u32) -> DamageOutcome {
            self.hits += 1;
            self.health.apply_damage(amount)
        }
    }

    #[test]
    fn test_zone_radius_is_strict() {
        let zones = HitZones::default();
        assert!(zones.test(Vec3::new(0.49, 1.8, 0.0), Vec3::ZERO, 0.5));
        assert!(!zones.test(Vec3::new(0.5, 1.8, 0.0), Vec3::ZERO, 0.5));
        assert!(!zones.test(Vec3::new(0.0, 2.4, 0.0), Vec3::ZERO, 0.5));
    }

    #[test]
    fn test_hit_deactivates_once() {
        // Inside every zone at once: still a single hit
        let mut target = Dummy::at(Vec3::ZERO, 100);
        let mut projectile = Projectile::spawn(Vec3::new(0.0, 0.9, 0.0), Vec3::X, 100.0, 25);

        let outcome = resolve_hit(&mut projectile, &mut target, &HitZones::default(), 3.0).unwrap();
        assert_eq!(outcome.dealt, 25);
        assert!(!projectile.is_active());
        assert_eq!(target.hits, 1);

        assert!(resolve_hit(&mut projectile, &mut target, &HitZones::default(), 3.0).is_none());
        assert_eq!(target.health.current(), 75);
    }

    #[test]
    fn test_kill_reported_once() {
        let mut target = Dummy::at(Vec3::ZERO, 20);
        let zones = HitZones::default();

        let mut first = Projectile::spawn(Vec3::Y, Vec3::X, 1.0, 25);
        assert!(resolve_hit(&mut first, &mut target, &zones, 0.5).unwrap().killed);

        // Dead targets absorb nothing and the projectile flies on
        let mut second = Projectile::spawn(Vec3::Y, Vec3::X, 1.0, 25);
        assert!(resolve_hit(&mut second, &mut target, &zones, 0.5).is_none());
        assert!(second.is_active());
    }

    #[test]
    fn test_miss_leaves_projectile_active() {
        let mut target = Dummy::at(Vec3::ZERO, 100);
        let mut projectile = Projectile::spawn(Vec3::new(10.0, 1.0, 0.0), Vec3::X, 1.0, 25);
        assert!(resolve_hit(&mut projectile, &mut target, &HitZones::default(), 3.0).is_none());
        assert!(projectile.is_active());
        assert_eq!(target.hits, 0);
    }
}
