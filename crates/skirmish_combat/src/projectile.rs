//! Straight-line projectiles

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Seconds a projectile flies before it is discarded
pub const DEFAULT_MAX_LIFETIME: f32 = 5.0;

/// A constant-velocity projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Current position
    pub position: Vec3,
    /// Unit direction of travel
    pub direction: Vec3,
    /// Speed in units/s
    pub speed: f32,
    /// Damage applied on a hit
    pub damage: u32,
    /// Seconds since spawn
    pub lifetime: f32,
    /// Expiry age
    pub max_lifetime: f32,
    active: bool,
}

impl Projectile {
    /// Spawn at `origin`. The direction is normalized on entry.
    pub fn spawn(origin: Vec3, direction: Vec3, speed: f32, damage: u32) -> Self {
        Self {
            position: origin,
            direction: direction.normalize_or_zero(),
            speed,
            damage,
            lifetime: 0.0,
            max_lifetime: DEFAULT_MAX_LIFETIME,
            active: true,
        }
    }

    pub fn with_max_lifetime(mut self, max_lifetime: f32) -> Self {
        self.max_lifetime = max_lifetime;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Move one tick. Expires once the lifetime passes `max_lifetime`.
    pub fn advance(&mut self, delta_time: f32) {
        if !self.active {
            return;
        }

        self.position += self.direction * self.speed * delta_time;
        self.lifetime += delta_time;

        if self.lifetime > self.max_lifetime {
            self.active = false;
            log::debug!(
                "Projectile expired after {:.2}s, traveled ~{:.0} units",
                self.lifetime,
                self.distance_traveled()
            );
        }
    }

    /// Path length flown so far
    pub fn distance_traveled(&self) -> f32 {
        self.speed * self.lifetime
    }

    /// Retire on a confirmed hit. Returns false if it was already inactive.
    pub fn deactivate(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

/// Projectiles fired by one shooter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectilePool {
    projectiles: Vec<Projectile>,
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn and track a new projectile
    pub fn spawn(&mut self, origin: Vec3, direction: Vec3, speed: f32, damage: u32) -> &Projectile {
        self.projectiles
            .push(Projectile::spawn(origin, direction, speed, damage));
        &self.projectiles[self.projectiles.len() - 1]
    }

    /// Track an already built projectile
    pub fn push(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    pub fn advance_all(&mut self, delta_time: f32) {
        for projectile in &mut self.projectiles {
            projectile.advance(delta_time);
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter().filter(|p| p.is_active())
    }

    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.projectiles.iter_mut().filter(|p| p.is_active())
    }

    /// Drop everything no longer active. Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let before = self.projectiles.len();
        self.projectiles.retain(|p| p.is_active());
        before - self.projectiles.len()
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
    }
}
