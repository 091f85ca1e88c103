//! Weapon system

use serde::{Deserialize, Serialize};

/// Slack for timers that accumulate many small frame deltas
const TIMER_EPSILON: f32 = 1e-4;

/// Weapon family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponKind {
    Rifle,
    Pistol,
}

impl WeaponKind {
    /// Audio event played on each shot
    pub fn shot_sound(&self) -> &'static str {
        match self {
            Self::Rifle => "rifle_shot",
            Self::Pistol => "pistol_shot",
        }
    }
}

impl std::fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rifle => write!(f, "rifle"),
            Self::Pistol => write!(f, "pistol"),
        }
    }
}

/// Weapon statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponProfile {
    /// Display name
    pub name: String,
    /// Weapon family
    pub kind: WeaponKind,
    /// Damage per projectile
    pub damage: u32,
    /// Minimum seconds between shots
    pub fire_rate: f32,
    /// Pitch kick per shot (radians)
    pub recoil: f32,
    /// Rounds per magazine
    pub magazine_size: u32,
    /// Reload duration in seconds
    pub reload_time: f32,
    /// Projectile speed in units/s
    pub bullet_speed: f32,
    /// Per-axis direction noise magnitude
    pub spread: f32,
    /// Reserve ammo at spawn, in magazines
    pub reserve_magazines: u32,
}

impl WeaponProfile {
    /// M4A1 assault rifle
    pub fn rifle() -> Self {
        Self {
            name: "M4A1".into(),
            kind: WeaponKind::Rifle,
            damage: 25,
            fire_rate: 0.1,
            recoil: 0.05,
            magazine_size: 30,
            reload_time: 2.0,
            bullet_speed: 150.0,
            spread: 0.008,
            reserve_magazines: 10,
        }
    }

    /// Glock sidearm
    pub fn pistol() -> Self {
        Self {
            name: "Glock".into(),
            kind: WeaponKind::Pistol,
            damage: 20,
            fire_rate: 0.15,
            recoil: 0.03,
            magazine_size: 15,
            reload_time: 1.5,
            bullet_speed: 120.0,
            spread: 0.015,
            reserve_magazines: 10,
        }
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_magazine(mut self, magazine_size: u32, reserve_magazines: u32) -> Self {
        self.magazine_size = magazine_size;
        self.reserve_magazines = reserve_magazines;
        self
    }

    pub fn with_reload_time(mut self, reload_time: f32) -> Self {
        self.reload_time = reload_time;
        self
    }

    /// Full reserve at spawn
    pub fn starting_reserve(&self) -> u32 {
        self.magazine_size.saturating_mul(self.reserve_magazines)
    }
}

impl Default for WeaponProfile {
    fn default() -> Self {
        Self::rifle()
    }
}

/// What a successful trigger pull produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub kind: WeaponKind,
    pub damage: u32,
    pub bullet_speed: f32,
    pub spread: f32,
    pub recoil: f32,
    /// The shot emptied the magazine and a reload started
    pub reload_started: bool,
}

/// Result of a reload request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReloadAttempt {
    Started,
    AlreadyReloading,
    MagazineFull,
    NoReserve,
}

/// A carried weapon with its ammo and timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    profile: WeaponProfile,
    current_ammo: u32,
    reserve_ammo: u32,
    cooldown: f32,
    is_reloading: bool,
    reload_elapsed: f32,
}

impl Weapon {
    /// Create with a full magazine and full reserve
    pub fn new(profile: WeaponProfile) -> Self {
        let current_ammo = profile.magazine_size;
        let reserve_ammo = profile.starting_reserve();
        Self {
            profile,
            current_ammo,
            reserve_ammo,
            cooldown: 0.0,
            is_reloading: false,
            reload_elapsed: 0.0,
        }
    }

    /// Override ammo counts. Current ammo is clamped to the magazine.
    pub fn with_ammo(mut self, current: u32, reserve: u32) -> Self {
        self.current_ammo = current.min(self.profile.magazine_size);
        self.reserve_ammo = reserve;
        self
    }

    pub fn profile(&self) -> &WeaponProfile {
        &self.profile
    }

    pub fn current_ammo(&self) -> u32 {
        self.current_ammo
    }

    pub fn reserve_ammo(&self) -> u32 {
        self.reserve_ammo
    }

    pub fn is_reloading(&self) -> bool {
        self.is_reloading
    }

    /// Reload progress (0.0 - 1.0)
    pub fn reload_progress(&self) -> f32 {
        if !self.is_reloading || self.profile.reload_time <= 0.0 {
            return 0.0;
        }
        (self.reload_elapsed / self.profile.reload_time).min(1.0)
    }

    /// Check if can fire
    pub fn can_fire(&self) -> bool {
        !self.is_reloading && self.cooldown <= 0.0 && self.current_ammo > 0
    }

    /// Attempt to fire the weapon.
    ///
    /// Emptying the magazine starts a reload on the spot when reserve allows.
    pub fn fire(&mut self) -> Option<Shot> {
        if !self.can_fire() {
            return None;
        }

        self.current_ammo -= 1;
        self.cooldown = self.profile.fire_rate;

        let reload_started =
            self.current_ammo == 0 && self.reload() == ReloadAttempt::Started;

        Some(Shot {
            kind: self.profile.kind,
            damage: self.profile.damage,
            bullet_speed: self.profile.bullet_speed,
            spread: self.profile.spread,
            recoil: self.profile.recoil,
            reload_started,
        })
    }

    /// Start reloading
    pub fn reload(&mut self) -> ReloadAttempt {
        log::debug!(
            "Reload attempt on {}: current {}, reserve {}, reloading {}",
            self.profile.name,
            self.current_ammo,
            self.reserve_ammo,
            self.is_reloading
        );

        let attempt = if self.is_reloading {
            ReloadAttempt::AlreadyReloading
        } else if self.current_ammo >= self.profile.magazine_size {
            ReloadAttempt::MagazineFull
        } else if self.reserve_ammo == 0 {
            ReloadAttempt::NoReserve
        } else {
            self.is_reloading = true;
            self.reload_elapsed = 0.0;
            ReloadAttempt::Started
        };

        if attempt != ReloadAttempt::Started {
            log::debug!("Reload on {} rejected: {:?}", self.profile.name, attempt);
        }
        attempt
    }

    /// Count down the fire cooldown only
    pub fn tick_cooldown(&mut self, delta_time: f32) {
        if self.cooldown > 0.0 {
            self.cooldown -= delta_time;
        }
    }

    /// Advance cooldown and reload.
    ///
    /// Returns the number of rounds loaded when a reload completes this tick.
    pub fn tick(&mut self, delta_time: f32) -> Option<u32> {
        self.tick_cooldown(delta_time);

        if !self.is_reloading {
            return None;
        }
        self.reload_elapsed += delta_time;
        if self.reload_elapsed + TIMER_EPSILON < self.profile.reload_time {
            return None;
        }
        Some(self.finish_reload())
    }

    fn finish_reload(&mut self) -> u32 {
        let needed = self.profile.magazine_size - self.current_ammo;
        let loaded = needed.min(self.reserve_ammo);
        self.current_ammo += loaded;
        self.reserve_ammo -= loaded;
        self.is_reloading = false;
        self.reload_elapsed = 0.0;
        log::debug!(
            "Reload complete on {}: +{} (now {}/{})",
            self.profile.name,
            loaded,
            self.current_ammo,
            self.reserve_ammo
        );
        loaded
    }

    /// Back to spawn ammo with no timers running
    pub fn reset(&mut self) {
        self.current_ammo = self.profile.magazine_size;
        self.reserve_ammo = self.profile.starting_reserve();
        self.cooldown = 0.0;
        self.is_reloading = false;
        self.reload_elapsed = 0.0;
    }

    /// Get ammo display string
    pub fn ammo_display(&self) -> String {
        format!("{}/{}", self.current_ammo, self.reserve_ammo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_profiles() {
        let rifle = Weapon::new(WeaponProfile::rifle());
        assert_eq!(rifle.current_ammo(), 30);
        assert_eq!(rifle.reserve_ammo(), 300);

        let pistol = Weapon::new(WeaponProfile::pistol());
        assert_eq!(pistol.current_ammo(), 15);
        assert_eq!(pistol.reserve_ammo(), 150);
        assert_eq!(pistol.profile().kind.shot_sound(), "pistol_shot");
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut weapon = Weapon::new(WeaponProfile::rifle());
        let shot = weapon.fire().unwrap();
        assert_eq!(shot.damage, 25);
        assert_eq!(weapon.current_ammo(), 29);
        assert!(weapon.fire().is_none());

        weapon.tick(0.05);
        assert!(weapon.fire().is_none());
        weapon.tick(0.05);
        assert!(weapon.fire().is_some());
    }

    #[test]
    fn test_reload_scenario() {
        let mut weapon = Weapon::new(WeaponProfile::rifle()).with_ammo(0, 300);
        assert_eq!(weapon.reload(), ReloadAttempt::Started);

        let mut loaded = None;
        for _ in 0..120 {
            if let Some(n) = weapon.tick(DT) {
                loaded = Some(n);
            }
        }
        assert_eq!(loaded, Some(30));
        assert_eq!(weapon.current_ammo(), 30);
        assert_eq!(weapon.reserve_ammo(), 270);
        assert!(!weapon.is_reloading());
    }

    #[test]
    fn test_reload_progress() {
        let mut weapon = Weapon::new(WeaponProfile::rifle()).with_ammo(10, 300);
        assert_eq!(weapon.reload_progress(), 0.0);

        weapon.reload();
        assert_eq!(weapon.reload_progress(), 0.0);
        for _ in 0..60 {
            assert!(weapon.tick(DT).is_none());
        }
        approx::assert_relative_eq!(weapon.reload_progress(), 0.5, epsilon = 1e-4);

        let mut last = weapon.reload_progress();
        while weapon.tick(DT).is_none() {
            let progress = weapon.reload_progress();
            assert!(progress >= last && progress <= 1.0);
            last = progress;
        }
        // Idle again once the magazine is in
        assert_eq!(weapon.reload_progress(), 0.0);
        assert_eq!(weapon.current_ammo(), 30);
    }

    #[test]
    fn test_reload_rejections() {
        let mut full = Weapon::new(WeaponProfile::pistol());
        assert_eq!(full.reload(), ReloadAttempt::MagazineFull);

        let mut dry = Weapon::new(WeaponProfile::pistol()).with_ammo(3, 0);
        assert_eq!(dry.reload(), ReloadAttempt::NoReserve);

        let mut busy = Weapon::new(WeaponProfile::pistol()).with_ammo(3, 10);
        assert_eq!(busy.reload(), ReloadAttempt::Started);
        assert_eq!(busy.reload(), ReloadAttempt::AlreadyReloading);
        assert!(!busy.can_fire());
    }

    #[test]
    fn test_partial_reload_from_small_reserve() {
        let mut weapon = Weapon::new(WeaponProfile::rifle()).with_ammo(10, 5);
        weapon.reload();
        assert_eq!(weapon.tick(2.0), Some(5));
        assert_eq!(weapon.current_ammo(), 15);
        assert_eq!(weapon.reserve_ammo(), 0);
    }

    #[test]
    fn test_auto_reload_on_empty() {
        let mut weapon = Weapon::new(WeaponProfile::pistol()).with_ammo(1, 15);
        let shot = weapon.fire().unwrap();
        assert!(shot.reload_started);
        assert!(weapon.is_reloading());
    }

    #[test]
    fn test_ammo_never_exceeds_magazine() {
        let mut weapon = Weapon::new(WeaponProfile::pistol()).with_ammo(99, 40);
        assert_eq!(weapon.current_ammo(), 15);

        for _ in 0..2_000 {
            weapon.fire();
            weapon.tick(DT);
            if weapon.current_ammo() < 5 {
                weapon.reload();
            }
            assert!(weapon.current_ammo() <= weapon.profile().magazine_size);
        }
        assert_eq!(weapon.reserve_ammo(), 0);
    }

    #[test]
    fn test_reset() {
        let mut weapon = Weapon::new(WeaponProfile::rifle()).with_ammo(0, 0);
        weapon.reset();
        assert_eq!(weapon.current_ammo(), 30);
        assert_eq!(weapon.reserve_ammo(), 300);
        assert!(weapon.can_fire());
    }
}
