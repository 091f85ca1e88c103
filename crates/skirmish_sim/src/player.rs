//! The player combatant: look, movement, weapons and projectiles

use crate::error::PlayerConfigError;
use crate::input::InputProvider;
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use skirmish_combat::{
    Combatant, DamageOutcome, Health, ProjectilePool, ReloadAttempt, Weapon, WeaponKind,
    WeaponProfile,
};
use skirmish_physics::{ColliderRegistry, Footing, MoveReport, MovementBody, PhysicsConfig};
use std::f32::consts::FRAC_PI_2;

/// Player tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: u32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub crouch_speed: f32,
    pub jump_impulse: f32,
    /// Radians per unit of look delta
    pub look_sensitivity: f32,
    /// Per-tick multiplier on the recoil pitch offset
    pub recoil_decay: f32,
    /// Share of the recoil applied as random yaw jitter
    pub recoil_yaw_jitter: f32,
    /// Eye position at level start
    pub start_position: Vec3,
    /// Eye position after a death
    pub respawn_position: Vec3,
    /// Carried weapons in slot order
    pub weapons: Vec<WeaponProfile>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 150,
            walk_speed: 5.0,
            run_speed: 8.0,
            crouch_speed: 3.0,
            jump_impulse: 8.0,
            look_sensitivity: 0.002,
            recoil_decay: 0.85,
            recoil_yaw_jitter: 0.3,
            start_position: Vec3::new(0.0, Footing::STANDING_EYE_HEIGHT, 0.0),
            respawn_position: Vec3::new(-50.0, Footing::STANDING_EYE_HEIGHT, -50.0),
            weapons: vec![WeaponProfile::rifle(), WeaponProfile::pistol()],
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<(), PlayerConfigError> {
        if self.max_health == 0 {
            return Err(PlayerConfigError::ZeroHealth);
        }
        if self.weapons.is_empty() {
            return Err(PlayerConfigError::NoWeapons);
        }
        if let Some(w) = self.weapons.iter().find(|w| w.magazine_size == 0) {
            return Err(PlayerConfigError::EmptyMagazine {
                weapon: w.name.clone(),
            });
        }
        if !(0.0..=1.0).contains(&self.recoil_decay) {
            return Err(PlayerConfigError::RecoilDecayOutOfRange(self.recoil_decay));
        }
        Ok(())
    }
}

/// A projectile the player fired this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerShot {
    pub kind: WeaponKind,
    pub origin: Vec3,
    pub direction: Vec3,
    /// The magazine ran dry and a reload began
    pub reload_started: bool,
}

/// What happened during one player update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerReport {
    pub shot: Option<PlayerShot>,
    /// Answer to an explicit reload request
    pub reload: Option<ReloadAttempt>,
    /// Rounds loaded by a reload that finished this tick
    pub reloaded: Option<u32>,
    /// Slot switched to this tick
    pub switched: Option<usize>,
    pub movement: MoveReport,
}

/// The human-controlled combatant.
///
/// `position` is the eye; the feet sit 1.7 (standing) or 1.2 (crouching)
/// below it.
pub struct Player {
    config: PlayerConfig,
    body: MovementBody,
    health: Health,
    yaw: f32,
    pitch: f32,
    recoil_pitch: f32,
    crouching: bool,
    running: bool,
    aiming: bool,
    weapons: Vec<Weapon>,
    equipped: usize,
    projectiles: ProjectilePool,
}

impl Player {
    pub fn new(config: PlayerConfig) -> Self {
        let weapons = config.weapons.iter().cloned().map(Weapon::new).collect();
        Self {
            body: MovementBody::new(config.start_position),
            health: Health::new(config.max_health),
            yaw: 0.0,
            pitch: 0.0,
            recoil_pitch: 0.0,
            crouching: false,
            running: false,
            aiming: false,
            weapons,
            equipped: 0,
            projectiles: ProjectilePool::new(),
            config,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn velocity(&self) -> Vec3 {
        self.body.velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.body.grounded
    }

    pub fn is_crouching(&self) -> bool {
        self.crouching
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Pitch offset left by recent shots
    pub fn recoil_pitch(&self) -> f32 {
        self.recoil_pitch
    }

    pub fn footing(&self) -> Footing {
        if self.crouching {
            Footing::crouching()
        } else {
            Footing::standing()
        }
    }

    pub fn feet(&self) -> Vec3 {
        self.body.feet(self.footing())
    }

    /// Horizontal facing
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// View direction including pitch and recoil
    pub fn view_direction(&self) -> Vec3 {
        let pitch = self.pitch + self.recoil_pitch;
        Vec3::new(
            -self.yaw.sin() * pitch.cos(),
            pitch.sin(),
            -self.yaw.cos() * pitch.cos(),
        )
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn equipped_index(&self) -> usize {
        self.equipped
    }

    pub fn current_weapon(&self) -> &Weapon {
        &self.weapons[self.equipped]
    }

    pub fn current_weapon_mut(&mut self) -> &mut Weapon {
        &mut self.weapons[self.equipped]
    }

    pub fn projectiles(&self) -> &ProjectilePool {
        &self.projectiles
    }

    pub fn projectiles_mut(&mut self) -> &mut ProjectilePool {
        &mut self.projectiles
    }

    /// Equip a slot. Out of range slots are ignored.
    pub fn switch_weapon(&mut self, slot: usize) -> bool {
        if slot >= self.weapons.len() {
            log::warn!("No weapon in slot {}", slot);
            return false;
        }
        if slot == self.equipped {
            return false;
        }
        self.equipped = slot;
        log::debug!("Switched to {}", self.weapons[slot].profile().name);
        true
    }

    /// Teleport without touching anything else
    pub fn place(&mut self, position: Vec3) {
        self.body.reset(position);
    }

    /// Orient the view directly
    pub fn set_look(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Face a point on the horizontal plane
    pub fn look_at(&mut self, target: Vec3) {
        let to = target - self.body.position;
        if to.x == 0.0 && to.z == 0.0 {
            return;
        }
        self.yaw = (-to.x).atan2(-to.z);
        let horizontal = (to.x * to.x + to.z * to.z).sqrt();
        self.pitch = to.y.atan2(horizontal).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Restore health without reviving
    pub fn heal_full(&mut self) {
        if self.health.is_alive() {
            self.health.reset();
        }
    }

    /// Full health, respawn point, fresh weapons
    pub fn respawn(&mut self) {
        self.reset_at(self.config.respawn_position);
        log::info!("Player respawned at {:?}", self.config.respawn_position);
    }

    /// Full health and fresh weapons at `position`
    pub fn reset_at(&mut self, position: Vec3) {
        self.health.reset();
        self.body.reset(position);
        self.recoil_pitch = 0.0;
        self.crouching = false;
        self.running = false;
        for weapon in &mut self.weapons {
            weapon.reset();
        }
    }

    /// Run one tick: look, actions, movement, weapon timers, projectiles
    pub fn update<I, R>(
        &mut self,
        input: &mut I,
        registry: &ColliderRegistry,
        physics: &PhysicsConfig,
        rng: &mut R,
        delta_time: f32,
    ) -> PlayerReport
    where
        I: InputProvider + ?Sized,
        R: Rng + ?Sized,
    {
        let mut report = PlayerReport::default();
        if !self.health.is_alive() {
            self.projectiles.advance_all(delta_time);
            return report;
        }

        let look = input.take_look_delta();
        self.yaw -= look.x * self.config.look_sensitivity;
        self.pitch = (self.pitch - look.y * self.config.look_sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);

        self.crouching = input.crouch_held();
        self.running = input.sprint_held() && !self.crouching;
        self.aiming = input.aim_held();

        if input.jump_held() && !self.crouching {
            self.body.jump(self.config.jump_impulse);
        }

        if input.fire_held() {
            report.shot = self.shoot(rng);
        }

        if input.reload_requested() {
            report.reload = Some(self.current_weapon_mut().reload());
        }

        if let Some(slot) = input.weapon_switch_requested() {
            if self.switch_weapon(slot) {
                report.switched = Some(slot);
            }
        }

        report.movement = self.step_movement(input.move_axes(), registry, physics, delta_time);

        self.recoil_pitch *= self.config.recoil_decay;

        for (slot, weapon) in self.weapons.iter_mut().enumerate() {
            if slot == self.equipped {
                report.reloaded = weapon.tick(delta_time);
            } else {
                weapon.tick_cooldown(delta_time);
            }
        }

        self.projectiles.advance_all(delta_time);
        report
    }

    fn step_movement(
        &mut self,
        axes: glam::Vec2,
        registry: &ColliderRegistry,
        physics: &PhysicsConfig,
        delta_time: f32,
    ) -> MoveReport {
        let direction = self.right() * axes.x + self.forward() * axes.y;
        let wish = if direction.length_squared() > 0.0 {
            let speed = if self.crouching {
                self.config.crouch_speed
            } else if self.running {
                self.config.run_speed
            } else {
                self.config.walk_speed
            };
            Some(direction.normalize() * speed)
        } else {
            None
        };

        let footing = self.footing();
        self.body.step(registry, physics, wish, footing, delta_time)
    }

    /// Pull the trigger on the equipped weapon
    pub fn shoot<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<PlayerShot> {
        let shot = self.weapons[self.equipped].fire()?;

        let mut direction = self.view_direction();
        direction.x += (rng.gen::<f32>() - 0.5) * shot.spread;
        direction.y += (rng.gen::<f32>() - 0.5) * shot.spread;
        let direction = direction.normalize_or_zero();
        let origin = self.body.position;

        self.projectiles
            .spawn(origin, direction, shot.bullet_speed, shot.damage);

        self.recoil_pitch += shot.recoil * (0.5 + rng.gen::<f32>() * 0.5);
        self.yaw += (rng.gen::<f32>() - 0.5) * shot.recoil * self.config.recoil_yaw_jitter;

        Some(PlayerShot {
            kind: shot.kind,
            origin,
            direction,
            reload_started: shot.reload_started,
        })
    }
}

impl Combatant for Player {
    fn position(&self) -> Vec3 {
        self.body.position
    }

    fn hit_base(&self) -> Vec3 {
        self.feet()
    }

    fn health(&self) -> &Health {
        &self.health
    }

    fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        let outcome = self.health.apply_damage(amount);
        if outcome.killed {
            self.body.velocity = Vec3::ZERO;
            log::info!("Player died");
        }
        outcome
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("position", &self.body.position)
            .field("health", &self.health)
            .field("weapon", &self.current_weapon().profile().name)
            .field("ammo", &self.current_weapon().ammo_display())
            .finish()
    }
}
