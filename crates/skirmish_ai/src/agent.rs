//! Enemy agent: brain, body, weapon and projectiles

use crate::brain::{build_brain, AiContext, EnemyBrain, EnemyState};
use crate::perception::{sense, Sighting};
use crate::profile::EnemyProfile;
use crate::tactics::{cover_away_from, nearest_cover, patrol_route, tactical_position};
use glam::Vec3;
use rand::Rng;
use skirmish_combat::{Combatant, DamageOutcome, Health, ProjectilePool};
use skirmish_physics::{ColliderRegistry, Footing, MovementBody, PhysicsConfig};

/// Slack for timers that accumulate many small frame deltas
const TIMER_EPSILON: f32 = 1e-4;

/// A projectile the agent fired this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredShot {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// What happened during one agent update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnemyReport {
    /// State entered this tick, if any
    pub transitioned: Option<EnemyState>,
    pub fired: Option<FiredShot>,
    /// A reload finished and the magazine was refilled
    pub reloaded: bool,
    pub sighting: Option<Sighting>,
}

/// An AI-controlled combatant
pub struct Enemy {
    id: usize,
    profile: EnemyProfile,
    spawn: Vec3,
    body: MovementBody,
    health: Health,
    brain: EnemyBrain,
    target_position: Option<Vec3>,
    cover_position: Option<Vec3>,
    patrol_route: Vec<Vec3>,
    patrol_index: usize,
    ammo: u32,
    reload_timer: f32,
    fire_cooldown: f32,
    suppression: f32,
    look_direction: Vec3,
    projectiles: ProjectilePool,
}

impl Enemy {
    pub fn new(id: usize, spawn: Vec3, profile: EnemyProfile) -> Self {
        let patrol_route = patrol_route(spawn, profile.patrol_radius, profile.patrol_points.max(1));
        Self {
            id,
            spawn,
            body: MovementBody::new(spawn),
            health: Health::new(profile.max_health),
            brain: build_brain(&profile),
            target_position: None,
            cover_position: None,
            patrol_route,
            patrol_index: 0,
            ammo: profile.magazine_size,
            reload_timer: 0.0,
            fire_cooldown: 0.0,
            suppression: 0.0,
            look_direction: Vec3::NEG_Z,
            projectiles: ProjectilePool::new(),
            profile,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn profile(&self) -> &EnemyProfile {
        &self.profile
    }

    pub fn spawn_point(&self) -> Vec3 {
        self.spawn
    }

    pub fn state(&self) -> EnemyState {
        *self.brain.current()
    }

    pub fn state_time(&self) -> f32 {
        self.brain.timer()
    }

    pub fn velocity(&self) -> Vec3 {
        self.body.velocity
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn suppression(&self) -> f32 {
        self.suppression
    }

    pub fn target_position(&self) -> Option<Vec3> {
        self.target_position
    }

    pub fn cover_position(&self) -> Option<Vec3> {
        self.cover_position
    }

    pub fn look_direction(&self) -> Vec3 {
        self.look_direction
    }

    pub fn patrol_route(&self) -> &[Vec3] {
        &self.patrol_route
    }

    pub fn projectiles(&self) -> &ProjectilePool {
        &self.projectiles
    }

    pub fn projectiles_mut(&mut self) -> &mut ProjectilePool {
        &mut self.projectiles
    }

    /// Move without touching state; for level setup and tests
    pub fn place(&mut self, position: Vec3) {
        self.body.reset(position);
    }

    /// Change state, clearing per-state bookkeeping on a real change
    pub fn set_state(&mut self, state: EnemyState) -> bool {
        let from = self.state();
        if !self.brain.set_state(state) {
            return false;
        }
        self.on_enter(from, state);
        true
    }

    fn on_enter(&mut self, from: EnemyState, to: EnemyState) {
        log::debug!("Enemy {} {} -> {}", self.id, from, to);
        self.cover_position = None;
        if to == EnemyState::Reload {
            self.reload_timer = 0.0;
        }
    }

    /// Restore health by an external source. Returns the amount restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        self.health.heal(amount)
    }

    /// Run one AI tick: sense, decide, act, move.
    ///
    /// Dead agents only advance the projectiles they already fired.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        registry: &ColliderRegistry,
        physics: &PhysicsConfig,
        target: Vec3,
        rng: &mut R,
        delta_time: f32,
    ) -> EnemyReport {
        let mut report = EnemyReport::default();

        if self.health.is_alive() {
            self.think(registry, target, rng, delta_time, &mut report);
            self.steer(registry, physics, delta_time);
            self.suppression = (self.suppression - self.profile.suppression_decay * delta_time).max(0.0);
        }

        self.projectiles.advance_all(delta_time);
        report
    }

    fn think<R: Rng + ?Sized>(
        &mut self,
        registry: &ColliderRegistry,
        target: Vec3,
        rng: &mut R,
        delta_time: f32,
        report: &mut EnemyReport,
    ) {
        self.brain.tick(delta_time);
        if self.fire_cooldown > 0.0 {
            self.fire_cooldown -= delta_time;
        }

        let sighting = sense(
            registry,
            self.body.position,
            self.profile.chest_height,
            target,
            self.profile.sight_tolerance,
        );
        report.sighting = Some(sighting);

        if self.state() == EnemyState::Reload {
            self.reload_timer += delta_time;
            if self.reload_timer + TIMER_EPSILON >= self.profile.reload_time {
                self.ammo = self.profile.magazine_size;
                self.reload_timer = 0.0;
                report.reloaded = true;
            }
        }

        let context = AiContext {
            distance: sighting.distance,
            can_see: sighting.visible,
            ammo: self.ammo,
            health: self.health.current(),
            state_time: self.brain.timer(),
        };

        let from = self.state();
        if let Some(to) = self.brain.evaluate(&context) {
            self.on_enter(from, to);
            report.transitioned = Some(to);
            return;
        }

        match self.state() {
            EnemyState::Idle => {}
            EnemyState::Patrol => {
                if self.reached_target() {
                    self.patrol_index = (self.patrol_index + 1) % self.patrol_route.len();
                    self.target_position = Some(self.patrol_route[self.patrol_index]);
                }
            }
            EnemyState::Chase => {
                self.target_position = Some(tactical_position(
                    self.body.position,
                    target,
                    self.profile.ideal_range(),
                    self.profile.flank_angle,
                    rng,
                ));
            }
            EnemyState::Shoot => {
                report.fired = self.shoot_at(target, rng);
            }
            EnemyState::Reload => {
                if self.cover_position.is_none() {
                    self.cover_position = Some(nearest_cover(
                        self.body.position,
                        target,
                        self.profile.cover_distance,
                        rng,
                    ));
                }
                self.target_position = self.cover_position;
            }
            EnemyState::Retreat => {
                if self.cover_position.is_none() || self.reached_target() {
                    self.cover_position = Some(cover_away_from(
                        self.body.position,
                        target,
                        self.profile.retreat_distance,
                    ));
                    self.target_position = self.cover_position;
                }
            }
        }
    }

    /// Within reach of the movement target, or without one
    pub fn reached_target(&self) -> bool {
        match self.target_position {
            Some(target) => self.body.position.distance(target) < self.profile.reach_distance,
            None => true,
        }
    }

    fn speed_factor(&self) -> f32 {
        match self.state() {
            EnemyState::Retreat => self.profile.retreat_speed_factor,
            EnemyState::Reload => self.profile.reload_speed_factor,
            EnemyState::Shoot => self.profile.shoot_speed_factor,
            _ => 1.0,
        }
    }

    fn steer(&mut self, registry: &ColliderRegistry, physics: &PhysicsConfig, delta_time: f32) {
        let goal = match self.target_position {
            Some(goal) => goal,
            None => {
                let anchor = self.patrol_route[self.patrol_index];
                self.target_position = Some(anchor);
                anchor
            }
        };

        let mut to_goal = goal - self.body.position;
        to_goal.y = 0.0;

        let wish = if to_goal.length() > self.profile.arrive_distance {
            let direction = to_goal.normalize();
            self.look_direction = direction;
            Some(direction * self.profile.move_speed * self.speed_factor())
        } else {
            None
        };

        self.body.step(
            registry,
            physics,
            wish,
            Footing::Pinned { floor_y: self.spawn.y },
            delta_time,
        );
    }

    /// Fire at `target` if the cooldown and magazine allow
    fn shoot_at<R: Rng + ?Sized>(&mut self, target: Vec3, rng: &mut R) -> Option<FiredShot> {
        if self.fire_cooldown > 0.0 || self.ammo == 0 {
            return None;
        }

        let origin = self.body.position + Vec3::Y * self.profile.chest_height;
        let aim = (target - origin).normalize_or_zero();
        if aim == Vec3::ZERO {
            return None;
        }

        let inaccuracy = self.profile.inaccuracy();
        let noise = Vec3::new(
            rng.gen::<f32>() - 0.5,
            rng.gen::<f32>() - 0.5,
            rng.gen::<f32>() - 0.5,
        ) * inaccuracy;
        let direction = (aim + noise).normalize_or_zero();

        self.fire_cooldown = self.profile.fire_rate;
        self.ammo -= 1;
        self.projectiles.spawn(
            origin,
            direction,
            self.profile.bullet_speed,
            self.profile.bullet_damage,
        );

        Some(FiredShot { origin, direction })
    }

    /// Back to spawn at full health, idle, with a full magazine
    pub fn respawn(&mut self) {
        self.health.reset();
        self.body.reset(self.spawn);
        self.brain.reset(EnemyState::Idle);
        self.ammo = self.profile.magazine_size;
        self.reload_timer = 0.0;
        self.fire_cooldown = 0.0;
        self.suppression = 0.0;
        self.target_position = None;
        self.cover_position = None;
        self.patrol_index = 0;
        log::debug!("Enemy {} respawned at {:?}", self.id, self.spawn);
    }
}

impl Combatant for Enemy {
    fn position(&self) -> Vec3 {
        self.body.position
    }

    fn health(&self) -> &Health {
        &self.health
    }

    /// Damage raises suppression and forces a retreat once health drops
    /// under the threshold.
    fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if !self.health.is_alive() {
            return DamageOutcome::default();
        }

        let outcome = self.health.apply_damage(amount);
        self.suppression = (self.suppression + self.profile.suppression_per_hit).min(1.0);

        if outcome.killed {
            self.body.velocity = Vec3::ZERO;
            log::info!("Enemy {} died", self.id);
        } else if self.health.current() < self.profile.retreat_health
            && self.state() != EnemyState::Retreat
        {
            self.set_state(EnemyState::Retreat);
        }
        outcome
    }
}

impl std::fmt::Debug for Enemy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enemy")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("position", &self.body.position)
            .field("health", &self.health)
            .field("ammo", &self.ammo)
            .finish()
    }
}
