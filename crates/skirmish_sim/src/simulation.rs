//! Combat orchestrator
//!
//! Owns the collider registry, the player, the enemies and every projectile,
//! and runs them through one fixed order per tick:
//!
//! 1. Player: look, actions, movement, weapon timers, projectiles
//! 2. Enemies: AI and movement for the living, projectiles for all
//! 3. Enemy projectiles against the player
//! 4. Player projectiles against living enemies
//! 5. Sweep spent projectiles
//! 6. Level-complete countdown
//!
//! Hits resolved in a tick always apply, even when the player dies earlier in
//! the same tick. After that the simulation is frozen until [`CombatSimulation::respawn`].

use crate::arena::TownArena;
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::events::{CombatEvent, EventCollector, Shooter};
use crate::input::InputProvider;
use crate::level::{spawn_points, WorldBuilder};
use crate::player::{Player, PlayerReport};
use crate::services::{play_sound, sounds, AudioSink, EffectSink, NullAudio, NullEffects};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use skirmish_ai::{Enemy, EnemyReport, EnemyState};
use skirmish_combat::{resolve_hit, Combatant, DamageOutcome, ReloadAttempt};
use skirmish_physics::ColliderRegistry;

/// Slack for the level-complete countdown
const TIMER_EPSILON: f32 = 1e-4;

/// Hit effects appear at torso height above the enemy's feet
const HIT_EFFECT_HEIGHT: f32 = 1.0;

const SHOT_VOLUME: f32 = 1.0;
const ENEMY_SHOT_VOLUME: f32 = 0.2;
const RELOAD_VOLUME: f32 = 0.2;
const IMPACT_VOLUME: f32 = 0.5;

/// Top-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    Playing,
    /// Frozen until respawn
    PlayerDead,
    /// Every enemy is down; waiting for `advance_level`
    LevelComplete,
    /// Advanced past the last level
    GameComplete,
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Playing => write!(f, "playing"),
            Self::PlayerDead => write!(f, "player_dead"),
            Self::LevelComplete => write!(f, "level_complete"),
            Self::GameComplete => write!(f, "game_complete"),
        }
    }
}

/// The combat simulation context
pub struct CombatSimulation {
    config: SimConfig,
    registry: ColliderRegistry,
    world: Box<dyn WorldBuilder>,
    player: Player,
    enemies: Vec<Enemy>,
    rng: ChaCha8Rng,
    audio: Box<dyn AudioSink>,
    effects: Box<dyn EffectSink>,
    events: EventCollector,
    state: GameState,
    level: u32,
    enemies_killed: u32,
    /// Seconds left before the level-complete signal, once armed
    grace_timer: Option<f32>,
    elapsed: f32,
}

impl CombatSimulation {
    /// Create on level 1 of the town arena with silent collaborators
    pub fn new(config: SimConfig) -> Result<Self> {
        let world = TownArena::new(config.seed);
        Self::with_world(config, Box::new(world))
    }

    /// Create on level 1 of a custom world
    pub fn with_world(config: SimConfig, world: Box<dyn WorldBuilder>) -> Result<Self> {
        config.validate()?;

        let mut sim = Self {
            registry: ColliderRegistry::new(),
            world,
            player: Player::new(config.player.clone()),
            enemies: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            audio: Box::new(NullAudio),
            effects: Box::new(NullEffects),
            events: EventCollector::new(),
            state: GameState::Playing,
            level: 1,
            enemies_killed: 0,
            grace_timer: None,
            elapsed: 0.0,
            config,
        };
        sim.load_level(1)?;
        Ok(sim)
    }

    /// Set the audio collaborator
    pub fn with_audio(mut self, audio: Box<dyn AudioSink>) -> Self {
        self.audio = audio;
        self
    }

    /// Set the effects collaborator
    pub fn with_effects(mut self, effects: Box<dyn EffectSink>) -> Self {
        self.effects = effects;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Kills on the current level
    pub fn enemies_killed(&self) -> u32 {
        self.enemies_killed
    }

    pub fn enemies_alive(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy_mut(&mut self, index: usize) -> Option<&mut Enemy> {
        self.enemies.get_mut(index)
    }

    pub fn registry(&self) -> &ColliderRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ColliderRegistry {
        &mut self.registry
    }

    /// Events raised by the last tick or operation
    pub fn events(&self) -> &EventCollector {
        &self.events
    }

    /// Seconds left before the level-complete signal, if armed
    pub fn grace_remaining(&self) -> Option<f32> {
        self.grace_timer
    }

    /// Simulated seconds while playing
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance one tick. Does nothing unless playing.
    pub fn tick<I>(&mut self, input: &mut I, delta_time: f32) -> &EventCollector
    where
        I: InputProvider + ?Sized,
    {
        self.events.clear();
        if self.state != GameState::Playing {
            return &self.events;
        }
        self.elapsed += delta_time;

        self.update_player(input, delta_time);
        self.update_enemies(delta_time);
        self.resolve_enemy_fire();
        self.resolve_player_fire();
        self.sweep_projectiles();
        self.advance_grace_timer(delta_time);

        &self.events
    }

    fn update_player<I>(&mut self, input: &mut I, delta_time: f32)
    where
        I: InputProvider + ?Sized,
    {
        let report = self.player.update(
            input,
            &self.registry,
            &self.config.physics,
            &mut self.rng,
            delta_time,
        );
        self.dispatch_player_report(report);
    }

    fn dispatch_player_report(&mut self, report: PlayerReport) {
        let kind = self.player.current_weapon().profile().kind;

        if let Some(shot) = report.shot {
            play_sound(self.audio.as_mut(), shot.kind.shot_sound(), SHOT_VOLUME);
            self.effects.spawn_tracer(shot.origin, shot.direction);
            self.events.push(CombatEvent::ShotFired {
                shooter: Shooter::Player(shot.kind),
                origin: shot.origin,
                direction: shot.direction,
            });
            if shot.reload_started {
                play_sound(self.audio.as_mut(), sounds::RELOAD, RELOAD_VOLUME);
                self.events.push(CombatEvent::ReloadAttempted {
                    weapon: shot.kind,
                    attempt: ReloadAttempt::Started,
                });
            }
        }

        if let Some(slot) = report.switched {
            self.events.push(CombatEvent::WeaponSwitched { slot });
        }

        if let Some(attempt) = report.reload {
            if attempt == ReloadAttempt::Started {
                play_sound(self.audio.as_mut(), sounds::RELOAD, RELOAD_VOLUME);
            }
            self.events.push(CombatEvent::ReloadAttempted {
                weapon: kind,
                attempt,
            });
        }

        if let Some(rounds) = report.reloaded {
            self.events.push(CombatEvent::Reloaded {
                shooter: Shooter::Player(kind),
                rounds,
            });
        }
    }

    fn update_enemies(&mut self, delta_time: f32) {
        let target = self.player.position();

        for (index, enemy) in self.enemies.iter_mut().enumerate() {
            let report = enemy.update(
                &self.registry,
                &self.config.physics,
                target,
                &mut self.rng,
                delta_time,
            );
            let magazine = enemy.profile().magazine_size;
            Self::dispatch_enemy_report(
                index,
                magazine,
                report,
                self.audio.as_mut(),
                self.effects.as_mut(),
                &mut self.events,
            );
        }
    }

    fn dispatch_enemy_report(
        index: usize,
        magazine: u32,
        report: EnemyReport,
        audio: &mut dyn AudioSink,
        effects: &mut dyn EffectSink,
        events: &mut EventCollector,
    ) {
        if let Some(state) = report.transitioned {
            events.push(CombatEvent::EnemyStateChanged {
                enemy: index,
                state,
            });
        }
        if let Some(shot) = report.fired {
            play_sound(audio, sounds::ENEMY_SHOT, ENEMY_SHOT_VOLUME);
            effects.spawn_tracer(shot.origin, shot.direction);
            events.push(CombatEvent::ShotFired {
                shooter: Shooter::Enemy(index),
                origin: shot.origin,
                direction: shot.direction,
            });
        }
        if report.reloaded {
            events.push(CombatEvent::Reloaded {
                shooter: Shooter::Enemy(index),
                rounds: magazine,
            });
        }
    }

    /// Enemy rounds against the player's zones, using each round's own damage
    fn resolve_enemy_fire(&mut self) {
        let zones = &self.config.hit.zones;
        let radius = self.config.hit.player_radius;
        let mut player_killed = false;

        for (index, enemy) in self.enemies.iter_mut().enumerate() {
            for projectile in enemy.projectiles_mut().active_mut() {
                let Some(hit) = resolve_hit(projectile, &mut self.player, zones, radius) else {
                    continue;
                };
                log::debug!(
                    "Player hit by enemy {} for {} ({} left)",
                    index,
                    hit.dealt,
                    self.player.health().current()
                );
                self.events.push(CombatEvent::PlayerHit {
                    enemy: index,
                    damage: hit.dealt,
                    health: self.player.health().current(),
                });
                player_killed |= hit.killed;
            }
        }

        if player_killed {
            self.on_player_death();
        }
    }

    /// Player rounds against every living enemy. A round stops at its first hit.
    fn resolve_player_fire(&mut self) {
        let zones = &self.config.hit.zones;
        let radius = self.config.hit.enemy_radius;
        let mut killed = Vec::new();

        for projectile in self.player.projectiles_mut().active_mut() {
            for (index, enemy) in self.enemies.iter_mut().enumerate() {
                let before = enemy.state();
                let Some(hit) = resolve_hit(projectile, enemy, zones, radius) else {
                    continue;
                };

                let effect_at = enemy.position() + Vec3::Y * HIT_EFFECT_HEIGHT;
                self.effects.spawn_hit_effect(effect_at, hit.direction);
                play_sound(self.audio.as_mut(), sounds::IMPACT, IMPACT_VOLUME);
                log::debug!(
                    "Enemy {} hit for {} ({} left)",
                    index,
                    hit.dealt,
                    enemy.health().current()
                );
                self.events.push(CombatEvent::EnemyHit {
                    enemy: index,
                    damage: hit.dealt,
                    point: hit.point,
                });
                push_damage_transition(&mut self.events, index, before, enemy);
                if hit.killed {
                    killed.push(index);
                }
                break;
            }
        }

        for index in killed {
            self.on_enemy_killed(index);
        }
    }

    fn sweep_projectiles(&mut self) {
        self.player.projectiles_mut().sweep();
        for enemy in &mut self.enemies {
            enemy.projectiles_mut().sweep();
        }
    }

    fn advance_grace_timer(&mut self, delta_time: f32) {
        let Some(remaining) = self.grace_timer.as_mut() else {
            return;
        };
        if self.state != GameState::Playing {
            return;
        }

        *remaining -= delta_time;
        if *remaining > TIMER_EPSILON {
            return;
        }

        self.grace_timer = None;
        self.state = GameState::LevelComplete;
        log::info!(
            "Level {} complete with {} kills",
            self.level,
            self.enemies_killed
        );
        self.events.push(CombatEvent::LevelComplete {
            level: self.level,
            kills: self.enemies_killed,
        });
    }

    fn on_player_death(&mut self) {
        if self.state == GameState::PlayerDead {
            return;
        }
        self.state = GameState::PlayerDead;
        log::info!("Player killed on level {}", self.level);
        self.events.push(CombatEvent::PlayerDied);
    }

    fn on_enemy_killed(&mut self, index: usize) {
        self.enemies_killed += 1;
        let alive = self.enemies_alive();
        log::info!(
            "Enemy {} killed ({} total, {} remaining)",
            index,
            self.enemies_killed,
            alive
        );
        self.events.push(CombatEvent::EnemyKilled {
            enemy: index,
            total_killed: self.enemies_killed,
        });

        if alive == 0 && self.grace_timer.is_none() {
            self.grace_timer = Some(self.config.level_complete_delay);
            self.events.push(CombatEvent::LevelCleared { level: self.level });
        }
    }

    /// Damage an enemy from outside the projectile path (scripted hazards,
    /// tests). Kills are counted like any other.
    pub fn damage_enemy(&mut self, index: usize, amount: u32) -> Option<DamageOutcome> {
        let enemy = self.enemies.get_mut(index)?;
        let before = enemy.state();
        let outcome = enemy.take_damage(amount);
        if outcome.dealt > 0 {
            self.events.push(CombatEvent::EnemyHit {
                enemy: index,
                damage: outcome.dealt,
                point: enemy.position(),
            });
        }
        push_damage_transition(&mut self.events, index, before, enemy);
        if outcome.killed {
            self.on_enemy_killed(index);
        }
        Some(outcome)
    }

    /// Bring the player back after a death. Dead enemies come back too and
    /// the level's kill count is cleared.
    pub fn respawn(&mut self) -> bool {
        if self.state != GameState::PlayerDead {
            log::warn!("Respawn requested while {}", self.state);
            return false;
        }

        self.events.clear();
        self.player.respawn();
        for enemy in self.enemies.iter_mut().filter(|e| !e.is_alive()) {
            enemy.respawn();
        }
        // Every enemy is back up, so the level's kill count starts over
        self.enemies_killed = 0;
        self.grace_timer = None;
        self.state = GameState::Playing;
        self.events.push(CombatEvent::Respawned);
        true
    }

    /// Move to the next level, or complete the game after the last one
    pub fn advance_level(&mut self) -> Result<GameState> {
        if self.state == GameState::PlayerDead {
            log::warn!("Cannot advance while the player is dead");
            return Ok(self.state);
        }
        self.events.clear();

        if self.level >= self.config.max_level {
            self.state = GameState::GameComplete;
            log::info!("Game complete");
            self.events.push(CombatEvent::GameComplete);
            return Ok(self.state);
        }

        self.load_level(self.level + 1)?;
        self.player.heal_full();
        self.player.place(self.config.player.start_position);
        Ok(self.state)
    }

    /// Back to level 1 with a fresh player
    pub fn restart(&mut self) -> Result<()> {
        self.events.clear();
        self.player.reset_at(self.config.player.start_position);
        self.load_level(1)?;
        log::info!("Game restarted");
        Ok(())
    }

    /// Jump straight to a level
    pub fn start_level(&mut self, level: u32) -> Result<()> {
        self.events.clear();
        self.load_level(level)?;
        self.player.heal_full();
        self.player.place(self.config.player.start_position);
        Ok(())
    }

    fn load_level(&mut self, level: u32) -> Result<()> {
        let out_of_range = SimError::LevelOutOfRange {
            level,
            max: self.config.max_level,
        };
        if level == 0 || level > self.config.max_level {
            return Err(out_of_range);
        }
        let points = spawn_points(level).ok_or(out_of_range)?;

        self.registry.clear();
        self.world.build(level, &mut self.registry)?;

        self.enemies = points
            .into_iter()
            .enumerate()
            .map(|(index, spawn)| Enemy::new(index, spawn, self.config.enemy.clone()))
            .collect();
        self.player.projectiles_mut().clear();

        self.level = level;
        self.enemies_killed = 0;
        self.grace_timer = None;
        self.state = GameState::Playing;

        log::info!("Level {} started with {} enemies", level, self.enemies.len());
        self.events.push(CombatEvent::LevelStarted {
            level,
            enemies: self.enemies.len(),
        });
        Ok(())
    }
}

impl std::fmt::Debug for CombatSimulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatSimulation")
            .field("state", &self.state)
            .field("level", &self.level)
            .field("enemies_alive", &self.enemies_alive())
            .field("enemies_killed", &self.enemies_killed)
            .field("player", &self.player)
            .finish()
    }
}

/// Report a state change a hit forced on a surviving enemy (a retreat below
/// its health threshold)
fn push_damage_transition(
    events: &mut EventCollector,
    index: usize,
    before: EnemyState,
    enemy: &Enemy,
) {
    let state = enemy.state();
    if enemy.is_alive() && state != before {
        events.push(CombatEvent::EnemyStateChanged {
            enemy: index,
            state,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::FlatGround;
    use crate::input::InputState;
    use crate::services::{AudioError, RecordingAudio, RecordingEffects};
    use skirmish_combat::Projectile;
    use std::cell::Cell;
    use std::rc::Rc;

    const DT: f32 = 1.0 / 60.0;

    fn flat_sim() -> CombatSimulation {
        CombatSimulation::with_world(SimConfig::default(), Box::new(FlatGround)).unwrap()
    }

    #[test]
    fn test_starts_on_level_one() {
        let sim = flat_sim();
        assert_eq!(sim.state(), GameState::Playing);
        assert_eq!(sim.level(), 1);
        assert_eq!(sim.enemies().len(), 5);
        assert_eq!(sim.enemies_alive(), 5);
        assert_eq!(sim.registry().len(), 1);
    }

    #[test]
    fn test_projectile_hits_one_enemy_once() {
        let audio = RecordingAudio::new();
        let effects = RecordingEffects::new();
        let mut sim = flat_sim()
            .with_audio(Box::new(audio.clone()))
            .with_effects(Box::new(effects.clone()));

        // Park two enemies on top of each other in the round's path
        let spot = Vec3::new(0.0, 0.0, -10.0);
        sim.enemy_mut(0).unwrap().place(spot);
        sim.enemy_mut(1).unwrap().place(spot);
        sim.player_mut()
            .projectiles_mut()
            .push(Projectile::spawn(spot + Vec3::Y, Vec3::NEG_Z, 0.0, 25));

        sim.tick(&mut InputState::new(), DT);

        let hits = sim
            .events()
            .iter()
            .filter(|e| matches!(e, CombatEvent::EnemyHit { .. }))
            .count();
        assert_eq!(hits, 1);
        assert_eq!(sim.enemies()[0].health().current(), 75);
        assert_eq!(sim.enemies()[1].health().current(), 100);
        assert_eq!(audio.count(sounds::IMPACT), 1);
        // Effect at torso height above the feet; the enemy may have taken a step
        let (effect_at, _) = effects.hits()[0];
        assert!(effect_at.distance(spot + Vec3::Y) < 0.2);
        assert_eq!(effect_at.y, 1.0);
        assert!(sim.player().projectiles().is_empty());
    }

    #[test]
    fn test_enemy_round_uses_its_own_damage() {
        let mut sim = flat_sim();
        let feet = sim.player().feet();
        sim.enemy_mut(0)
            .unwrap()
            .projectiles_mut()
            .push(Projectile::spawn(feet + Vec3::Y * 1.5, Vec3::X, 0.0, 10));

        sim.tick(&mut InputState::new(), DT);
        assert_eq!(sim.player().health().current(), 140);
        assert_eq!(sim.events().player_hits().count(), 1);
    }

    #[test]
    fn test_player_death_freezes() {
        let mut sim = flat_sim();
        let feet = sim.player().feet();
        for _ in 0..20 {
            sim.enemy_mut(0)
                .unwrap()
                .projectiles_mut()
                .push(Projectile::spawn(feet + Vec3::Y, Vec3::X, 0.0, 10));
        }

        sim.tick(&mut InputState::new(), DT);
        assert_eq!(sim.state(), GameState::PlayerDead);
        assert_eq!(sim.player().health().current(), 0);
        // Fifteen rounds land, the rest pass through a corpse
        assert_eq!(sim.events().player_hits().count(), 15);

        let frozen = sim.elapsed();
        let enemy_position = sim.enemies()[2].position();
        for _ in 0..30 {
            assert!(sim.tick(&mut InputState::new(), DT).is_empty());
        }
        assert_eq!(sim.elapsed(), frozen);
        assert_eq!(sim.enemies()[2].position(), enemy_position);
    }

    #[test]
    fn test_respawn_revives_everyone() {
        let mut sim = flat_sim();
        sim.damage_enemy(3, 1000);
        assert!(!sim.respawn());

        let feet = sim.player().feet();
        sim.enemy_mut(0)
            .unwrap()
            .projectiles_mut()
            .push(Projectile::spawn(feet + Vec3::Y, Vec3::X, 0.0, 1000));
        sim.tick(&mut InputState::new(), DT);
        assert_eq!(sim.state(), GameState::PlayerDead);

        assert!(sim.respawn());
        assert_eq!(sim.state(), GameState::Playing);
        assert_eq!(sim.enemies_alive(), 5);
        assert_eq!(sim.player().position(), Vec3::new(-50.0, 1.7, -50.0));
        assert_eq!(sim.enemies_killed(), 0);
    }

    #[test]
    fn test_level_complete_after_grace() {
        let mut sim = flat_sim();
        let mut input = InputState::new();
        for index in 0..5 {
            assert!(sim.damage_enemy(index, 100).unwrap().killed);
        }
        assert_eq!(sim.enemies_killed(), 5);
        assert_eq!(sim.grace_remaining(), Some(0.5));

        let mut signals = 0;
        let mut ticks = 0;
        while sim.state() == GameState::Playing {
            if sim.tick(&mut input, DT).level_completed() {
                signals += 1;
            }
            ticks += 1;
            assert!(ticks <= 31);
        }
        assert_eq!(ticks, 30);
        assert_eq!(signals, 1);
        assert_eq!(sim.state(), GameState::LevelComplete);

        // Frozen: no second signal
        assert!(!sim.tick(&mut input, DT).level_completed());
    }

    #[test]
    fn test_advance_through_all_levels() {
        let mut sim = flat_sim();
        assert_eq!(sim.advance_level().unwrap(), GameState::Playing);
        assert_eq!(sim.level(), 2);
        assert_eq!(sim.enemies().len(), 10);
        assert_eq!(sim.enemies_killed(), 0);

        sim.advance_level().unwrap();
        assert_eq!(sim.enemies().len(), 18);

        assert_eq!(sim.advance_level().unwrap(), GameState::GameComplete);
        assert_eq!(sim.level(), 3);

        sim.restart().unwrap();
        assert_eq!(sim.level(), 1);
        assert_eq!(sim.state(), GameState::Playing);
        assert_eq!(sim.player().position(), Vec3::new(0.0, 1.7, 0.0));
    }

    #[test]
    fn test_level_out_of_range() {
        let mut sim = flat_sim();
        assert!(matches!(
            sim.start_level(4),
            Err(SimError::LevelOutOfRange { level: 4, max: 3 })
        ));
        assert!(sim.start_level(0).is_err());
        // Failed loads leave the current level alone
        assert_eq!(sim.level(), 1);
        assert_eq!(sim.enemies().len(), 5);
    }

    #[test]
    fn test_player_shot_side_effects() {
        let audio = RecordingAudio::new();
        let effects = RecordingEffects::new();
        let mut sim = flat_sim()
            .with_audio(Box::new(audio.clone()))
            .with_effects(Box::new(effects.clone()));

        let mut input = InputState {
            fire: true,
            ..Default::default()
        };
        sim.tick(&mut input, DT);

        assert_eq!(audio.count("rifle_shot"), 1);
        assert_eq!(effects.tracers().len(), 1);
        assert_eq!(sim.events().shots().count(), 1);
    }

    #[test]
    fn test_damage_forced_retreat_is_reported() {
        let mut sim = flat_sim();
        assert_ne!(sim.enemies()[0].state(), EnemyState::Retreat);

        let outcome = sim.damage_enemy(0, 75).unwrap();
        assert!(!outcome.killed);
        assert_eq!(sim.enemies()[0].state(), EnemyState::Retreat);
        assert!(sim.events().iter().any(|e| matches!(
            e,
            CombatEvent::EnemyStateChanged {
                enemy: 0,
                state: EnemyState::Retreat
            }
        )));

        // Further hits keep it retreating without a second report
        let before = sim.events().len();
        sim.damage_enemy(0, 5);
        let repeats = sim
            .events()
            .iter()
            .skip(before)
            .filter(|e| matches!(e, CombatEvent::EnemyStateChanged { .. }))
            .count();
        assert_eq!(repeats, 0);
    }

    #[test]
    fn test_projectile_forced_retreat_is_reported() {
        let mut sim = flat_sim();
        let spot = Vec3::new(0.0, 0.0, -10.0);
        sim.enemy_mut(1).unwrap().place(spot);
        sim.damage_enemy(1, 50);
        sim.player_mut()
            .projectiles_mut()
            .push(Projectile::spawn(spot + Vec3::Y, Vec3::NEG_Z, 0.0, 25));

        sim.tick(&mut InputState::new(), DT);

        assert_eq!(sim.enemies()[1].health().current(), 25);
        assert_eq!(sim.enemies()[1].state(), EnemyState::Retreat);
        let retreats = sim
            .events()
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    CombatEvent::EnemyStateChanged {
                        enemy: 1,
                        state: EnemyState::Retreat
                    }
                )
            })
            .count();
        assert_eq!(retreats, 1);
    }

    /// Rejects every sound and counts the attempts
    struct FailingAudio {
        attempts: Rc<Cell<usize>>,
    }

    impl AudioSink for FailingAudio {
        fn play(&mut self, name: &str, _volume: f32) -> std::result::Result<(), AudioError> {
            self.attempts.set(self.attempts.get() + 1);
            Err(AudioError::Unavailable(name.to_string()))
        }
    }

    /// Shoot an enemy, fire, reload and let the reload finish
    fn run_with_audio(audio: Box<dyn AudioSink>) -> (CombatSimulation, Vec<CombatEvent>) {
        let mut sim = flat_sim().with_audio(audio);
        let spot = Vec3::new(0.0, 0.0, -10.0);
        sim.enemy_mut(0).unwrap().place(spot);
        sim.player_mut()
            .projectiles_mut()
            .push(Projectile::spawn(spot + Vec3::Y, Vec3::NEG_Z, 0.0, 25));

        let mut log = Vec::new();
        let mut fire = InputState {
            fire: true,
            ..Default::default()
        };
        log.extend(sim.tick(&mut fire, DT).iter().cloned());
        let mut reload = InputState {
            reload: true,
            ..Default::default()
        };
        log.extend(sim.tick(&mut reload, DT).iter().cloned());
        for _ in 0..150 {
            log.extend(sim.tick(&mut InputState::new(), DT).iter().cloned());
        }
        (sim, log)
    }

    #[test]
    fn test_failing_audio_changes_nothing() {
        let attempts = Rc::new(Cell::new(0));
        let (failing, failing_log) = run_with_audio(Box::new(FailingAudio {
            attempts: attempts.clone(),
        }));
        let recorder = RecordingAudio::new();
        let (working, working_log) = run_with_audio(Box::new(recorder.clone()));

        assert_eq!(attempts.get(), recorder.played().len());
        assert!(recorder.count(sounds::IMPACT) >= 1);
        assert!(recorder.count(sounds::RELOAD) >= 1);

        assert_eq!(failing_log, working_log);
        assert!(failing_log
            .iter()
            .any(|e| matches!(e, CombatEvent::EnemyHit { enemy: 0, .. })));
        assert!(failing_log.iter().any(|e| matches!(
            e,
            CombatEvent::ReloadAttempted {
                attempt: ReloadAttempt::Started,
                ..
            }
        )));

        assert_eq!(failing.state(), working.state());
        assert_eq!(failing.elapsed(), working.elapsed());
        assert_eq!(
            failing.player().health().current(),
            working.player().health().current()
        );
        assert_eq!(
            failing.player().current_weapon().current_ammo(),
            working.player().current_weapon().current_ammo()
        );
        for (a, b) in failing.enemies().iter().zip(working.enemies()) {
            assert_eq!(a.health().current(), b.health().current());
            assert_eq!(a.state(), b.state());
            assert_eq!(a.position(), b.position());
        }
    }
}
