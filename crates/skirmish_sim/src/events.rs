//! Combat events raised during a tick

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skirmish_ai::EnemyState;
use skirmish_combat::{ReloadAttempt, WeaponKind};

/// Who pulled the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shooter {
    Player(WeaponKind),
    Enemy(usize),
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A projectile left a muzzle
    ShotFired {
        shooter: Shooter,
        origin: Vec3,
        direction: Vec3,
    },
    /// A reload request was answered
    ReloadAttempted {
        weapon: WeaponKind,
        attempt: ReloadAttempt,
    },
    /// A reload finished
    Reloaded { shooter: Shooter, rounds: u32 },
    /// Player switched weapon slot
    WeaponSwitched { slot: usize },
    /// An enemy changed state on its own decision or under fire
    EnemyStateChanged { enemy: usize, state: EnemyState },
    EnemyHit {
        enemy: usize,
        damage: u32,
        point: Vec3,
    },
    EnemyKilled { enemy: usize, total_killed: u32 },
    PlayerHit {
        enemy: usize,
        damage: u32,
        health: u32,
    },
    PlayerDied,
    /// Last enemy down; the grace timer is running
    LevelCleared { level: u32 },
    /// Grace timer expired
    LevelComplete { level: u32, kills: u32 },
    LevelStarted { level: u32, enemies: usize },
    GameComplete,
    Respawned,
}

impl CombatEvent {
    /// Check if this is a kill
    pub fn is_kill(&self) -> bool {
        matches!(self, Self::EnemyKilled { .. })
    }

    /// Check if this is damage to the player
    pub fn is_player_damage(&self) -> bool {
        matches!(self, Self::PlayerHit { .. })
    }
}

/// Handler trait for combat events
pub trait CombatEventHandler {
    fn on_event(&mut self, event: &CombatEvent);
}

/// Collects events into a buffer
#[derive(Debug, Default, Clone)]
pub struct EventCollector {
    /// Events raised this tick
    pub events: Vec<CombatEvent>,
}

impl EventCollector {
    /// Create a new event collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all collected events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get kill events
    pub fn kills(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter().filter(|e| e.is_kill())
    }

    /// Get damage taken by the player
    pub fn player_hits(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter().filter(|e| e.is_player_damage())
    }

    /// Get shots fired by anyone
    pub fn shots(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, CombatEvent::ShotFired { .. }))
    }

    /// Check whether a level-complete signal was raised
    pub fn level_completed(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, CombatEvent::LevelComplete { .. }))
    }
}

impl CombatEventHandler for EventCollector {
    fn on_event(&mut self, event: &CombatEvent) {
        self.events.push(event.clone());
    }
}
