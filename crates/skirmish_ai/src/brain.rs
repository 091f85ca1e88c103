//! Enemy decision table

use crate::profile::EnemyProfile;
use crate::state_machine::{State, StateMachine};
use serde::{Deserialize, Serialize};

/// What an enemy is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnemyState {
    #[default]
    Idle,
    Patrol,
    Chase,
    Shoot,
    Reload,
    Retreat,
}

impl State for EnemyState {}

impl std::fmt::Display for EnemyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Patrol => "patrol",
            Self::Chase => "chase",
            Self::Shoot => "shoot",
            Self::Reload => "reload",
            Self::Retreat => "retreat",
        };
        f.write_str(name)
    }
}

/// Snapshot the transitions are evaluated against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiContext {
    /// Distance to the target
    pub distance: f32,
    /// Line of sight to the target
    pub can_see: bool,
    pub ammo: u32,
    pub health: u32,
    /// Seconds in the current state, after this tick's advance
    pub state_time: f32,
}

pub type EnemyBrain = StateMachine<EnemyState, AiContext>;

/// Build the enemy transition table from a profile.
///
/// Detection and firing ranges are inclusive. Within a state, higher
/// priorities win, so an empty magazine in `Shoot` beats low health.
pub fn build_brain(profile: &EnemyProfile) -> EnemyBrain {
    use EnemyState::*;

    let detection = profile.detection_range;
    let lose_range = profile.detection_range * profile.lose_range_factor;
    let shoot_range = profile.shoot_range;
    let shoot_exit = profile.shoot_range * profile.shoot_exit_factor;
    let idle_delay = profile.idle_patrol_delay;
    let magazine = profile.magazine_size;
    let retreat_health = profile.retreat_health;
    let recover_health = profile.recover_health;

    let mut brain = StateMachine::new(Idle);

    let acquires = move |ctx: &AiContext| ctx.can_see && ctx.distance <= detection;

    brain.add_transition_priority(Idle, Chase, acquires, 1);
    brain.add_transition(Idle, Patrol, move |ctx| ctx.state_time > idle_delay);

    brain.add_transition(Patrol, Chase, acquires);

    brain.add_transition_priority(
        Chase,
        Patrol,
        move |ctx| !ctx.can_see || ctx.distance > lose_range,
        1,
    );
    brain.add_transition(Chase, Shoot, move |ctx| {
        ctx.can_see && ctx.distance <= shoot_range
    });

    brain.add_transition_priority(Shoot, Reload, |ctx| ctx.ammo == 0, 3);
    brain.add_transition_priority(Shoot, Retreat, move |ctx| ctx.health < retreat_health, 2);
    brain.add_transition_priority(
        Shoot,
        Chase,
        move |ctx| !ctx.can_see || ctx.distance > shoot_exit,
        1,
    );

    brain.add_transition(Reload, Shoot, move |ctx| ctx.ammo >= magazine);

    // Health never regenerates; only an external heal gets here
    brain.add_transition(Retreat, Chase, move |ctx| ctx.health > recover_health);

    brain
}
