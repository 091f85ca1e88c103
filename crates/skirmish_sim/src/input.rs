//! Player intent
//!
//! The simulation never reads devices directly. A front end (window, replay
//! file, scripted bot) implements [`InputProvider`] and the player polls it
//! once per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Per-tick source of player intent
pub trait InputProvider {
    /// Movement axes: `x` strafes right, `y` moves forward. Each in -1.0 - 1.0.
    fn move_axes(&self) -> Vec2;

    /// Accumulated look delta since the last call, then zeroed
    fn take_look_delta(&mut self) -> Vec2;

    fn fire_held(&self) -> bool;

    fn aim_held(&self) -> bool;

    fn reload_requested(&self) -> bool;

    /// Index of the weapon slot the player asked for, if any
    fn weapon_switch_requested(&self) -> Option<usize>;

    fn sprint_held(&self) -> bool;

    fn crouch_held(&self) -> bool;

    fn jump_held(&self) -> bool;
}

/// In-memory input, written by a front end or a test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub move_axes: Vec2,
    pub look_delta: Vec2,
    pub fire: bool,
    pub aim: bool,
    pub reload: bool,
    pub weapon_slot: Option<usize>,
    pub sprint: bool,
    pub crouch: bool,
    pub jump: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw pointer motion
    pub fn add_look(&mut self, dx: f32, dy: f32) {
        self.look_delta += Vec2::new(dx, dy);
    }

    /// Release everything
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl InputProvider for InputState {
    fn move_axes(&self) -> Vec2 {
        self.move_axes
    }

    fn take_look_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.look_delta)
    }

    fn fire_held(&self) -> bool {
        self.fire
    }

    fn aim_held(&self) -> bool {
        self.aim
    }

    fn reload_requested(&self) -> bool {
        self.reload
    }

    fn weapon_switch_requested(&self) -> Option<usize> {
        self.weapon_slot
    }

    fn sprint_held(&self) -> bool {
        self.sprint
    }

    fn crouch_held(&self) -> bool {
        self.crouch
    }

    fn jump_held(&self) -> bool {
        self.jump
    }
}
