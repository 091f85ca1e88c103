//! Health and damage bookkeeping

use serde::{Deserialize, Serialize};

/// Result of a damage application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// Health actually removed
    pub dealt: u32,
    /// True only for the call that took health from above zero to zero
    pub killed: bool,
}

/// Integer health clamped to `[0, max]`.
///
/// Reaching zero marks the owner dead without destroying anything; `reset`
/// brings it back at full health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    /// Create at full health
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Apply damage. Dead targets take nothing.
    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::default();
        }
        let dealt = amount.min(self.current);
        self.current -= dealt;
        DamageOutcome {
            dealt,
            killed: self.current == 0,
        }
    }

    /// Heal a living target. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current - before
    }

    /// Set health directly (clamped to 0..max)
    pub fn set(&mut self, value: u32) {
        self.current = value.min(self.max);
    }

    /// Back to full health
    pub fn reset(&mut self) {
        self.current = self.max;
    }

    /// Get health as a fraction (0.0 - 1.0)
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}
