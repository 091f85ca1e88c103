//! Outward side effects: sound and visual feedback
//!
//! The simulation only names what happened. Front ends plug in real
//! playback and particle systems; headless runs use the null sinks.

use glam::Vec3;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

/// Sound names emitted by the simulation
pub mod sounds {
    pub const RELOAD: &str = "reload";
    pub const IMPACT: &str = "impact";
    pub const ENEMY_SHOT: &str = "rifle_shot";
}

/// Audio playback errors
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Sound not loaded: {0}")]
    NotLoaded(String),

    #[error("Audio output unavailable: {0}")]
    Unavailable(String),
}

/// Plays named one-shot sounds
pub trait AudioSink {
    fn play(&mut self, name: &str, volume: f32) -> Result<(), AudioError>;
}

/// Spawns transient visual effects
pub trait EffectSink {
    /// Impact effect where a projectile struck a combatant
    fn spawn_hit_effect(&mut self, position: Vec3, direction: Vec3);

    /// Tracer for a freshly fired projectile
    fn spawn_tracer(&mut self, origin: Vec3, direction: Vec3);
}

/// Play a sound, logging and discarding any failure
pub(crate) fn play_sound(audio: &mut dyn AudioSink, name: &str, volume: f32) {
    if let Err(e) = audio.play(name, volume) {
        log::debug!("Sound {} dropped: {}", name, e);
    }
}

/// Discards all sounds
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _name: &str, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Discards all effects
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEffects;

impl EffectSink for NullEffects {
    fn spawn_hit_effect(&mut self, _position: Vec3, _direction: Vec3) {}

    fn spawn_tracer(&mut self, _origin: Vec3, _direction: Vec3) {}
}

/// Keeps every played sound. Clones share one buffer, so a test can keep a
/// handle while the simulation owns the sink.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    played: Arc<Mutex<Vec<(String, f32)>>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<(String, f32)> {
        self.played.lock().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.played.lock().iter().filter(|(n, _)| n == name).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, name: &str, volume: f32) -> Result<(), AudioError> {
        self.played.lock().push((name.to_string(), volume));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct EffectLog {
    hits: Vec<(Vec3, Vec3)>,
    tracers: Vec<(Vec3, Vec3)>,
}

/// Keeps every spawned effect; clones share one buffer
#[derive(Debug, Default, Clone)]
pub struct RecordingEffects {
    log: Arc<Mutex<EffectLog>>,
}

impl RecordingEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// (position, direction) of every hit effect
    pub fn hits(&self) -> Vec<(Vec3, Vec3)> {
        self.log.lock().hits.clone()
    }

    /// (origin, direction) of every tracer
    pub fn tracers(&self) -> Vec<(Vec3, Vec3)> {
        self.log.lock().tracers.clone()
    }
}

impl EffectSink for RecordingEffects {
    fn spawn_hit_effect(&mut self, position: Vec3, direction: Vec3) {
        self.log.lock().hits.push((position, direction));
    }

    fn spawn_tracer(&mut self, origin: Vec3, direction: Vec3) {
        self.log.lock().tracers.push((origin, direction));
    }
}
