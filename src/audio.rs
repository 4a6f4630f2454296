//! Sound cues
//!
//! The game only fires cues; playing them is up to a host-supplied
//! [`SoundTrigger`]. Hosts may fail (e.g. browsers keep audio locked until a
//! user gesture), and [`AudioManager`] drops those failures so the simulation
//! never notices.

use thiserror::Error;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Jump from the ground
    Jump,
    /// Banked air jump
    AirJump,
    /// Enemy hit
    Crash,
    /// Angel collected
    PowerUp,
    /// Run started
    Start,
    /// Run ended
    GameOver,
}

impl SoundEffect {
    /// Cue for a simulation event
    pub fn for_event(event: GameEvent) -> SoundEffect {
        match event {
            GameEvent::Jump => SoundEffect::Jump,
            GameEvent::AirJump => SoundEffect::AirJump,
            GameEvent::Crash => SoundEffect::Crash,
            GameEvent::PowerUp => SoundEffect::PowerUp,
            GameEvent::RunStarted => SoundEffect::Start,
            GameEvent::GameOver => SoundEffect::GameOver,
        }
    }

    /// Mix level relative to the other cues
    fn base_volume(self) -> f32 {
        match self {
            SoundEffect::Jump | SoundEffect::AirJump => 0.5,
            SoundEffect::PowerUp => 0.7,
            SoundEffect::Crash | SoundEffect::GameOver => 1.0,
            SoundEffect::Start => 0.6,
        }
    }
}

/// Reasons a host could not play a cue
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output is locked until a user gesture")]
    Locked,
    #[error("audio backend unavailable: {0}")]
    Unavailable(String),
}

/// Host audio output
pub trait SoundTrigger {
    /// Fire and forget
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Logs cues instead of playing them
#[derive(Debug, Default)]
pub struct LogSound;

impl SoundTrigger for LogSound {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        log::debug!("sound {:?} at {:.2}", effect, volume);
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    output: Box<dyn SoundTrigger>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(output: Box<dyn SoundTrigger>) -> Self {
        Self {
            output,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Take volumes and mute state from user settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(!settings.sound_enabled);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn toggle_muted(&mut self) {
        self.muted = !self.muted;
        log::info!("Sound {}", if self.muted { "off" } else { "on" });
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect, ignoring host failures
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume() * effect.base_volume();
        if vol <= 0.0 {
            return;
        }
        if let Err(e) = self.output.play(effect, vol) {
            log::debug!("Dropped sound {:?}: {}", effect, e);
        }
    }
}
