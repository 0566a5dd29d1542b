//! Audio cues
//!
//! Procedurally described sound effects - no external files needed. The
//! manager turns simulation events into [`Tone`] descriptions and queues them;
//! a platform backend drains the queue and synthesizes them.

use serde::{Deserialize, Serialize};

use crate::driver::FeedbackSink;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// First jump off a surface
    Jump,
    /// Mid-air jump
    AirJump,
    /// Energy core picked up
    Collect,
    /// Power-up picked up
    PowerUp,
    /// Shield spent on a hit
    ShieldAbsorb,
    /// Came down on the ground or a platform
    Land,
    /// Player destroyed
    Death,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped { initial: true } => Some(SoundEffect::Jump),
            GameEvent::Jumped { initial: false } => Some(SoundEffect::AirJump),
            GameEvent::Collected { .. } => Some(SoundEffect::Collect),
            GameEvent::PowerUpPicked { .. } => Some(SoundEffect::PowerUp),
            GameEvent::ShieldAbsorbed { .. } => Some(SoundEffect::ShieldAbsorb),
            GameEvent::Landed { .. } => Some(SoundEffect::Land),
            GameEvent::Died { .. } => Some(SoundEffect::Death),
            _ => None,
        }
    }

    /// Oscillator settings for this effect at full volume
    fn tone(self) -> Tone {
        match self {
            SoundEffect::Jump => Tone::new(440.0, Waveform::Sine, 0.1, 0.1),
            SoundEffect::AirJump => Tone::new(660.0, Waveform::Sine, 0.1, 0.1),
            SoundEffect::Collect | SoundEffect::PowerUp => Tone::new(880.0, Waveform::Square, 0.05, 0.1),
            SoundEffect::ShieldAbsorb => Tone::new(220.0, Waveform::Triangle, 0.15, 0.2),
            // Soft thump
            SoundEffect::Land => Tone::new(150.0, Waveform::Sine, 0.08, 0.05).sweep_to(60.0),
            SoundEffect::Death => Tone::new(100.0, Waveform::Sawtooth, 0.3, 0.1),
        }
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One synthesized note: start at `gain`, decay exponentially over `duration_s`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub effect: Option<SoundEffect>,
    pub frequency: f32,
    /// Frequency at the end of the note, if it bends
    pub end_frequency: Option<f32>,
    pub waveform: Waveform,
    pub duration_s: f32,
    pub gain: f32,
}

impl Tone {
    fn new(frequency: f32, waveform: Waveform, duration_s: f32, gain: f32) -> Self {
        Self {
            effect: None,
            frequency,
            end_frequency: None,
            waveform,
            duration_s,
            gain,
        }
    }

    fn sweep_to(mut self, frequency: f32) -> Self {
        self.end_frequency = Some(frequency);
        self
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    enabled: bool,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    queue: Vec<Tone>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            queue: Vec::new(),
        }
    }

    /// Enable or disable sound entirely (settings toggle)
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.queue.clear();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted || !self.enabled {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Queue a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let mut tone = effect.tone();
        tone.effect = Some(effect);
        tone.gain *= vol;
        self.queue.push(tone);
    }

    /// Tones queued since the last drain, oldest first
    pub fn drain_tones(&mut self) -> Vec<Tone> {
        std::mem::take(&mut self.queue)
    }
}

impl FeedbackSink for AudioManager {
    fn on_event(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }
}
