//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Every trigger builds fresh oscillator nodes, so overlapping effects layer
//! instead of cutting each other off.

use web_sys::OscillatorType::{Sawtooth, Sine, Square, Triangle};
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::{GameEvent, SoundEffect};

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Effect gain taken from `Settings::effective_volume`
    volume: f32,
    /// Silenced while the game is paused or unfocused
    suspended: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: Settings::default().effective_volume(),
            suspended: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Pull volume and mute from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Silence output without touching the configured volume
    pub fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    fn effective_volume(&self) -> f32 {
        if self.suspended { 0.0 } else { self.volume }
    }

    /// Voice whatever a simulation event calls for
    pub fn handle(&self, event: &GameEvent) {
        match event {
            GameEvent::Sound(effect) => self.play(*effect),
            GameEvent::LevelWon => self.with_ctx(|ctx, vol| self.play_voices(ctx, vol, LEVEL_WON)),
            GameEvent::HeroDied => self.with_ctx(|ctx, vol| self.play_voices(ctx, vol, HERO_DIED)),
            GameEvent::Glitch => {}
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let voices = match effect {
            SoundEffect::Pew => PEW,
            SoundEffect::Impact => IMPACT,
            SoundEffect::Hit => HIT,
            SoundEffect::Explosion => EXPLOSION,
            SoundEffect::Point => POINT,
        };
        self.with_ctx(|ctx, vol| self.play_voices(ctx, vol, voices));
    }

    fn with_ctx(&self, f: impl FnOnce(&AudioContext, f32)) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        f(ctx, vol);
    }

    // === Sound generators ===

    /// Schedule every voice of an effect, offsets relative to now
    fn play_voices(&self, ctx: &AudioContext, vol: f32, voices: &[Voice]) {
        let now = ctx.current_time();
        for voice in voices {
            self.play_voice(ctx, vol, now, voice);
        }
    }

    fn play_voice(&self, ctx: &AudioContext, vol: f32, now: f64, voice: &Voice) {
        let Some((osc, gain)) = self.create_osc(ctx, voice.freq, voice.wave) else {
            return;
        };
        let t = now + voice.delay;
        let end = t + voice.duration;

        // Short linear attack, then exponential decay to silence
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(vol * voice.gain, t + ATTACK_SECS)
            .ok();
        gain.gain().exponential_ramp_to_value_at_time(0.001, end).ok();

        osc.frequency().set_value_at_time(voice.freq, t).ok();
        if voice.glide_to != voice.freq {
            osc.frequency()
                .exponential_ramp_to_value_at_time(voice.glide_to, end)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(end + 0.02).ok();
    }

    /// Create an oscillator routed through its own gain node
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}

const ATTACK_SECS: f64 = 0.005;

/// One oscillator in an effect
struct Voice {
    wave: OscillatorType,
    freq: f32,
    /// Frequency reached at the end of the voice (equal to `freq` for a flat tone)
    glide_to: f32,
    gain: f32,
    /// Start offset (s)
    delay: f64,
    /// Attack-to-silence length (s)
    duration: f64,
}

const fn voice(
    wave: OscillatorType,
    freq: f32,
    glide_to: f32,
    gain: f32,
    delay: f64,
    duration: f64,
) -> Voice {
    Voice {
        wave,
        freq,
        glide_to,
        gain,
        delay,
        duration,
    }
}

/// Laser chirp
const PEW: &[Voice] = &[
    voice(Square, 1400.0, 260.0, 0.12, 0.0, 0.11),
    voice(Sine, 2800.0, 700.0, 0.05, 0.0, 0.06),
];

/// Dull knock with a metallic tick
const IMPACT: &[Voice] = &[
    voice(Triangle, 320.0, 180.0, 0.3, 0.0, 0.07),
    voice(Square, 2600.0, 2600.0, 0.06, 0.0, 0.025),
];

/// Body blow when an enemy rams the hero
const HIT: &[Voice] = &[
    voice(Sine, 180.0, 45.0, 0.6, 0.0, 0.18),
    voice(Sawtooth, 90.0, 60.0, 0.15, 0.0, 0.12),
];

/// Enemy cone bursting into particles
const EXPLOSION: &[Voice] = &[
    voice(Sawtooth, 90.0, 25.0, 0.45, 0.0, 0.6),
    voice(Triangle, 60.0, 20.0, 0.35, 0.02, 0.8),
    voice(Square, 900.0, 200.0, 0.12, 0.0, 0.08),
];

/// Pad collected: bright upward triad
const POINT: &[Voice] = &[
    voice(Sine, 660.0, 680.0, 0.22, 0.0, 0.12),
    voice(Sine, 990.0, 1010.0, 0.22, 0.06, 0.12),
    voice(Sine, 1320.0, 1350.0, 0.22, 0.12, 0.2),
];

/// Level cleared: C major arpeggio, top note held
const LEVEL_WON: &[Voice] = &[
    voice(Square, 523.0, 523.0, 0.12, 0.0, 0.14),
    voice(Square, 659.0, 659.0, 0.12, 0.12, 0.14),
    voice(Square, 784.0, 784.0, 0.12, 0.24, 0.14),
    voice(Square, 1047.0, 1047.0, 0.14, 0.36, 0.6),
    voice(Triangle, 262.0, 262.0, 0.2, 0.36, 0.6),
];

/// Hero destroyed: long falling synth groan
const HERO_DIED: &[Voice] = &[
    voice(Sawtooth, 440.0, 110.0, 0.25, 0.0, 1.2),
    voice(Sine, 220.0, 55.0, 0.35, 0.0, 1.4),
];
