//! Audio system using Web Audio API
//!
//! Procedurally generated sound - no external files needed. The context runs
//! only while the session is `Playing` and is suspended otherwise. Every
//! failure is logged and dropped; audio never stops the game loop.

use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Upward impulse
    Jump,
    /// Cleared an obstacle
    Score,
    /// Lost a life
    Hit,
    /// Lost the last life
    GameOver,
    /// New best score
    NewBest,
}

impl SoundEffect {
    /// The cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::Scored { .. } => Some(SoundEffect::Score),
            GameEvent::Damaged { .. } => Some(SoundEffect::Hit),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::NewBest { .. } => Some(SoundEffect::NewBest),
            _ => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Background drone, created on first play
    music: Option<(OscillatorNode, GainNode)>,
    sfx_gain: f32,
    music_gain: f32,
    playing: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            music: None,
            sfx_gain: settings.sfx_gain(),
            music_gain: settings.music_gain(),
            playing: false,
        }
    }

    /// Pick up volume/mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_gain = settings.sfx_gain();
        self.music_gain = settings.music_gain();
        if let Some((_, gain)) = &self.music {
            gain.gain().set_value(self.music_gain * 0.15);
        }
    }

    /// Play while `Playing`, pause otherwise
    pub fn sync_phase(&mut self, phase: GamePhase) {
        let should_play = phase == GamePhase::Playing;
        if should_play == self.playing {
            return;
        }
        self.playing = should_play;

        let Some(ctx) = &self.ctx else { return };
        if should_play {
            if self.music.is_none() {
                self.music = self.start_music(ctx);
            }
            if ctx.state() != AudioContextState::Running {
                settle("resume", ctx.resume());
            }
        } else if ctx.state() == AudioContextState::Running {
            settle("suspend", ctx.suspend());
        }
    }

    /// Pause regardless of phase (tab hidden)
    pub fn pause(&mut self) {
        self.playing = false;
        if let Some(ctx) = &self.ctx {
            settle("suspend", ctx.suspend());
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.sfx_gain;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        match effect {
            SoundEffect::Jump => self.play_jump(ctx, vol),
            SoundEffect::Score => self.play_score(ctx, vol),
            SoundEffect::Hit => self.play_hit(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::NewBest => self.play_new_best(ctx, vol),
        }
    }

    /// Play the cues for a batch of simulation events
    pub fn play_events(&self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
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

    /// Low sustained drone under gameplay
    fn start_music(&self, ctx: &AudioContext) -> Option<(OscillatorNode, GainNode)> {
        let (osc, gain) = self.create_osc(ctx, 110.0, OscillatorType::Triangle)?;
        gain.gain().set_value(self.music_gain * 0.15);
        osc.start().ok()?;
        Some((osc, gain))
    }

    /// Jump - quick rising chirp
    fn play_jump(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(800.0, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Score - two-note ding
    fn play_score(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [520.0, 680.0].iter().enumerate() {
            let delay = i as f64 * 0.1;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Hit - harsh falling buzz
    fn play_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.25)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 0.25)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
    }

    /// Game over - long falling whistle ending in a low thump
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 660.0, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.7).ok();
            osc.frequency().set_value_at_time(660.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(90.0, t + 0.7)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.75).ok();
        }

        // Landing
        if let Some((osc, gain)) = self.create_osc(ctx, 70.0, OscillatorType::Sine) {
            let land = t + 0.7;
            gain.gain().set_value_at_time(0.0001, t).ok();
            gain.gain().set_value_at_time(vol * 0.5, land).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, land + 0.35)
                .ok();
            osc.frequency().set_value_at_time(70.0, land).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, land + 0.35)
                .ok();
            osc.start_with_when(land).ok();
            osc.stop_with_when(land + 0.4).ok();
        }
    }

    /// New best - one square voice stepping up a major arpeggio, then a trill
    fn play_new_best(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 392.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();
        // G4 B4 D5 G5, then trill G5/A5
        let steps = [392.0, 494.0, 587.0, 784.0, 880.0, 784.0, 880.0, 784.0];
        let step_len = 0.07;

        for (i, freq) in steps.iter().enumerate() {
            osc.frequency()
                .set_value_at_time(*freq, t + i as f64 * step_len)
                .ok();
        }
        let end = t + steps.len() as f64 * step_len;
        gain.gain().set_value_at_time(vol * 0.12, t).ok();
        gain.gain().set_value_at_time(vol * 0.12, end - 0.1).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, end + 0.2).ok();

        osc.start().ok();
        osc.stop_with_when(end + 0.25).ok();
    }
}

/// Wait for a resume/suspend promise in the background and log rejections
/// (autoplay policies reject `resume()` before a user gesture)
fn settle(what: &'static str, promise: Result<js_sys::Promise, wasm_bindgen::JsValue>) {
    match promise {
        Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("Audio {} rejected: {:?}", what, e);
            }
        }),
        Err(e) => log::warn!("Audio {} failed: {:?}", what, e),
    }
}
