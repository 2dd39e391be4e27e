//! Audio feedback
//!
//! Procedurally generated tones - no external files needed. The game only
//! raises semantic events; `ToneAudio` turns them into `Tone`s for a
//! `ToneSink` (Web Audio in the browser, the log on native).

use rand::Rng;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

/// Semantic audio events raised by the frame driver
pub trait AudioFeedback {
    fn on_game_start(&mut self);
    fn on_collect(&mut self);
    fn on_crash(&mut self);
    fn on_music_start(&mut self);
    fn on_music_stop(&mut self);
    /// Wall-clock poll, once per frame
    fn update(&mut self, now_ms: f64);
}

/// Plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioFeedback for SilentAudio {
    fn on_game_start(&mut self) {}
    fn on_collect(&mut self) {}
    fn on_crash(&mut self) {}
    fn on_music_start(&mut self) {}
    fn on_music_stop(&mut self) {}
    fn update(&mut self, _now_ms: f64) {}
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// One enveloped oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    pub waveform: Waveform,
    /// Seconds from attack to silence
    pub duration: f64,
    /// Peak gain before the master bus
    pub volume: f32,
    /// Seconds to wait before the attack
    pub delay: f64,
}

impl Tone {
    const fn sine(freq: f32, duration: f64, volume: f32) -> Self {
        Self {
            freq,
            waveform: Waveform::Sine,
            duration,
            volume,
            delay: 0.0,
        }
    }
}

/// Pentatonic-ish notes for pickups
pub const COLLECT_NOTES: [f32; 5] = [523.25, 587.33, 659.25, 783.99, 880.0];

/// Ambient drone root (C3) and its intervals
pub const DRONE_ROOT: f32 = 130.81;
pub const DRONE_INTERVALS: [f32; 4] = [1.0, 1.33, 1.5, 2.0];

/// Rising two-note chime
pub fn start_tones() -> [Tone; 2] {
    [
        Tone::sine(440.0, 0.6, 0.2),
        Tone {
            delay: 0.15,
            ..Tone::sine(660.0, 0.6, 0.2)
        },
    ]
}

pub fn collect_tone<R: Rng>(rng: &mut R) -> Tone {
    let note = COLLECT_NOTES[rng.random_range(0..COLLECT_NOTES.len())];
    Tone::sine(note, 0.3, 0.1)
}

/// Low triangle thud
pub fn crash_tone() -> Tone {
    Tone {
        waveform: Waveform::Triangle,
        ..Tone::sine(150.0, 1.0, 0.3)
    }
}

pub fn drone_tone(freq: f32, volume: f32) -> Tone {
    Tone::sine(freq, 4.0, volume)
}

/// Cancellable repeating drone task
///
/// Every `period_ms` while running it rolls once; with probability `chance`
/// it yields a drone frequency. The first roll happens on the first poll
/// after `start`. `stop` cancels synchronously: no roll fires afterwards.
#[derive(Debug, Clone)]
pub struct AmbientLoop {
    period_ms: f64,
    chance: f64,
    running: bool,
    next_due: Option<f64>,
}

impl Default for AmbientLoop {
    fn default() -> Self {
        Self::new(3000.0, 0.4)
    }
}

impl AmbientLoop {
    pub fn new(period_ms: f64, chance: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            chance: chance.clamp(0.0, 1.0),
            running: false,
            next_due: None,
        }
    }

    /// Restart the schedule, dropping any pending occurrence
    pub fn start(&mut self) {
        self.running = true;
        self.next_due = None;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance to `now_ms`; at most one occurrence per poll
    pub fn poll<R: Rng>(&mut self, now_ms: f64, rng: &mut R) -> Option<f32> {
        if !self.running || !now_ms.is_finite() {
            return None;
        }
        if let Some(due) = self.next_due {
            if now_ms < due {
                return None;
            }
        }
        self.next_due = Some(now_ms + self.period_ms);

        if rng.random_bool(self.chance) {
            let mult = DRONE_INTERVALS[rng.random_range(0..DRONE_INTERVALS.len())];
            Some(DRONE_ROOT * mult)
        } else {
            None
        }
    }
}

/// Destination for synthesized tones
pub trait ToneSink {
    fn play(&mut self, tone: &Tone);
    /// Called on game start; browsers need a user gesture to unlock audio
    fn resume(&mut self) {}
}

/// Logs tones instead of playing them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ToneSink for LogSink {
    fn play(&mut self, tone: &Tone) {
        log::trace!(
            "tone {:.2} Hz {:?} {:.2}s vol {:.2}",
            tone.freq,
            tone.waveform,
            tone.duration,
            tone.volume
        );
    }
}

/// Maps game events onto tones
pub struct ToneAudio<S, R> {
    sink: S,
    rng: R,
    ambient: AmbientLoop,
    music_volume: f32,
}

impl<S: ToneSink, R: Rng> ToneAudio<S, R> {
    pub fn new(sink: S, rng: R, music_volume: f32) -> Self {
        Self {
            sink,
            rng,
            ambient: AmbientLoop::default(),
            music_volume: music_volume.clamp(0.0, 1.0),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn ambient(&self) -> &AmbientLoop {
        &self.ambient
    }
}

impl<S: ToneSink, R: Rng> AudioFeedback for ToneAudio<S, R> {
    fn on_game_start(&mut self) {
        self.sink.resume();
        for tone in start_tones() {
            self.sink.play(&tone);
        }
    }

    fn on_collect(&mut self) {
        let tone = collect_tone(&mut self.rng);
        self.sink.play(&tone);
    }

    fn on_crash(&mut self) {
        self.sink.play(&crash_tone());
    }

    fn on_music_start(&mut self) {
        self.ambient.start();
    }

    fn on_music_stop(&mut self) {
        self.ambient.stop();
    }

    fn update(&mut self, now_ms: f64) {
        if let Some(freq) = self.ambient.poll(now_ms, &mut self.rng) {
            self.sink.play(&drone_tone(freq, self.music_volume));
        }
    }
}
