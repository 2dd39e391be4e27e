//! Frame driver
//!
//! `Game` owns the simulation context and its collaborators. Each animation
//! frame the platform calls `frame` with a millisecond timestamp and the
//! current input, then `render`. Semantic events drained from the simulation
//! are fanned out to audio, haptics, the high-score store and the
//! interstitial schedule.

use crate::audio::{AudioFeedback, SilentAudio};
use crate::haptics::{self, HapticFeedback, NoHaptics};
use crate::highscores::HighScores;
use crate::interstitial::{AdHost, InterstitialSchedule, LogAdHost};
use crate::persistence::KeyValueStore;
use crate::renderer::{Renderer, render_frame};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, SimulationContext, TickInput, Viewport, tick};
use crate::tuning::Tuning;

pub struct Game<S, A = SilentAudio, H = NoHaptics, D = LogAdHost> {
    ctx: SimulationContext,
    store: S,
    high_scores: HighScores,
    settings: Settings,
    audio: A,
    haptics: H,
    ads: D,
    interstitial: InterstitialSchedule,
    /// Timestamp of the previous frame; `None` restarts the baseline
    last_timestamp: Option<f64>,
    /// Latest wall-clock time seen, for commands issued between frames
    now_ms: f64,
}

impl<S: KeyValueStore> Game<S> {
    /// Load settings and the best score from `store`; collaborators start silent
    pub fn new(tuning: Tuning, viewport: Viewport, seed: u64, store: S) -> Self {
        let high_scores = HighScores::load(&store);
        let settings = Settings::load(&store);
        let mut ctx = SimulationContext::new(tuning, viewport, seed);
        ctx.high_score = high_scores.best();
        log::info!("Game initialized with seed: {}", seed);

        Self {
            ctx,
            store,
            high_scores,
            settings,
            audio: SilentAudio,
            haptics: NoHaptics,
            ads: LogAdHost,
            interstitial: InterstitialSchedule::default(),
            last_timestamp: None,
            now_ms: 0.0,
        }
    }
}

impl<S, A, H, D> Game<S, A, H, D> {
    pub fn with_audio<A2: AudioFeedback>(self, audio: A2) -> Game<S, A2, H, D> {
        Game {
            ctx: self.ctx,
            store: self.store,
            high_scores: self.high_scores,
            settings: self.settings,
            audio,
            haptics: self.haptics,
            ads: self.ads,
            interstitial: self.interstitial,
            last_timestamp: self.last_timestamp,
            now_ms: self.now_ms,
        }
    }

    pub fn with_haptics<H2: HapticFeedback>(self, haptics: H2) -> Game<S, A, H2, D> {
        Game {
            ctx: self.ctx,
            store: self.store,
            high_scores: self.high_scores,
            settings: self.settings,
            audio: self.audio,
            haptics,
            ads: self.ads,
            interstitial: self.interstitial,
            last_timestamp: self.last_timestamp,
            now_ms: self.now_ms,
        }
    }

    pub fn with_ads<D2: AdHost>(self, ads: D2) -> Game<S, A, H, D2> {
        Game {
            ctx: self.ctx,
            store: self.store,
            high_scores: self.high_scores,
            settings: self.settings,
            audio: self.audio,
            haptics: self.haptics,
            ads,
            interstitial: self.interstitial,
            last_timestamp: self.last_timestamp,
            now_ms: self.now_ms,
        }
    }

    pub fn with_interstitial(mut self, schedule: InterstitialSchedule) -> Self {
        self.interstitial = schedule;
        self
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn phase(&self) -> GamePhase {
        self.ctx.phase
    }

    pub fn score(&self) -> u64 {
        self.ctx.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_scores.best()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    pub fn ads(&self) -> &D {
        &self.ads
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.ctx.set_viewport(Viewport::new(width, height));
    }

    /// Draw the current state
    pub fn render(&self, renderer: &mut impl Renderer) {
        render_frame(&self.ctx, renderer);
    }
}

impl<S, A, H, D> Game<S, A, H, D>
where
    S: KeyValueStore,
    A: AudioFeedback,
    H: HapticFeedback,
    D: AdHost,
{
    /// Advance one animation frame
    pub fn frame(&mut self, timestamp_ms: f64, input: &TickInput) {
        let raw_ms = match self.last_timestamp {
            Some(last) => timestamp_ms - last,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);
        if timestamp_ms.is_finite() {
            self.now_ms = timestamp_ms;
        }

        let reference = self.ctx.tuning.timing.reference_frame_ms;
        let dt = if reference > 0.0 {
            (raw_ms / reference) as f32
        } else {
            0.0
        };

        tick(&mut self.ctx, input, dt);
        self.dispatch_events();

        if self.settings.sound_enabled {
            self.audio.update(self.now_ms);
        }
        if self.interstitial.poll(self.now_ms) {
            self.ads.show_interstitial();
        }
    }

    /// Start (or restart) a run; no-op while playing
    pub fn start(&mut self) -> bool {
        let started = self.ctx.start();
        self.dispatch_events();
        started
    }

    /// Back to the attract screen from game over
    pub fn home(&mut self) -> bool {
        let went = self.ctx.home();
        self.dispatch_events();
        went
    }

    /// Page visibility changed
    pub fn visibility_changed(&mut self, hidden: bool) {
        if hidden {
            self.ctx.suspend();
        } else {
            // Time spent hidden is never simulated
            self.last_timestamp = None;
            self.ctx.resume();
        }
        self.dispatch_events();
    }

    /// Flip sound on/off; returns the new state
    pub fn toggle_sound(&mut self) -> bool {
        self.settings.sound_enabled = !self.settings.sound_enabled;
        self.settings.save(&mut self.store);

        if self.settings.sound_enabled && self.ctx.phase == GamePhase::Playing {
            self.audio.on_music_start();
        } else {
            self.audio.on_music_stop();
        }
        self.settings.sound_enabled
    }

    /// Flip vibration on/off; returns the new state
    pub fn toggle_haptics(&mut self) -> bool {
        self.settings.haptics_enabled = !self.settings.haptics_enabled;
        self.settings.save(&mut self.store);
        self.settings.haptics_enabled
    }

    fn dispatch_events(&mut self) {
        let sound = self.settings.sound_enabled;
        let vibrate = self.settings.haptics_enabled;

        for event in self.ctx.drain_events() {
            match event {
                GameEvent::Started => {
                    if sound {
                        self.audio.on_game_start();
                        self.audio.on_music_start();
                    }
                }
                GameEvent::Collected { kind, score } => {
                    log::trace!("Collected {:?}, score {}", kind, score);
                    if sound {
                        self.audio.on_collect();
                    }
                    if vibrate {
                        self.haptics.vibrate(haptics::COLLECT_PATTERN);
                    }
                }
                GameEvent::Escalated(difficulty) => {
                    log::debug!("Difficulty now {:?}", difficulty);
                }
                GameEvent::Crashed { .. } => {
                    if sound {
                        self.audio.on_crash();
                    }
                    if vibrate {
                        self.haptics.vibrate(haptics::CRASH_PATTERN);
                    }
                    self.audio.on_music_stop();
                    self.interstitial.on_game_over(self.now_ms);
                }
                GameEvent::NewHighScore(score) => {
                    self.high_scores.record(score, &mut self.store);
                }
                GameEvent::Suspended | GameEvent::ReturnedHome => {
                    self.audio.on_music_stop();
                }
                GameEvent::Resumed => {
                    if sound {
                        self.audio.on_music_start();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::highscores::STORAGE_KEY;
    use crate::persistence::MemoryStore;
    use crate::sim::{FallingObject, ObjectKind};
    use crate::tuning::SpawnPolicy;

    #[derive(Default)]
    struct AudioLog(Vec<&'static str>);

    impl AudioFeedback for AudioLog {
        fn on_game_start(&mut self) {
            self.0.push("start");
        }
        fn on_collect(&mut self) {
            self.0.push("collect");
        }
        fn on_crash(&mut self) {
            self.0.push("crash");
        }
        fn on_music_start(&mut self) {
            self.0.push("music_start");
        }
        fn on_music_stop(&mut self) {
            self.0.push("music_stop");
        }
        fn update(&mut self, _now_ms: f64) {}
    }

    #[derive(Default)]
    struct Buzz(Vec<Vec<u32>>);

    impl HapticFeedback for Buzz {
        fn vibrate(&mut self, pattern: &[u32]) {
            self.0.push(pattern.to_vec());
        }
    }

    #[derive(Default)]
    struct AdCount(u32);

    impl AdHost for AdCount {
        fn show_interstitial(&mut self) {
            self.0 += 1;
        }
    }

    type TestGame = Game<MemoryStore, AudioLog, Buzz, AdCount>;

    fn quiet() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.spawn.policy = SpawnPolicy::Interval;
        tuning.difficulty.initial_spawn_interval = 1.0e9;
        tuning
    }

    fn game_with(store: MemoryStore) -> TestGame {
        Game::new(quiet(), Viewport::new(400.0, 800.0), 77, store)
            .with_audio(AudioLog::default())
            .with_haptics(Buzz::default())
            .with_ads(AdCount::default())
    }

    fn game() -> TestGame {
        game_with(MemoryStore::new())
    }

    /// Put an object right on the ship's collision box
    fn drop_on_ship(game: &mut TestGame, kind: ObjectKind, score: u64) {
        let ctx = &mut game.ctx;
        let pos = ctx.player.pos + Vec2::new(0.0, ctx.player.height / 2.0);
        ctx.pool.objects.acquire(FallingObject {
            pos,
            kind,
            radius: 10.0,
            score,
            ..Default::default()
        });
    }

    #[test]
    fn test_loads_best_score_from_store() {
        let mut store = MemoryStore::new();
        store.set_item(STORAGE_KEY, "42");
        let game = game_with(store);
        assert_eq!(game.high_score(), 42);
        assert_eq!(game.context().high_score, 42);
    }

    #[test]
    fn test_start_plays_chime_and_music() {
        let mut game = game();
        assert!(game.start());
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.audio().0, vec!["start", "music_start"]);
        assert!(!game.start());
    }

    #[test]
    fn test_timestamps_become_nominal_frames() {
        let mut game = game();
        game.start();
        let id = game.ctx.pool.objects.acquire(FallingObject {
            pos: Vec2::new(20.0, 0.0),
            fall_speed: 3.0,
            kind: ObjectKind::Moon,
            radius: 5.0,
            ..Default::default()
        });

        // First frame only establishes the baseline
        game.frame(1000.0, &TickInput::default());
        assert_eq!(game.ctx.pool.objects.get(id).map(|o| o.pos.y), Some(0.0));

        game.frame(1000.0 + 16.67 * 2.0, &TickInput::default());
        let y = game.ctx.pool.objects.get(id).map(|o| o.pos.y).unwrap_or(f32::NAN);
        assert!((y - 6.0).abs() < 1e-3, "y = {y}");
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut game = game();
        game.start();
        game.frame(0.0, &TickInput::default());
        game.frame(60_000.0, &TickInput::default());
        assert!((game.ctx.elapsed - 4.0).abs() < 1e-6);

        // Clock going backwards simulates nothing
        game.frame(10.0, &TickInput::default());
        assert!((game.ctx.elapsed - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_collect_feedback() {
        let mut game = game();
        game.start();
        drop_on_ship(&mut game, ObjectKind::Star, 2);
        game.frame(0.0, &TickInput::default());

        assert_eq!(game.score(), 2);
        assert_eq!(game.audio().0.last(), Some(&"collect"));
        assert_eq!(game.haptics().0, vec![vec![30]]);
    }

    #[test]
    fn test_crash_feedback_and_persistence() {
        let mut game = game();
        game.start();
        drop_on_ship(&mut game, ObjectKind::Galaxy, 3);
        game.frame(0.0, &TickInput::default());
        drop_on_ship(&mut game, ObjectKind::Hazard, 0);
        game.frame(0.0, &TickInput::default());

        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.high_score(), 3);
        assert_eq!(game.store().get_item(STORAGE_KEY).as_deref(), Some("3"));
        assert!(game.audio().0.ends_with(&["crash", "music_stop"]));
        assert_eq!(game.haptics().0.last(), Some(&vec![200, 100, 200]));
    }

    #[test]
    fn test_lower_score_leaves_store_alone() {
        let mut store = MemoryStore::new();
        store.set_item(STORAGE_KEY, "50");
        let mut game = game_with(store);
        game.start();
        drop_on_ship(&mut game, ObjectKind::Moon, 1);
        game.frame(0.0, &TickInput::default());
        drop_on_ship(&mut game, ObjectKind::Hazard, 0);
        game.frame(0.0, &TickInput::default());

        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.store().get_item(STORAGE_KEY).as_deref(), Some("50"));
    }

    #[test]
    fn test_muted_and_still() {
        let mut game = game();
        assert!(!game.toggle_sound());
        assert!(!game.toggle_haptics());
        game.audio.0.clear();

        game.start();
        drop_on_ship(&mut game, ObjectKind::Moon, 1);
        game.frame(0.0, &TickInput::default());
        drop_on_ship(&mut game, ObjectKind::Hazard, 0);
        game.frame(0.0, &TickInput::default());

        // Only the music stop on crash gets through
        assert_eq!(game.audio().0, vec!["music_stop"]);
        assert!(game.haptics().0.is_empty());

        let saved = Settings::load(game.store());
        assert!(!saved.sound_enabled);
        assert!(!saved.haptics_enabled);
    }

    #[test]
    fn test_toggle_sound_while_playing() {
        let mut game = game();
        game.start();
        game.audio.0.clear();
        game.toggle_sound();
        game.toggle_sound();
        assert_eq!(game.audio().0, vec!["music_stop", "music_start"]);
    }

    #[test]
    fn test_interstitial_every_third_game_over() {
        let mut game = game();
        let mut t = 0.0;
        for _ in 0..3 {
            game.start();
            drop_on_ship(&mut game, ObjectKind::Hazard, 0);
            game.frame(t, &TickInput::default());
            assert_eq!(game.phase(), GamePhase::GameOver);
            t += 100.0;
        }
        assert_eq!(game.ads().0, 0);

        // Armed at t = 200, due 800 ms later
        game.frame(999.0, &TickInput::default());
        assert_eq!(game.ads().0, 0);
        game.frame(1000.0, &TickInput::default());
        assert_eq!(game.ads().0, 1);
        game.frame(5000.0, &TickInput::default());
        assert_eq!(game.ads().0, 1);
    }

    #[test]
    fn test_hidden_tab_pauses_and_resets_baseline() {
        let mut game = game();
        game.start();
        game.frame(0.0, &TickInput::default());
        game.frame(16.67, &TickInput::default());
        let elapsed = game.ctx.elapsed;

        game.visibility_changed(true);
        assert_eq!(game.phase(), GamePhase::Paused);
        assert_eq!(game.audio().0.last(), Some(&"music_stop"));

        game.visibility_changed(false);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.audio().0.last(), Some(&"music_start"));

        // Ten seconds later: the first frame back is a zero step
        game.frame(10_000.0, &TickInput::default());
        assert_eq!(game.ctx.elapsed, elapsed);
        game.frame(10_016.67, &TickInput::default());
        assert!(game.ctx.elapsed > elapsed);
    }

    #[test]
    fn test_home_clears_and_stops_music() {
        let mut game = game();
        assert!(!game.home());
        game.start();
        drop_on_ship(&mut game, ObjectKind::Hazard, 0);
        game.frame(0.0, &TickInput::default());
        assert!(game.home());
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.ctx.pool.objects.active_count(), 0);
        assert_eq!(game.ctx.pool.particles.active_count(), 0);
        assert_eq!(game.audio().0.last(), Some(&"music_stop"));
    }

    #[test]
    fn test_resize_reanchors_ship() {
        let mut game = game();
        game.resize(200.0, 500.0);
        assert_eq!(game.context().player.pos.y, 400.0);
        assert!(game.context().player.pos.x <= 170.0);
    }
}
