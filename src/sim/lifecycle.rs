//! Game state machine
//!
//! ```text
//! Idle ──start──▶ Playing ──hazard──▶ GameOver ──start──▶ Playing
//!                  │   ▲                 │
//!           suspend│   │resume           └──home──▶ Idle
//!                  ▼   │
//!                  Paused
//! ```
//!
//! These methods are the only writers of `SimulationContext::phase`. Each
//! returns whether the transition happened; invalid commands are ignored.

use super::difficulty::DifficultyState;
use super::state::{GameEvent, GamePhase, SimulationContext};

impl SimulationContext {
    /// Begin a fresh run from Idle or GameOver; a no-op while Playing or Paused
    pub fn start(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Idle | GamePhase::GameOver) {
            log::debug!("Ignoring start while {:?}", self.phase);
            return false;
        }

        self.score = 0;
        self.elapsed = 0.0;
        self.pool.release_all();
        self.difficulty = DifficultyState::initial(&self.tuning.difficulty);
        self.spawn_clock.reset();
        self.center_player();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Started);
        log::info!("Run started");
        true
    }

    /// Hazard collision: freeze the run and record the best score
    pub(crate) fn end_run(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }

        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::Crashed { score: self.score });
        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::NewHighScore(self.score));
            log::info!("New high score: {}", self.score);
        }
        log::info!("Run ended with score {}", self.score);
        true
    }

    /// Leave the game-over screen for attract mode
    pub fn home(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            log::debug!("Ignoring home while {:?}", self.phase);
            return false;
        }

        self.pool.release_all();
        self.phase = GamePhase::Idle;
        self.events.push(GameEvent::ReturnedHome);
        true
    }

    /// External suspend (page hidden)
    pub fn suspend(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }

        self.phase = GamePhase::Paused;
        self.events.push(GameEvent::Suspended);
        log::info!("Suspended");
        true
    }

    /// External resume (page visible again)
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }

        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Resumed);
        log::info!("Resumed");
        true
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::sim::state::{Color, FallingObject, ObjectKind, Particle, Viewport};
    use crate::sim::{GameEvent, GamePhase, SimulationContext, TickInput, tick};
    use crate::tuning::Tuning;

    fn ctx() -> SimulationContext {
        SimulationContext::new(Tuning::default(), Viewport::new(400.0, 800.0), 9)
    }

    fn crash(ctx: &mut SimulationContext) {
        let y = ctx.player.pos.y + ctx.player.height / 2.0;
        ctx.pool.objects.acquire(FallingObject {
            pos: Vec2::new(ctx.player.pos.x, y),
            kind: ObjectKind::Hazard,
            radius: 25.0,
            ..Default::default()
        });
        tick(ctx, &TickInput::default(), 0.0);
        assert_eq!(ctx.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_start_from_idle() {
        let mut ctx = ctx();
        assert!(ctx.start());
        assert_eq!(ctx.phase, GamePhase::Playing);
        assert_eq!(ctx.drain_events(), vec![GameEvent::Started]);
    }

    #[test]
    fn test_start_while_playing_is_noop() {
        let mut ctx = ctx();
        ctx.start();
        ctx.score = 11;
        assert!(!ctx.start());
        assert_eq!(ctx.score, 11);
        assert_eq!(ctx.phase, GamePhase::Playing);
    }

    #[test]
    fn test_restart_from_game_over_resets_everything() {
        let mut ctx = ctx();
        ctx.start();
        ctx.score = 9;
        ctx.difficulty = ctx.difficulty.escalate(&ctx.tuning.difficulty);
        ctx.pool.particles.acquire(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            color: Color(0),
            life: 1.0,
        });
        ctx.input_target_x = 12.0;
        crash(&mut ctx);
        assert_eq!(ctx.high_score, 9);

        assert!(ctx.start());
        assert_eq!(ctx.phase, GamePhase::Playing);
        assert_eq!(ctx.score, 0);
        assert_eq!(ctx.elapsed, 0.0);
        assert_eq!(ctx.pool.objects.active_count(), 0);
        assert_eq!(ctx.pool.particles.active_count(), 0);
        assert_eq!(ctx.difficulty, crate::sim::DifficultyState::initial(&ctx.tuning.difficulty));
        assert_eq!(ctx.player.pos.x, 200.0);
        assert_eq!(ctx.input_target_x, 200.0);
        // Best score survives the restart
        assert_eq!(ctx.high_score, 9);
    }

    #[test]
    fn test_home_only_from_game_over() {
        let mut ctx = ctx();
        assert!(!ctx.home());
        ctx.start();
        assert!(!ctx.home());
        crash(&mut ctx);
        assert!(ctx.home());
        assert_eq!(ctx.phase, GamePhase::Idle);
        assert_eq!(ctx.pool.particles.active_count(), 0);
    }

    #[test]
    fn test_suspend_and_resume() {
        let mut ctx = ctx();
        assert!(!ctx.suspend());
        ctx.start();
        assert!(ctx.suspend());
        assert_eq!(ctx.phase, GamePhase::Paused);
        // Start is not a way out of Paused
        assert!(!ctx.start());
        assert!(ctx.resume());
        assert_eq!(ctx.phase, GamePhase::Playing);
        assert!(!ctx.resume());
    }

    #[test]
    fn test_paused_freezes_simulation() {
        let mut ctx = ctx();
        ctx.start();
        let id = ctx.pool.objects.acquire(FallingObject {
            pos: Vec2::new(10.0, 10.0),
            fall_speed: 5.0,
            kind: ObjectKind::Moon,
            radius: 10.0,
            ..Default::default()
        });
        ctx.suspend();
        tick(&mut ctx, &TickInput::default(), 1.0);
        assert_eq!(ctx.pool.objects.get(id).map(|o| o.pos.y), Some(10.0));
        assert_eq!(ctx.elapsed, 0.0);
    }

    #[test]
    fn test_game_over_cannot_suspend() {
        let mut ctx = ctx();
        ctx.start();
        crash(&mut ctx);
        assert!(!ctx.suspend());
        assert!(!ctx.resume());
        assert_eq!(ctx.phase, GamePhase::GameOver);
    }
}
