//! Rendering
//!
//! The simulation never draws. A `Renderer` consumes read-only state once per
//! frame; `render_frame` fixes the draw order. On the web, `CanvasRenderer`
//! paints with the 2D canvas API.

use glam::Vec2;

use crate::sim::{FallingObject, GamePhase, Particle, Player, SimulationContext, Viewport};

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

/// Fixed colours that are not part of the object table
pub mod palette {
    use crate::sim::Color;

    pub const BACKGROUND: Color = Color(0x050b14);
    pub const PLAYER_OUTLINE: Color = Color(0x00f3ff);
    pub const PLAYER_BODY: Color = Color(0x1a2a40);
    pub const PLAYER_ACCENT: Color = Color(0x00ccff);
    pub const ENGINE: Color = Color(0xff9900);
    pub const HAZARD_DETAIL: Color = Color(0x3b3b3b);
    pub const STAR_FIELD: Color = Color(0xffffff);
}

/// Draw target for one frame
pub trait Renderer {
    fn draw_background(&mut self, viewport: Viewport);
    fn draw_player(&mut self, player: &Player);
    fn draw_entity(&mut self, entity: &FallingObject);
    fn draw_particle(&mut self, particle: &Particle);
    /// Attract-mode star drift, driven by the never-reset presentation clock
    fn draw_idle_decoration(&mut self, elapsed: f32, viewport: Viewport);
}

/// Draw one frame: background, ship, objects, particles, then idle decoration
pub fn render_frame(ctx: &SimulationContext, renderer: &mut impl Renderer) {
    renderer.draw_background(ctx.viewport);
    renderer.draw_player(&ctx.player);
    for (_, obj) in ctx.pool.objects.iter_active() {
        renderer.draw_entity(obj);
    }
    for (_, p) in ctx.pool.particles.iter_active() {
        renderer.draw_particle(p);
    }
    if ctx.phase == GamePhase::Idle {
        renderer.draw_idle_decoration(ctx.presentation_time, ctx.viewport);
    }
}

/// Number of drifting attract-mode stars
pub const IDLE_STAR_COUNT: usize = 30;

/// Star positions for the attract screen at presentation time `t`
///
/// Each star falls at one of five speeds and wraps at the bottom edge.
pub fn idle_stars(t: f32, viewport: Viewport) -> impl Iterator<Item = Vec2> {
    let (w, h) = (viewport.width.max(1.0), viewport.height.max(1.0));
    (0..IDLE_STAR_COUNT).map(move |i| {
        let speed = (i % 5 + 1) as f32;
        let y = (t * speed + i as f32 * 50.0).rem_euclid(h);
        let x = (i as f32 * 87.0).rem_euclid(w);
        Vec2::new(x, y)
    })
}

/// Side length of a particle square, shrinking with life
pub fn particle_size(p: &Particle) -> f32 {
    p.life.clamp(0.0, 1.0) * 6.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Color, ObjectKind};
    use crate::tuning::Tuning;

    #[derive(Default)]
    struct Trace {
        calls: Vec<&'static str>,
        idle_t: Option<f32>,
    }

    impl Renderer for Trace {
        fn draw_background(&mut self, _viewport: Viewport) {
            self.calls.push("background");
        }
        fn draw_player(&mut self, _player: &Player) {
            self.calls.push("player");
        }
        fn draw_entity(&mut self, _entity: &FallingObject) {
            self.calls.push("entity");
        }
        fn draw_particle(&mut self, _particle: &Particle) {
            self.calls.push("particle");
        }
        fn draw_idle_decoration(&mut self, elapsed: f32, _viewport: Viewport) {
            self.calls.push("idle");
            self.idle_t = Some(elapsed);
        }
    }

    fn ctx() -> SimulationContext {
        SimulationContext::new(Tuning::default(), Viewport::new(400.0, 800.0), 3)
    }

    #[test]
    fn test_idle_frame_draws_decoration() {
        let mut ctx = ctx();
        ctx.presentation_time = 12.5;
        let mut trace = Trace::default();
        render_frame(&ctx, &mut trace);
        assert_eq!(trace.calls, vec!["background", "player", "idle"]);
        assert_eq!(trace.idle_t, Some(12.5));
    }

    #[test]
    fn test_playing_frame_draws_active_only() {
        let mut ctx = ctx();
        ctx.start();
        let a = ctx.pool.objects.acquire(FallingObject {
            kind: ObjectKind::Moon,
            ..Default::default()
        });
        ctx.pool.objects.acquire(FallingObject::default());
        ctx.pool.objects.release(a);
        ctx.pool.particles.acquire(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            color: Color(0),
            life: 0.5,
        });

        let mut trace = Trace::default();
        render_frame(&ctx, &mut trace);
        assert_eq!(trace.calls, vec!["background", "player", "entity", "particle"]);
    }

    #[test]
    fn test_idle_stars_stay_on_screen() {
        let viewport = Viewport::new(300.0, 500.0);
        for t in [0.0, 1.0, 999.0, 123_456.0] {
            let stars: Vec<Vec2> = idle_stars(t, viewport).collect();
            assert_eq!(stars.len(), IDLE_STAR_COUNT);
            assert!(stars.iter().all(|s| (0.0..300.0).contains(&s.x) && (0.0..500.0).contains(&s.y)));
        }
    }

    #[test]
    fn test_idle_stars_drift_with_time() {
        let viewport = Viewport::new(300.0, 5000.0);
        let before: Vec<Vec2> = idle_stars(0.0, viewport).collect();
        let after: Vec<Vec2> = idle_stars(10.0, viewport).collect();
        // Star 0 moves 1 px per unit, star 4 moves 5
        assert_eq!(after[0].y - before[0].y, 10.0);
        assert_eq!(after[4].y - before[4].y, 50.0);
        assert_eq!(after[0].x, before[0].x);
    }
}
