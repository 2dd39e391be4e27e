//! Canvas 2D renderer

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::{Renderer, idle_stars, palette, particle_size};
use crate::sim::{FallingObject, ObjectKind, Particle, Player, Viewport};

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn disc(&self, x: f64, y: f64, r: f64) {
        self.ctx.begin_path();
        self.ctx.arc(x, y, r.max(0.0), 0.0, TAU).ok();
        self.ctx.fill();
    }

    /// Cratered grey rock
    fn draw_hazard(&self, r: f64) {
        self.disc(0.0, 0.0, r);
        self.ctx.set_fill_style_str(&palette::HAZARD_DETAIL.to_css());
        self.disc(-r * 0.3, -r * 0.3, r * 0.4);
        self.disc(r * 0.4, r * 0.2, r * 0.2);
    }

    /// Soft halo then the body
    fn draw_safe(&self, obj: &FallingObject, r: f64) {
        self.ctx.set_global_alpha(0.25);
        self.disc(0.0, 0.0, r + 8.0);
        self.ctx.set_global_alpha(1.0);

        match obj.kind {
            ObjectKind::Star => {
                self.ctx.set_fill_style_str("#fffbe6");
                self.disc(0.0, 0.0, r * 0.6);
                self.ctx.set_fill_style_str(&obj.color.to_css());
                self.ctx.begin_path();
                for k in 0..4 {
                    let a = k as f64 * TAU / 4.0;
                    self.ctx.move_to(0.0, 0.0);
                    self.ctx.line_to(a.cos() * r * 1.8, a.sin() * r * 1.8);
                    self.ctx.line_to((a + 0.3).cos() * r * 0.5, (a + 0.3).sin() * r * 0.5);
                }
                self.ctx.fill();
            }
            ObjectKind::Galaxy => {
                self.ctx.set_fill_style_str("#ffffff");
                self.disc(0.0, 0.0, 4.0);
                self.ctx.set_stroke_style_str(&obj.color.to_css());
                self.ctx.set_line_width(2.0);
                for k in 0..2 {
                    self.ctx.begin_path();
                    self.ctx
                        .ellipse(0.0, 0.0, r, r * 0.4, k as f64 * std::f64::consts::PI, 0.0, TAU * 0.625)
                        .ok();
                    self.ctx.stroke();
                }
            }
            ObjectKind::Planet => {
                self.disc(0.0, 0.0, r);
                self.ctx.set_stroke_style_str("rgba(255,255,255,0.6)");
                self.ctx.set_line_width(3.0);
                self.ctx.begin_path();
                self.ctx.ellipse(0.0, 0.0, r * 1.6, r * 0.5, -0.3, 0.0, TAU).ok();
                self.ctx.stroke();
            }
            ObjectKind::Earth => {
                self.disc(0.0, 0.0, r);
                self.ctx.set_fill_style_str("#43a047");
                self.disc(-r * 0.28, -r * 0.28, r * 0.44);
            }
            ObjectKind::Moon | ObjectKind::Hazard => {
                self.disc(0.0, 0.0, r);
                self.ctx.set_fill_style_str("rgba(0,0,0,0.15)");
                self.disc(-r * 0.3, -r * 0.3, r * 0.3);
            }
        }
    }
}

impl Renderer for CanvasRenderer {
    fn draw_background(&mut self, viewport: Viewport) {
        self.ctx.set_fill_style_str(&palette::BACKGROUND.to_css());
        self.ctx
            .fill_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);
    }

    fn draw_player(&mut self, player: &Player) {
        let ctx = &self.ctx;
        let (w, h) = (player.width as f64, player.height as f64);
        let flicker = player.thruster_phase.sin() as f64 * 5.0;

        ctx.save();
        ctx.translate(player.pos.x as f64, player.pos.y as f64).ok();

        // Engine flame
        ctx.set_fill_style_str(&palette::ENGINE.to_css());
        ctx.begin_path();
        ctx.move_to(-10.0, h);
        ctx.line_to(10.0, h);
        ctx.line_to(0.0, h + 20.0 + flicker);
        ctx.fill();

        // Wings
        ctx.set_fill_style_str(&palette::PLAYER_BODY.to_css());
        ctx.begin_path();
        ctx.move_to(0.0, 0.0);
        ctx.line_to(w / 2.0, h);
        ctx.line_to(0.0, h - 10.0);
        ctx.line_to(-w / 2.0, h);
        ctx.close_path();
        ctx.fill();

        // Cockpit
        ctx.set_fill_style_str(&palette::PLAYER_ACCENT.to_css());
        ctx.begin_path();
        ctx.move_to(0.0, 10.0);
        ctx.line_to(10.0, 40.0);
        ctx.line_to(-10.0, 40.0);
        ctx.close_path();
        ctx.fill();

        ctx.set_stroke_style_str(&palette::PLAYER_OUTLINE.to_css());
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(-w / 4.0, 30.0);
        ctx.line_to(-w / 2.0, h);
        ctx.move_to(w / 4.0, 30.0);
        ctx.line_to(w / 2.0, h);
        ctx.stroke();

        ctx.restore();
    }

    fn draw_entity(&mut self, entity: &FallingObject) {
        let r = entity.radius as f64;

        self.ctx.save();
        self.ctx
            .translate(entity.pos.x as f64, entity.pos.y as f64)
            .ok();
        self.ctx.rotate(entity.angle as f64).ok();
        self.ctx.set_fill_style_str(&entity.color.to_css());

        if entity.kind.is_hazard() {
            self.draw_hazard(r);
        } else {
            self.draw_safe(entity, r);
        }

        self.ctx.restore();
    }

    fn draw_particle(&mut self, particle: &Particle) {
        let size = particle_size(particle) as f64;
        self.ctx.set_global_alpha(particle.life.clamp(0.0, 1.0) as f64);
        self.ctx.set_fill_style_str(&particle.color.to_css());
        self.ctx.fill_rect(
            particle.pos.x as f64 - size / 2.0,
            particle.pos.y as f64 - size / 2.0,
            size,
            size,
        );
        self.ctx.set_global_alpha(1.0);
    }

    fn draw_idle_decoration(&mut self, elapsed: f32, viewport: Viewport) {
        self.ctx.set_fill_style_str(&palette::STAR_FIELD.to_css());
        self.ctx.set_global_alpha(0.3);
        for star in idle_stars(elapsed, viewport) {
            self.ctx.fill_rect(star.x as f64, star.y as f64, 2.0, 2.0);
        }
        self.ctx.set_global_alpha(1.0);
    }
}
