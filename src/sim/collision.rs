//! Player/object collision and scoring
//!
//! Overlap is box-vs-box: the ship's bounding box against a box of half-extent
//! `radius` around the object's centre. This is a deliberate approximation of
//! circle-vs-box and is kept as-is.

use glam::Vec2;
use rand::Rng;

use super::pool::{Pool, SlotAction};
use super::state::{Color, FallingObject, GameEvent, Particle, Player, SimulationContext};
use crate::tuning::ParticleTuning;

/// Axis-aligned overlap between the ship and an object
///
/// The ship's box is centred on its vertical midline, `height / 2` below the
/// anchor point.
pub fn overlaps(player: &Player, obj: &FallingObject) -> bool {
    let dx = (obj.pos.x - player.pos.x).abs();
    let dy = (obj.pos.y - (player.pos.y + player.height / 2.0)).abs();
    dx < player.width / 2.0 + obj.radius && dy < player.height / 2.0 + obj.radius
}

/// Emit a fixed-size burst of particles at `pos`
pub fn spawn_burst<R: Rng>(
    particles: &mut Pool<Particle>,
    pos: Vec2,
    color: Color,
    tuning: &ParticleTuning,
    rng: &mut R,
) {
    let s = tuning.max_speed;
    for _ in 0..tuning.burst_count {
        let vel = if s > 0.0 {
            Vec2::new(rng.random_range(-s..s), rng.random_range(-s..s))
        } else {
            Vec2::ZERO
        };
        particles.acquire(Particle {
            pos,
            vel,
            color,
            life: 1.0,
        });
    }
}

/// Sweep every active object against the ship.
///
/// A hit object is released as soon as the sweep moves past it, so it can never
/// be tested again. A hazard hit halts the sweep and ends the run.
pub fn resolve_collisions(ctx: &mut SimulationContext) {
    let SimulationContext {
        tuning,
        score,
        difficulty,
        pool,
        player,
        rng,
        events,
        ..
    } = ctx;

    let objects = &mut pool.objects;
    let particles = &mut pool.particles;
    let mut crashed = false;

    objects.for_each_active(|_, obj| {
        if !overlaps(player, obj) {
            return SlotAction::Keep;
        }

        let (pos, color) = (obj.pos, obj.color);

        if obj.kind.is_hazard() {
            crashed = true;
            spawn_burst(particles, pos, color, &tuning.particles, rng);
            return SlotAction::ReleaseAndHalt;
        }

        *score += obj.score;
        events.push(GameEvent::Collected {
            kind: obj.kind,
            score: *score,
        });

        let next = difficulty.on_score(*score, &tuning.difficulty);
        if next != *difficulty {
            log::debug!("Difficulty escalated at score {}: {:?}", score, next);
            *difficulty = next;
            events.push(GameEvent::Escalated(next));
        }

        spawn_burst(particles, pos, color, &tuning.particles, rng);
        SlotAction::Release
    });

    if crashed {
        ctx.end_run();
    }
}
