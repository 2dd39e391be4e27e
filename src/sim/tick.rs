//! Frame-rate independent simulation step
//!
//! `dt` is measured in nominal frames (`1.0` == one 60 Hz frame). Every rate in
//! the tuning is per nominal frame and is scaled by `dt` here.

use super::collision::resolve_collisions;
use super::pool::SlotAction;
use super::spawner;
use super::state::{GamePhase, SimulationContext};

/// Player input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer/touch x, if it moved since the last tick
    pub pointer_x: Option<f32>,
    /// Left key held
    pub left: bool,
    /// Right key held
    pub right: bool,
}

/// Clamp a raw frame delta into `[0, max_dt]`; NaN and negatives become 0
pub fn sanitize_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_nan() || dt < 0.0 {
        0.0
    } else {
        dt.min(max_dt)
    }
}

/// Fraction of the remaining distance to cover this tick so that the smoothing
/// speed is the same at any frame rate
pub fn smoothing_factor(base_lerp: f32, dt: f32) -> f32 {
    1.0 - (1.0 - base_lerp).powf(dt)
}

/// Advance the simulation by `dt` nominal frames.
///
/// Outside `Playing` only the presentation clock moves. The step order is
/// fixed: clocks, spawn, input, ship, objects (including off-screen release),
/// collisions, particles.
pub fn tick(ctx: &mut SimulationContext, input: &TickInput, dt: f32) {
    let dt = sanitize_dt(dt, ctx.tuning.timing.max_dt);

    ctx.presentation_time += dt;

    // Pointer tracking is live in every phase, clamped when folded in below
    if let Some(x) = input.pointer_x.filter(|x| x.is_finite()) {
        ctx.input_target_x = x;
    }

    if ctx.phase != GamePhase::Playing {
        return;
    }

    // 1. Clocks
    ctx.elapsed += dt;
    ctx.player.thruster_phase =
        (ctx.player.thruster_phase + ctx.tuning.player.thruster_rate * dt) % std::f32::consts::TAU;

    // 2. Spawn
    let due = ctx.spawn_clock.advance(
        ctx.tuning.spawn.policy,
        dt,
        &ctx.difficulty,
        &mut ctx.rng,
    );
    for _ in 0..due {
        spawner::spawn(
            &mut ctx.pool.objects,
            &ctx.difficulty,
            ctx.viewport,
            &ctx.tuning,
            &mut ctx.rng,
        );
    }

    // 3. Input target
    let key_speed = ctx.tuning.player.keyboard_speed;
    if input.left {
        ctx.input_target_x -= key_speed * dt;
    }
    if input.right {
        ctx.input_target_x += key_speed * dt;
    }
    let (lo, hi) = ctx.player.x_bounds(ctx.viewport);
    ctx.input_target_x = ctx.input_target_x.clamp(lo, hi);

    // 4. Ship
    let lerp = smoothing_factor(ctx.tuning.player.base_lerp, dt);
    ctx.player.pos.x += (ctx.input_target_x - ctx.player.pos.x) * lerp;
    ctx.player.pos.x = ctx.player.pos.x.clamp(lo, hi);

    // 5. Objects
    let bottom = ctx.viewport.height;
    ctx.pool.objects.for_each_active(|_, obj| {
        obj.pos.y += obj.fall_speed * dt;
        obj.angle += obj.rotation_speed * dt;
        if obj.pos.y - obj.radius > bottom {
            SlotAction::Release
        } else {
            SlotAction::Keep
        }
    });

    // 6. Collisions
    resolve_collisions(ctx);
    if ctx.phase != GamePhase::Playing {
        // The run ended this tick; freeze everything as it stands
        return;
    }

    // 7. Particles
    let decay = ctx.tuning.particles.decay_rate;
    ctx.pool.particles.for_each_active(|_, p| {
        p.pos += p.vel * dt;
        p.life -= decay * dt;
        if p.life <= 0.0 {
            SlotAction::Release
        } else {
            SlotAction::Keep
        }
    });
}
