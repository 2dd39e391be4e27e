//! Demo-mode steering
//!
//! Picks a pointer target each frame: chase the safe object that arrives
//! soonest unless that lane is blocked by an incoming hazard, in which case
//! take the nearest clear spot. With nothing on screen, sway around the
//! centre so the demo never looks frozen.

use crate::sim::{FallingObject, SimulationContext, TickInput};

/// Hazards further away than this (in nominal frames) are ignored
const LOOKAHEAD_FRAMES: f32 = 45.0;
/// Extra horizontal gap kept from a hazard's collision box
const CLEARANCE: f32 = 12.0;

/// Steering input for the current state
pub fn steer(ctx: &SimulationContext) -> TickInput {
    let player = &ctx.player;
    let ship_mid = player.pos.y + player.height / 2.0;
    let ship_bottom = player.pos.y + player.height;
    let (lo, hi) = player.x_bounds(ctx.viewport);

    let frames_until = |obj: &FallingObject| (ship_mid - obj.pos.y) / obj.fall_speed.max(0.1);
    let not_passed = |obj: &FallingObject| obj.pos.y - obj.radius < ship_bottom;

    // Horizontal lanes the ship must not occupy
    let blocked: Vec<(f32, f32)> = ctx
        .pool
        .objects
        .iter_active()
        .map(|(_, obj)| obj)
        .filter(|&obj| obj.kind.is_hazard() && not_passed(obj))
        .filter(|&obj| frames_until(obj) < LOOKAHEAD_FRAMES)
        .map(|obj| {
            let half = player.width / 2.0 + obj.radius + CLEARANCE;
            (obj.pos.x - half, obj.pos.x + half)
        })
        .collect();
    let is_blocked = |x: f32| blocked.iter().any(|&(a, b)| x > a && x < b);

    // Soonest reachable pickup
    let goal = ctx
        .pool
        .objects
        .iter_active()
        .map(|(_, obj)| obj)
        .filter(|&obj| !obj.kind.is_hazard() && not_passed(obj))
        .filter(|obj| !is_blocked(obj.pos.x.clamp(lo, hi)))
        .min_by(|&a, &b| {
            frames_until(a)
                .partial_cmp(&frames_until(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|obj| obj.pos.x)
        .unwrap_or_else(|| {
            // Oscillating offset for variety
            let t = ctx.presentation_time * 0.01;
            let sway = t.sin() * 0.3 + (t * 0.7).sin() * 0.15;
            ctx.viewport.width / 2.0 + sway * ctx.viewport.width * 0.5
        })
        .clamp(lo, hi);

    let target = if is_blocked(goal) {
        // Nearest lane edge that is on screen and clear
        blocked
            .iter()
            .flat_map(|&(a, b)| [a, b])
            .filter(|x| (lo..=hi).contains(x) && !is_blocked(*x))
            .min_by(|a, b| {
                (a - goal)
                    .abs()
                    .partial_cmp(&(b - goal).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(player.pos.x)
    } else {
        goal
    };

    TickInput {
        pointer_x: Some(target),
        left: false,
        right: false,
    }
}
