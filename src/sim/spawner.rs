//! Falling object spawner
//!
//! Spawning is driven by simulated time, never by frame count, so the spawn
//! rate is the same at 30 Hz and 144 Hz.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::difficulty::DifficultyState;
use super::pool::{Pool, SlotId};
use super::state::{FallingObject, ObjectKind, Viewport};
use crate::tuning::{SpawnPolicy, Tuning};

/// Decides how many spawns a tick owes
#[derive(Debug, Clone, Default)]
pub struct SpawnClock {
    /// Simulated frames since the last interval spawn
    accumulator: f32,
}

impl SpawnClock {
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Number of spawns due after advancing by `dt` nominal frames
    pub fn advance<R: Rng>(
        &mut self,
        policy: SpawnPolicy,
        dt: f32,
        difficulty: &DifficultyState,
        rng: &mut R,
    ) -> u32 {
        let interval = difficulty.spawn_interval;
        if !(interval > 0.0) || dt <= 0.0 {
            return 0;
        }

        match policy {
            SpawnPolicy::Probabilistic => {
                let chance = dt / interval;
                u32::from(rng.random::<f32>() < chance)
            }
            SpawnPolicy::Interval => {
                self.accumulator += dt;
                let mut due = 0;
                while self.accumulator >= interval {
                    self.accumulator -= interval;
                    due += 1;
                }
                due
            }
        }
    }
}

/// Uniform sample over `[lo, hi)`, or `lo` when the range is empty
fn sample_range<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Initialise one object slot as either a hazard or a random safe kind
pub fn spawn<R: Rng>(
    objects: &mut Pool<FallingObject>,
    difficulty: &DifficultyState,
    viewport: Viewport,
    tuning: &Tuning,
    rng: &mut R,
) -> SlotId {
    let spawn = &tuning.spawn;

    let hazard_chance = f64::from(difficulty.hazard_probability).clamp(0.0, 1.0);
    let is_hazard = rng.random_bool(hazard_chance) || tuning.safe_kinds.is_empty();
    let profile = if is_hazard {
        &tuning.hazard
    } else {
        let idx = rng.random_range(0..tuning.safe_kinds.len());
        &tuning.safe_kinds[idx]
    };

    let x = if viewport.width > spawn.edge_margin * 2.0 {
        rng.random_range(spawn.edge_margin..=viewport.width - spawn.edge_margin)
    } else {
        viewport.width / 2.0
    };
    let jitter = sample_range(rng, spawn.speed_jitter_min, spawn.speed_jitter_max);
    let angle = rng.random_range(0.0..TAU);
    let mut rotation_speed = sample_range(
        rng,
        -spawn.rotation_speed_range,
        spawn.rotation_speed_range,
    );
    if profile.kind == ObjectKind::Star {
        rotation_speed *= spawn.star_rotation_multiplier;
    }

    objects.acquire(FallingObject {
        pos: Vec2::new(x, spawn.spawn_y),
        fall_speed: difficulty.fall_speed * jitter,
        kind: if is_hazard { ObjectKind::Hazard } else { profile.kind },
        radius: profile.radius,
        score: if is_hazard { 0 } else { profile.score },
        color: profile.color,
        angle,
        rotation_speed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::DifficultyTuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn difficulty_with_hazard(p: f32) -> DifficultyState {
        DifficultyState {
            hazard_probability: p,
            ..DifficultyState::initial(&DifficultyTuning::default())
        }
    }

    #[test]
    fn test_spawn_places_object_in_bounds() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut objects = Pool::with_capacity(50);
        let difficulty = DifficultyState::initial(&tuning.difficulty);
        let viewport = Viewport::new(400.0, 800.0);

        for _ in 0..200 {
            let id = spawn(&mut objects, &difficulty, viewport, &tuning, &mut rng);
            let obj = objects.get(id).expect("spawned slot is active");
            assert!(obj.pos.x >= 20.0 && obj.pos.x <= 380.0);
            assert_eq!(obj.pos.y, -50.0);
            assert!(obj.fall_speed >= 4.0 * 0.8 && obj.fall_speed <= 4.0 * 1.2);
            assert!(obj.angle >= 0.0 && obj.angle < TAU);
            assert!(obj.rotation_speed.abs() <= 0.1);
        }
        assert_eq!(objects.active_count(), 200);
    }

    #[test]
    fn test_certain_hazard() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut objects = Pool::with_capacity(4);
        let id = spawn(
            &mut objects,
            &difficulty_with_hazard(1.0),
            Viewport::new(400.0, 800.0),
            &tuning,
            &mut rng,
        );
        let obj = objects.get(id).expect("active");
        assert_eq!(obj.kind, ObjectKind::Hazard);
        assert_eq!(obj.score, 0);
        assert_eq!(obj.radius, 25.0);
    }

    #[test]
    fn test_never_hazard_draws_safe_table() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut objects = Pool::with_capacity(4);
        for _ in 0..100 {
            let id = spawn(
                &mut objects,
                &difficulty_with_hazard(0.0),
                Viewport::new(400.0, 800.0),
                &tuning,
                &mut rng,
            );
            let obj = objects.get(id).expect("active").clone();
            let profile = tuning.profile(obj.kind).expect("known kind");
            assert!(!obj.kind.is_hazard());
            assert_eq!(obj.score, profile.score);
            assert_eq!(obj.radius, profile.radius);
            objects.release(id);
        }
    }

    #[test]
    fn test_interval_clock_counts_simulated_time() {
        let difficulty = DifficultyState {
            spawn_interval: 10.0,
            ..difficulty_with_hazard(0.1)
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut clock = SpawnClock::default();

        // 4 ticks of 2.5 frames == one interval
        let due: u32 = (0..4)
            .map(|_| clock.advance(SpawnPolicy::Interval, 2.5, &difficulty, &mut rng))
            .sum();
        assert_eq!(due, 1);

        // Same simulated time in 40 small ticks
        let mut clock = SpawnClock::default();
        let due: u32 = (0..40)
            .map(|_| clock.advance(SpawnPolicy::Interval, 0.25, &difficulty, &mut rng))
            .sum();
        assert_eq!(due, 1);
    }

    #[test]
    fn test_zero_dt_never_spawns() {
        let difficulty = difficulty_with_hazard(0.1);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut clock = SpawnClock::default();
        for _ in 0..1000 {
            assert_eq!(clock.advance(SpawnPolicy::Probabilistic, 0.0, &difficulty, &mut rng), 0);
        }
    }

    #[test]
    fn test_tiny_viewport_spawns_at_center() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut objects = Pool::with_capacity(1);
        let id = spawn(
            &mut objects,
            &difficulty_with_hazard(0.1),
            Viewport::new(30.0, 100.0),
            &tuning,
            &mut rng,
        );
        assert_eq!(objects.get(id).map(|o| o.pos.x), Some(15.0));
    }
}
