//! Entity spawning and the difficulty curve
//!
//! The interval follows a score staircase and never grows back, even when
//! score is spent on abilities. Speed only ever ramps up.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::KinematicBody;
use super::state::EntityKind;
use crate::tuning::{GameMode, SpawnClock, SpeedRamp, Tuning};

/// An entity the spawner wants inserted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub kind: EntityKind,
    pub body: KinematicBody,
}

/// Spawn timing and difficulty state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// Clock value of the last spawn; `None` until the first wall-clock check
    pub last_spawn_ms: Option<u64>,
    /// Milliseconds or frames depending on [`SpawnClock`]
    pub current_interval: f32,
    /// World scroll speed (runner) or fall speed of new enemies (shooter)
    pub current_speed: f32,
    pub spawned: u64,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            last_spawn_ms: None,
            current_interval: tuning.initial_obstacle_interval,
            current_speed: tuning.initial_game_speed,
            spawned: 0,
        }
    }

    /// Staircase interval for a score:
    /// `max(min, initial - floor(score / step) * decrease)`
    pub fn target_interval(score: u64, tuning: &Tuning) -> f32 {
        let steps = (score / tuning.score_step_for_speedup) as f32;
        (tuning.initial_obstacle_interval - steps * tuning.interval_decrease_per_step)
            .max(tuning.min_obstacle_interval)
    }

    /// One speed increment, capped at `max_game_speed`
    pub fn ramp_speed(&mut self, tuning: &Tuning) {
        self.current_speed = (self.current_speed + tuning.speed_increase_rate).min(tuning.max_game_speed);
    }

    fn is_due(&mut self, now_ms: u64, frame: u64, clock: SpawnClock) -> bool {
        match clock {
            SpawnClock::WallClock => match self.last_spawn_ms {
                None => {
                    self.last_spawn_ms = Some(now_ms);
                    false
                }
                Some(last) => now_ms.saturating_sub(last) as f32 > self.current_interval,
            },
            SpawnClock::FrameCount => {
                let period = (self.current_interval.round() as u64).max(1);
                frame % period == 0
            }
        }
    }

    /// Check the schedule and build at most one new entity.
    ///
    /// On a spawn, the speed ramp (when `SpeedRamp::EverySpawn`) and the
    /// per-spawn interval shrink are applied in the same call.
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        now_ms: u64,
        frame: u64,
        score: u64,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<Spawn> {
        self.current_interval = self
            .current_interval
            .min(Self::target_interval(score, tuning));

        if !self.is_due(now_ms, frame, tuning.spawn_clock) {
            return None;
        }

        self.last_spawn_ms = Some(now_ms);
        self.spawned += 1;
        if tuning.speed_ramp == SpeedRamp::EverySpawn {
            self.ramp_speed(tuning);
        }
        self.current_interval = (self.current_interval - tuning.interval_decrease_per_spawn)
            .max(tuning.min_obstacle_interval);

        Some(match tuning.mode {
            GameMode::Runner => self.obstacle(tuning, rng),
            GameMode::Shooter => self.enemy(tuning, rng),
        })
    }

    /// Ground-anchored block just past the right edge
    fn obstacle<R: Rng>(&self, tuning: &Tuning, rng: &mut R) -> Spawn {
        let (w_min, w_max) = tuning.obstacle_width_range;
        let (h_min, h_max) = tuning.obstacle_height_range;
        let size = Vec2::new(rng.random_range(w_min..=w_max), rng.random_range(h_min..=h_max));

        let mut body = KinematicBody::resting_on(tuning.viewport_width, tuning.ground_level, size);
        body.vel.x = -self.current_speed;
        Spawn {
            kind: EntityKind::Obstacle,
            body,
        }
    }

    /// Square enemy just above the top edge at a random column
    fn enemy<R: Rng>(&self, tuning: &Tuning, rng: &mut R) -> Spawn {
        let size = tuning.enemy_size;
        let x = rng.random_range(0.0..=tuning.viewport_width - size);

        let jitter = rng.random_range(0.0..=tuning.enemy_speed_jitter);

        let mut body = KinematicBody::new(Vec2::new(x, -size), Vec2::splat(size));
        body.vel.y = self.current_speed + jitter;
        Spawn {
            kind: EntityKind::Enemy,
            body,
        }
    }
}
