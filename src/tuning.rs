//! Data-driven game balance
//!
//! Every tunable the simulation reads lives in [`Tuning`]. Hosts may ship a
//! partial JSON document; missing keys fall back to the runner preset.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Which arcade variant the session simulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Gravity and jumping; obstacles scroll in from the right edge
    #[default]
    Runner,
    /// Lateral movement and autofire; enemies fall from the top edge
    Shooter,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Runner => "Runner",
            GameMode::Shooter => "Shooter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "runner" | "jump" => Some(GameMode::Runner),
            "shooter" | "shoot" => Some(GameMode::Shooter),
            _ => None,
        }
    }
}

/// How the spawner decides a spawn is due.
///
/// The two are not numerically equivalent: frame-modulo scheduling assumes
/// a stable frame rate, wall-clock scheduling does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnClock {
    /// Interval in milliseconds; spawn when `now - last_spawn > interval`
    WallClock,
    /// Interval in frames; spawn when `frame % interval == 0`
    FrameCount,
}

/// When the scroll/fall speed ramps up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedRamp {
    EveryFrame,
    EverySpawn,
}

/// Score accrual rule for a session. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scoring {
    /// +1 every `frames_per_point` frames survived
    #[serde(rename_all = "camelCase")]
    Elapsed { frames_per_point: u32 },
    /// +pass reward per obstacle passed, +kill reward per enemy destroyed
    Events,
}

/// What happens to an obstacle touched while invincible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvinciblePolicy {
    /// Obstacle stays where it is
    PassThrough,
    /// Obstacle is removed without damage
    Destroy,
}

/// What a jump press does while airborne
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirMove {
    /// Timed flight, sustained while the key is held
    Flight,
    /// Second full jump impulse
    DoubleJump,
}

/// Configuration validation failure
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("groundLevel {ground} must lie within (0, {height}]")]
    GroundOutsideViewport { ground: f32, height: f32 },

    #[error("{field} ({size}) does not fit in the viewport ({limit})")]
    DoesNotFit {
        field: &'static str,
        size: f32,
        limit: f32,
    },

    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot read tuning file: {0}")]
    Io(#[from] std::io::Error),
}

/// Complete set of simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tuning {
    pub mode: GameMode,

    // === Geometry ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Floor line; grounded bodies have their bottom edge here
    pub ground_level: f32,
    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Lateral speed while a move key is held (shooter)
    pub player_move_speed: f32,

    // === Jump / flight ===
    pub gravity: f32,
    pub jump_power: f32,
    pub fly_sustain_speed: f32,
    pub max_flight_frames: u32,
    pub max_jump_charges: u32,
    pub air_move: AirMove,

    // === Invincibility ===
    pub invincible_duration: u64,
    pub invincible_cost: u64,
    pub cooldown_duration: u64,
    pub invincible_policy: InvinciblePolicy,

    // === Spawning / difficulty ===
    pub spawn_clock: SpawnClock,
    pub initial_obstacle_interval: f32,
    pub min_obstacle_interval: f32,
    pub score_step_for_speedup: u64,
    pub interval_decrease_per_step: f32,
    pub interval_decrease_per_spawn: f32,
    pub initial_game_speed: f32,
    pub max_game_speed: f32,
    pub speed_increase_rate: f32,
    pub speed_ramp: SpeedRamp,
    pub obstacle_width_range: (f32, f32),
    pub obstacle_height_range: (f32, f32),
    pub enemy_size: f32,
    /// Upper bound of the random extra fall speed given to each enemy
    pub enemy_speed_jitter: f32,

    // === Projectiles ===
    pub projectile_width: f32,
    pub projectile_height: f32,
    pub projectile_speed: f32,
    pub fire_cooldown_ms: u64,

    // === Collision / scoring ===
    /// Symmetric hitbox padding; negative shrinks, positive grows
    pub collision_padding: f32,
    pub initial_hp: u32,
    pub scoring: Scoring,
    pub pass_reward: u64,
    pub kill_reward: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::runner()
    }
}

impl Tuning {
    /// Jump runner with HP, flight and the invincibility skill
    pub fn runner() -> Self {
        Self {
            mode: GameMode::Runner,

            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            ground_level: GROUND_LEVEL,
            player_x: PLAYER_X,
            player_width: PLAYER_SIZE,
            player_height: PLAYER_SIZE,
            player_move_speed: 5.0,

            gravity: GRAVITY,
            jump_power: JUMP_POWER,
            fly_sustain_speed: FLY_SUSTAIN_SPEED,
            max_flight_frames: MAX_FLIGHT_FRAMES,
            max_jump_charges: MAX_JUMP_CHARGES,
            air_move: AirMove::Flight,

            invincible_duration: INVINCIBLE_DURATION_MS,
            invincible_cost: INVINCIBLE_COST,
            cooldown_duration: COOLDOWN_DURATION_MS,
            invincible_policy: InvinciblePolicy::PassThrough,

            // Frame-based staircase: 80 frames, -2 every 30 points, floor 40
            spawn_clock: SpawnClock::FrameCount,
            initial_obstacle_interval: 80.0,
            min_obstacle_interval: 40.0,
            score_step_for_speedup: 30,
            interval_decrease_per_step: 2.0,
            interval_decrease_per_spawn: 0.0,
            initial_game_speed: 5.0,
            max_game_speed: 15.0,
            speed_increase_rate: 0.0005,
            speed_ramp: SpeedRamp::EveryFrame,
            obstacle_width_range: (20.0, 50.0),
            obstacle_height_range: (30.0, 80.0),
            enemy_size: 30.0,
            enemy_speed_jitter: 0.0,

            projectile_width: 5.0,
            projectile_height: 10.0,
            projectile_speed: 7.0,
            fire_cooldown_ms: 200,

            collision_padding: 0.0,
            initial_hp: INITIAL_HP,
            scoring: Scoring::Elapsed {
                frames_per_point: 10,
            },
            pass_reward: 1,
            kill_reward: KILL_REWARD,
        }
    }

    /// Vertical shooter: one life, wall-clock enemy waves, +10 per kill
    pub fn shooter() -> Self {
        Self {
            mode: GameMode::Shooter,
            // Player stands 20px above the canvas bottom
            ground_level: VIEWPORT_HEIGHT - 20.0,
            player_x: VIEWPORT_WIDTH / 2.0 - PLAYER_SIZE / 2.0,
            initial_hp: 1,

            spawn_clock: SpawnClock::WallClock,
            initial_obstacle_interval: 1_000.0,
            min_obstacle_interval: 400.0,
            score_step_for_speedup: 100,
            interval_decrease_per_step: 50.0,
            initial_game_speed: 2.0,
            max_game_speed: 6.0,
            speed_increase_rate: 0.01,
            speed_ramp: SpeedRamp::EverySpawn,
            enemy_speed_jitter: 0.5,

            scoring: Scoring::Events,
            ..Self::runner()
        }
    }

    /// Preset for a game mode
    pub fn from_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Runner => Self::runner(),
            GameMode::Shooter => Self::shooter(),
        }
    }

    /// Parse and validate a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a tuning JSON file (see [`Tuning::from_json`])
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject configurations that would make the simulation undefined
    pub fn validate(&self) -> Result<(), TuningError> {
        let floats = [
            ("viewportWidth", self.viewport_width),
            ("viewportHeight", self.viewport_height),
            ("groundLevel", self.ground_level),
            ("playerX", self.player_x),
            ("playerWidth", self.player_width),
            ("playerHeight", self.player_height),
            ("playerMoveSpeed", self.player_move_speed),
            ("gravity", self.gravity),
            ("jumpPower", self.jump_power),
            ("flySustainSpeed", self.fly_sustain_speed),
            ("initialObstacleInterval", self.initial_obstacle_interval),
            ("minObstacleInterval", self.min_obstacle_interval),
            ("intervalDecreasePerStep", self.interval_decrease_per_step),
            ("intervalDecreasePerSpawn", self.interval_decrease_per_spawn),
            ("initialGameSpeed", self.initial_game_speed),
            ("maxGameSpeed", self.max_game_speed),
            ("speedIncreaseRate", self.speed_increase_rate),
            ("enemySize", self.enemy_size),
            ("enemySpeedJitter", self.enemy_speed_jitter),
            ("projectileWidth", self.projectile_width),
            ("projectileHeight", self.projectile_height),
            ("projectileSpeed", self.projectile_speed),
            ("collisionPadding", self.collision_padding),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { field });
            }
        }

        positive("viewportWidth", self.viewport_width)?;
        positive("viewportHeight", self.viewport_height)?;
        positive("playerWidth", self.player_width)?;
        positive("playerHeight", self.player_height)?;
        positive("gravity", self.gravity)?;
        positive("jumpPower", self.jump_power)?;
        positive("initialObstacleInterval", self.initial_obstacle_interval)?;
        positive("minObstacleInterval", self.min_obstacle_interval)?;
        positive("enemySize", self.enemy_size)?;
        positive("projectileWidth", self.projectile_width)?;
        positive("projectileHeight", self.projectile_height)?;
        positive("projectileSpeed", self.projectile_speed)?;
        positive("maxJumpCharges", self.max_jump_charges as f64)?;
        positive("initialHp", self.initial_hp as f64)?;
        positive("scoreStepForSpeedup", self.score_step_for_speedup as f64)?;
        positive("invincibleDuration", self.invincible_duration as f64)?;
        positive("cooldownDuration", self.cooldown_duration as f64)?;

        non_negative("playerX", self.player_x)?;
        non_negative("playerMoveSpeed", self.player_move_speed)?;
        non_negative("flySustainSpeed", self.fly_sustain_speed)?;
        non_negative("intervalDecreasePerStep", self.interval_decrease_per_step)?;
        non_negative("intervalDecreasePerSpawn", self.interval_decrease_per_spawn)?;
        non_negative("initialGameSpeed", self.initial_game_speed)?;
        non_negative("speedIncreaseRate", self.speed_increase_rate)?;
        non_negative("enemySpeedJitter", self.enemy_speed_jitter)?;

        if let Scoring::Elapsed { frames_per_point } = self.scoring {
            positive("scoring.framesPerPoint", frames_per_point as f64)?;
        }

        range(
            "obstacleInterval",
            self.min_obstacle_interval,
            self.initial_obstacle_interval,
        )?;
        range("gameSpeed", self.initial_game_speed, self.max_game_speed)?;
        range(
            "obstacleWidthRange",
            self.obstacle_width_range.0,
            self.obstacle_width_range.1,
        )?;
        range(
            "obstacleHeightRange",
            self.obstacle_height_range.0,
            self.obstacle_height_range.1,
        )?;
        positive("obstacleWidthRange.min", self.obstacle_width_range.0)?;
        positive("obstacleHeightRange.min", self.obstacle_height_range.0)?;

        if self.ground_level <= 0.0 || self.ground_level > self.viewport_height {
            return Err(TuningError::GroundOutsideViewport {
                ground: self.ground_level,
                height: self.viewport_height,
            });
        }
        fits("playerHeight", self.player_height, self.ground_level)?;
        fits(
            "playerX + playerWidth",
            self.player_x + self.player_width,
            self.viewport_width,
        )?;
        fits("enemySize", self.enemy_size, self.viewport_width)?;

        Ok(())
    }
}

fn positive(field: &'static str, value: impl Into<f64>) -> Result<(), TuningError> {
    let value = value.into();
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Negative {
            field,
            value: value as f64,
        })
    }
}

fn range(field: &'static str, min: f32, max: f32) -> Result<(), TuningError> {
    if min <= max {
        Ok(())
    } else {
        Err(TuningError::InvertedRange {
            field,
            min: min as f64,
            max: max as f64,
        })
    }
}

fn fits(field: &'static str, size: f32, limit: f32) -> Result<(), TuningError> {
    if size <= limit {
        Ok(())
    } else {
        Err(TuningError::DoesNotFit { field, size, limit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(Tuning::runner().validate().is_ok());
        assert!(Tuning::shooter().validate().is_ok());
        assert_eq!(Tuning::default(), Tuning::runner());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(GameMode::from_str("RUNNER"), Some(GameMode::Runner));
        assert_eq!(GameMode::from_str("shoot"), Some(GameMode::Shooter));
        assert_eq!(GameMode::from_str("pong"), None);
        assert_eq!(Tuning::from_mode(GameMode::Shooter).mode, GameMode::Shooter);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let tuning = Tuning {
            min_obstacle_interval: 0.0,
            ..Tuning::runner()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NotPositive {
                field: "minObstacleInterval",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let tuning = Tuning {
            cooldown_duration: 0,
            ..Tuning::runner()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NotPositive {
                field: "cooldownDuration",
                ..
            })
        ));
    }

    #[test]
    fn test_floor_above_initial_rejected() {
        let tuning = Tuning {
            min_obstacle_interval: 100.0,
            initial_obstacle_interval: 50.0,
            ..Tuning::runner()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::InvertedRange {
                field: "obstacleInterval",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_speed_rate_rejected() {
        let tuning = Tuning {
            speed_increase_rate: -1.0,
            ..Tuning::runner()
        };
        assert!(matches!(tuning.validate(), Err(TuningError::Negative { .. })));
    }

    #[test]
    fn test_negative_enemy_jitter_rejected() {
        let tuning = Tuning {
            enemy_speed_jitter: -0.5,
            ..Tuning::shooter()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Negative {
                field: "enemySpeedJitter",
                ..
            })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let tuning = Tuning {
            gravity: f32::NAN,
            ..Tuning::runner()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NotFinite { field: "gravity" })
        ));
    }

    #[test]
    fn test_ground_outside_viewport_rejected() {
        let tuning = Tuning {
            ground_level: 500.0,
            ..Tuning::runner()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::GroundOutsideViewport { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "jumpPower": 12.0, "initialHp": 5 }"#).unwrap();
        assert_eq!(tuning.jump_power, 12.0);
        assert_eq!(tuning.initial_hp, 5);
        assert_eq!(tuning.gravity, GRAVITY);
    }

    #[test]
    fn test_json_enums() {
        let json = r#"{
            "mode": "Shooter",
            "spawnClock": "WallClock",
            "scoring": { "Elapsed": { "framesPerPoint": 4 } }
        }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.mode, GameMode::Shooter);
        assert_eq!(tuning.spawn_clock, SpawnClock::WallClock);
        assert_eq!(tuning.scoring, Scoring::Elapsed { frames_per_point: 4 });
    }

    #[test]
    fn test_invalid_json_value_rejected() {
        let err = Tuning::from_json(r#"{ "initialHp": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("initialHp"));

        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Tuning::from_file("/nonexistent/side_runner_tuning.json").unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
    }
}
