//! Side Runner - simulation core for 2D side-scrolling arcade games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, abilities, spawning, collisions)
//! - `session`: Playing/GameOver lifecycle and best-score bookkeeping
//! - `tuning`: Data-driven game balance
//! - `highscores`: Best-score persistence contract
//!
//! Rendering, input wiring and audio belong to the host. The host feeds
//! [`sim::InputEvent`]s plus a clock value into [`Session::update`] and reads
//! a [`sim::RenderSnapshot`] back each frame.

pub mod highscores;
pub mod session;
pub mod sim;
pub mod tuning;

pub use highscores::{BestScore, MemoryStore};
pub use session::Session;
pub use tuning::{GameMode, Tuning, TuningError};

/// Default geometry and balance constants
pub mod consts {
    /// Default canvas size
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 400.0;
    /// Floor line (10px strip at the bottom of the canvas)
    pub const GROUND_LEVEL: f32 = VIEWPORT_HEIGHT - 10.0;

    /// Runner player defaults
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_SIZE: f32 = 40.0;

    /// Per-frame vertical acceleration (pixels/frame²)
    pub const GRAVITY: f32 = 0.8;
    /// Upward speed applied on jump (pixels/frame)
    pub const JUMP_POWER: f32 = 18.0;
    /// Upward speed held while flying
    pub const FLY_SUSTAIN_SPEED: f32 = 5.0;
    /// ~5 seconds at 60 fps
    pub const MAX_FLIGHT_FRAMES: u32 = 300;
    /// Ground jump + one air action
    pub const MAX_JUMP_CHARGES: u32 = 2;

    pub const INVINCIBLE_DURATION_MS: u64 = 3_000;
    pub const INVINCIBLE_COST: u64 = 20;
    pub const COOLDOWN_DURATION_MS: u64 = 10_000;

    pub const INITIAL_HP: u32 = 3;

    /// Fixed reward per enemy destroyed
    pub const KILL_REWARD: u64 = 10;

    /// Nominal host frame rate (frame-count scheduling assumes it)
    pub const FRAME_MS: u64 = 16;
}
