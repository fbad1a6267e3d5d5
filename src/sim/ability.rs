//! Player abilities
//!
//! Two independent sub-machines share the player:
//! - jump/flight: Grounded -> Jumping -> Flying, charges restored on landing
//! - invincibility/cooldown: both timers start at the same activation instant
//!
//! Jump and flight *initiation* is edge-triggered (one charge per press);
//! sustained flight is level-sensed while the key stays down.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::body::KinematicBody;
use crate::tuning::{AirMove, Tuning};

/// Position in the jump/flight sub-machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpPhase {
    Grounded,
    Jumping,
    Flying,
}

/// Result of a jump press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Ground jump, impulse applied
    Jumped,
    /// Airborne press with `AirMove::DoubleJump`
    AirJumped,
    /// Airborne press with `AirMove::Flight`
    FlightStarted,
    /// Key already held, no charges, or already flying
    Ignored,
}

/// Why an invincibility activation was refused. Never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum AbilityRejection {
    #[error("the run is over")]
    GameOver,
    #[error("invincibility is already active")]
    AlreadyInvincible,
    #[error("invincibility is on cooldown ({remaining_ms} ms left)")]
    OnCooldown { remaining_ms: u64 },
    #[error("not enough score ({score}, {cost} required)")]
    InsufficientScore { score: u64, cost: u64 },
}

/// Timers that lapsed during [`AbilityState::expire`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expiry {
    pub invincibility_ended: bool,
    pub cooldown_ended: bool,
}

/// Gravity decision for one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightStep {
    /// Gravity to integrate this step (zero while flight holds the body up)
    pub gravity: f32,
    /// Flight stopped this step (frame budget spent or key released)
    pub ended: bool,
}

/// Ability state attached to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityState {
    pub jump_charges: u32,
    pub max_charges: u32,
    pub is_flying: bool,
    pub flight_frames: u32,
    /// Jump key currently down (edge detection for presses)
    pub jump_held: bool,

    pub is_invincible: bool,
    /// Clock value (ms) at which invincibility lapses
    pub invincible_until: u64,
    pub is_on_cooldown: bool,
    /// Clock value (ms) at which the skill can be used again
    pub cooldown_until: u64,
}

impl AbilityState {
    pub fn new(max_charges: u32) -> Self {
        Self {
            jump_charges: max_charges,
            max_charges,
            is_flying: false,
            flight_frames: 0,
            jump_held: false,
            is_invincible: false,
            invincible_until: 0,
            is_on_cooldown: false,
            cooldown_until: 0,
        }
    }

    pub fn phase(&self, body: &KinematicBody) -> JumpPhase {
        if self.is_flying {
            JumpPhase::Flying
        } else if body.grounded {
            JumpPhase::Grounded
        } else {
            JumpPhase::Jumping
        }
    }

    /// Jump key went down
    pub fn press_jump(&mut self, body: &mut KinematicBody, tuning: &Tuning) -> JumpOutcome {
        // Key repeat while held is not a new press
        if self.jump_held {
            return JumpOutcome::Ignored;
        }
        self.jump_held = true;

        if self.jump_charges == 0 {
            return JumpOutcome::Ignored;
        }

        if body.grounded {
            self.jump_charges -= 1;
            self.is_flying = false;
            self.flight_frames = 0;
            body.vel.y = -tuning.jump_power;
            body.grounded = false;
            return JumpOutcome::Jumped;
        }

        match tuning.air_move {
            AirMove::Flight if !self.is_flying => {
                self.jump_charges -= 1;
                self.is_flying = true;
                self.flight_frames = 0;
                body.vel.y = -tuning.fly_sustain_speed;
                JumpOutcome::FlightStarted
            }
            AirMove::Flight => JumpOutcome::Ignored,
            AirMove::DoubleJump => {
                self.jump_charges -= 1;
                body.vel.y = -tuning.jump_power;
                JumpOutcome::AirJumped
            }
        }
    }

    /// Jump key went up. Returns true if this ended a flight.
    pub fn release_jump(&mut self) -> bool {
        self.jump_held = false;
        if self.is_flying {
            self.is_flying = false;
            return true;
        }
        false
    }

    /// Per-step flight bookkeeping, run before the body integrates
    pub fn sustain_flight(&mut self, body: &mut KinematicBody, tuning: &Tuning) -> FlightStep {
        if self.is_flying {
            self.flight_frames += 1;
            if self.flight_frames < tuning.max_flight_frames && self.jump_held {
                body.vel.y = -tuning.fly_sustain_speed;
                return FlightStep {
                    gravity: 0.0,
                    ended: false,
                };
            }
            self.is_flying = false;
            return FlightStep {
                gravity: tuning.gravity,
                ended: true,
            };
        }

        FlightStep {
            gravity: tuning.gravity,
            ended: false,
        }
    }

    /// Touchdown always wins: charges refill and flight is cleared
    pub fn land(&mut self) {
        self.jump_charges = self.max_charges;
        self.is_flying = false;
        self.flight_frames = 0;
    }

    /// Spend `invincible_cost` score for a timed invincibility window.
    ///
    /// Invincibility and cooldown both start at `now_ms` and run
    /// concurrently. Rejections leave score and timers untouched.
    pub fn activate_invincibility(
        &mut self,
        now_ms: u64,
        score: &mut u64,
        game_over: bool,
        tuning: &Tuning,
    ) -> Result<(), AbilityRejection> {
        if game_over {
            return Err(AbilityRejection::GameOver);
        }
        if self.is_invincible {
            return Err(AbilityRejection::AlreadyInvincible);
        }
        if self.is_on_cooldown {
            return Err(AbilityRejection::OnCooldown {
                remaining_ms: self.cooldown_until.saturating_sub(now_ms),
            });
        }
        if *score < tuning.invincible_cost {
            return Err(AbilityRejection::InsufficientScore {
                score: *score,
                cost: tuning.invincible_cost,
            });
        }

        *score -= tuning.invincible_cost;
        self.is_invincible = true;
        self.invincible_until = now_ms.saturating_add(tuning.invincible_duration);
        self.is_on_cooldown = true;
        self.cooldown_until = now_ms.saturating_add(tuning.cooldown_duration);

        log::info!(
            "Invincibility active until {} ms (cooldown until {} ms)",
            self.invincible_until,
            self.cooldown_until
        );
        Ok(())
    }

    /// Clear timers whose deadline has been reached (`now >= deadline`)
    pub fn expire(&mut self, now_ms: u64) -> Expiry {
        let mut expiry = Expiry::default();

        if self.is_invincible && now_ms >= self.invincible_until {
            self.is_invincible = false;
            expiry.invincibility_ended = true;
            log::info!("Invincibility ended");
        }
        if self.is_on_cooldown && now_ms >= self.cooldown_until {
            self.is_on_cooldown = false;
            expiry.cooldown_ended = true;
            log::info!("Invincibility cooldown ended");
        }

        expiry
    }
}
