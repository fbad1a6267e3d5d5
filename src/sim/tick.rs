//! Per-frame simulation step
//!
//! One [`tick`] call is one frame. Order within a frame:
//! timers, inputs, player motion, autofire, entity motion, spawning,
//! projectile hits, player hits, passes, culling, frame scoring.
//!
//! `GameState::events` is emptied when a playing frame starts, so after a
//! call it holds only that frame's events. A `GameOver` frame leaves the
//! final frame's events in place.

use serde::{Deserialize, Serialize};

use super::collision::{cull_offscreen, mark_passed, resolve_player_hazards, resolve_projectile_hits};
use super::state::{GameEvent, GamePhase, GameState};
use crate::tuning::{GameMode, Scoring, SpeedRamp};

/// Input delivered by the host for one frame.
///
/// `JumpPressed`, `JumpReleased`, `AbilityActivatePressed` and
/// `RestartRequested` are edges: send them once, on the frame the key
/// changes. The `*Active` inputs are levels: send them every frame the key
/// stays down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    JumpPressed,
    JumpReleased,
    MoveLeftActive,
    MoveRightActive,
    FireActive,
    AbilityActivatePressed,
    /// Only honoured in `GameOver`
    RestartRequested,
}

/// Advance the game state by one frame at clock value `now_ms`
pub fn tick(state: &mut GameState, inputs: &[InputEvent], now_ms: u64) {
    if state.phase == GamePhase::GameOver {
        if inputs.contains(&InputEvent::RestartRequested) {
            state.reset();
            log::info!("Run restarted (seed {})", state.seed);
        }
        return;
    }

    // Events describe a single frame
    state.events.clear();
    expire_timers(state, now_ms);
    let held = apply_inputs(state, inputs, now_ms);
    move_player(state, held.lateral);

    if held.firing && state.tuning.mode == GameMode::Shooter {
        state.try_fire(now_ms);
    }

    let scroll = state.spawner.current_speed;
    for entity in &mut state.entities {
        entity.advance(scroll);
    }
    if state.tuning.speed_ramp == SpeedRamp::EveryFrame {
        state.spawner.ramp_speed(&state.tuning);
    }

    let spawn = state.spawner.maybe_spawn(
        now_ms,
        state.frame,
        state.score,
        &state.tuning,
        &mut state.rng,
    );
    if let Some(spawn) = spawn {
        state.insert_spawn(spawn);
    }

    let padding = state.tuning.collision_padding;
    let kills = resolve_projectile_hits(&mut state.entities, padding, &mut state.events);
    if let Scoring::Events = state.tuning.scoring {
        state.score = state
            .score
            .saturating_add(u64::from(kills).saturating_mul(state.tuning.kill_reward));
    }

    let fatal = resolve_player_hazards(
        &mut state.player,
        &mut state.entities,
        padding,
        state.tuning.invincible_policy,
        &mut state.events,
    );
    if fatal {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!("Game over at frame {} with score {}", state.frame, state.score);
        return;
    }

    let passed = mark_passed(
        &mut state.entities,
        state.player.body.pos.x,
        &mut state.events,
    );
    if let Scoring::Events = state.tuning.scoring {
        state.score = state
            .score
            .saturating_add(u64::from(passed).saturating_mul(state.tuning.pass_reward));
    }

    cull_offscreen(
        &mut state.entities,
        state.tuning.viewport_width,
        state.tuning.viewport_height,
    );

    state.frame += 1;
    if let Scoring::Elapsed { frames_per_point } = state.tuning.scoring {
        if state.frame % u64::from(frames_per_point) == 0 {
            state.score = state.score.saturating_add(1);
        }
    }
}

/// Level inputs gathered for this frame
#[derive(Debug, Default)]
struct HeldInputs {
    /// -1 left, +1 right, 0 both or neither
    lateral: f32,
    firing: bool,
}

fn expire_timers(state: &mut GameState, now_ms: u64) {
    let expiry = state.player.abilities.expire(now_ms);
    if expiry.invincibility_ended {
        state.events.push(GameEvent::InvincibilityEnded);
    }
    if expiry.cooldown_ended {
        state.events.push(GameEvent::CooldownEnded);
    }
}

fn apply_inputs(state: &mut GameState, inputs: &[InputEvent], now_ms: u64) -> HeldInputs {
    let mut held = HeldInputs::default();
    let runner = state.tuning.mode == GameMode::Runner;

    for input in inputs {
        match input {
            InputEvent::JumpPressed if runner => {
                state.press_jump();
            }
            InputEvent::JumpReleased if runner => {
                if state.player.abilities.release_jump() {
                    state.events.push(GameEvent::FlightEnded);
                }
            }
            InputEvent::MoveLeftActive => held.lateral -= 1.0,
            InputEvent::MoveRightActive => held.lateral += 1.0,
            InputEvent::FireActive => held.firing = true,
            InputEvent::AbilityActivatePressed => {
                if let Err(rejection) = state.activate_invincibility(now_ms) {
                    log::debug!("Invincibility rejected: {rejection}");
                    state.events.push(GameEvent::AbilityRejected(rejection));
                }
            }
            _ => {}
        }
    }

    held
}

fn move_player(state: &mut GameState, lateral: f32) {
    let tuning = &state.tuning;
    let player = &mut state.player;

    match tuning.mode {
        GameMode::Runner => {
            let flight = player.abilities.sustain_flight(&mut player.body, tuning);
            if flight.ended {
                state.events.push(GameEvent::FlightEnded);
            }

            let touched_down = player.body.integrate(flight.gravity, tuning.ground_level);
            player.body.clamp_to_ceiling(0.0);
            if player.body.grounded {
                player.abilities.land();
            }
            if touched_down {
                state.events.push(GameEvent::Landed);
            }
        }
        GameMode::Shooter => {
            if lateral != 0.0 {
                player
                    .body
                    .move_lateral(lateral * tuning.player_move_speed, tuning.viewport_width);
            }
        }
    }
}
