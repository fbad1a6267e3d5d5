//! Game state and core simulation types
//!
//! Everything a session owns lives here. Two states built from the same
//! tuning and seed and fed the same inputs and clock values stay identical.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ability::{AbilityRejection, AbilityState, JumpOutcome};
use super::body::KinematicBody;
use super::collision::Rect;
use super::snapshot::RenderSnapshot;
use super::spawner::{Spawn, Spawner};
use crate::tuning::{Tuning, TuningError};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended; only a restart leaves this phase
    GameOver,
}

/// Entity kinds besides the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Ground-anchored block scrolling toward the player
    Obstacle,
    /// Falls from the top edge
    Enemy,
    /// Fired upward by the player
    Projectile,
}

/// A spawned entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub body: KinematicBody,
    /// Obstacle already went past the player (counted once)
    pub passed: bool,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, body: KinematicBody) -> Self {
        Self {
            id,
            kind,
            body,
            passed: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Obstacles and enemies hurt the player; projectiles do not
    #[inline]
    pub fn is_hazard(&self) -> bool {
        matches!(self.kind, EntityKind::Obstacle | EntityKind::Enemy)
    }

    /// Move one step. Obstacles ride the world scroll speed, everything
    /// else keeps the velocity it was spawned with.
    pub fn advance(&mut self, scroll_speed: f32) {
        if self.kind == EntityKind::Obstacle {
            self.body.vel.x = -scroll_speed;
        }
        self.body.advance();
    }

    /// Trailing edge has fully left the viewport in the direction of travel
    pub fn is_offscreen(&self, _viewport_width: f32, viewport_height: f32) -> bool {
        let rect = self.rect();
        match self.kind {
            EntityKind::Obstacle => rect.right() < 0.0,
            EntityKind::Enemy => rect.top() > viewport_height,
            EntityKind::Projectile => rect.bottom() < 0.0,
        }
    }
}

/// The player singleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: KinematicBody,
    pub abilities: AbilityState,
    pub hp: u32,
    /// Clock value of the last projectile fired
    pub last_shot_ms: Option<u64>,
}

impl Player {
    /// Full HP and charges, standing on the ground line
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            body: KinematicBody::resting_on(
                tuning.player_x,
                tuning.ground_level,
                Vec2::new(tuning.player_width, tuning.player_height),
            ),
            abilities: AbilityState::new(tuning.max_jump_charges),
            hp: tuning.initial_hp,
            last_shot_ms: None,
        }
    }
}

/// Observable things that happened, in order, for cosmetic feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    AirJumped,
    FlightStarted,
    FlightEnded,
    Landed,
    /// Player lost one HP to this hazard
    Hit { entity_id: u32, hp_left: u32 },
    /// Invincible contact destroyed the hazard
    HazardShrugged { entity_id: u32 },
    InvincibilityStarted { until: u64 },
    InvincibilityEnded,
    CooldownEnded,
    AbilityRejected(AbilityRejection),
    ObstaclePassed { entity_id: u32 },
    EnemyDestroyed { enemy_id: u32, projectile_id: u32 },
    ProjectileFired { entity_id: u32 },
    Spawned { entity_id: u32, kind: EntityKind },
    GameOver { score: u64 },
    NewBestScore { score: u64 },
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Run seed; `reset` reseeds with it
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    /// Simulation steps taken this run
    pub frame: u64,
    pub player: Player,
    /// Insertion order is creation order
    pub entities: Vec<Entity>,
    pub spawner: Spawner,
    /// Events raised by the most recent frame (cleared when the next one starts)
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Validate the tuning and start a fresh run
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::fresh(tuning, seed))
    }

    fn fresh(tuning: Tuning, seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            phase: GamePhase::Playing,
            score: 0,
            frame: 0,
            player: Player::new(&tuning),
            entities: Vec::new(),
            spawner: Spawner::new(&tuning),
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Back to construction defaults. All timers and entities are dropped
    /// in one go; nothing from the previous run survives.
    pub fn reset(&mut self) {
        let tuning = self.tuning.clone();
        *self = Self::fresh(tuning, self.seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take every pending event
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Jump key edge. Emits the matching event when a charge was spent.
    pub fn press_jump(&mut self) -> JumpOutcome {
        let outcome = self
            .player
            .abilities
            .press_jump(&mut self.player.body, &self.tuning);
        let event = match outcome {
            JumpOutcome::Jumped => Some(GameEvent::Jumped),
            JumpOutcome::AirJumped => Some(GameEvent::AirJumped),
            JumpOutcome::FlightStarted => Some(GameEvent::FlightStarted),
            JumpOutcome::Ignored => None,
        };
        self.events.extend(event);
        outcome
    }

    /// Spend score on invincibility (see [`AbilityState::activate_invincibility`])
    pub fn activate_invincibility(&mut self, now_ms: u64) -> Result<(), AbilityRejection> {
        let game_over = self.is_game_over();
        self.player
            .abilities
            .activate_invincibility(now_ms, &mut self.score, game_over, &self.tuning)?;
        self.events.push(GameEvent::InvincibilityStarted {
            until: self.player.abilities.invincible_until,
        });
        Ok(())
    }

    /// Fire a projectile from the player's top centre if the fire cooldown
    /// has elapsed. Returns the new projectile's id.
    pub fn try_fire(&mut self, now_ms: u64) -> Option<u32> {
        let cooling = self
            .player
            .last_shot_ms
            .is_some_and(|last| now_ms.saturating_sub(last) <= self.tuning.fire_cooldown_ms);
        if cooling {
            return None;
        }
        self.player.last_shot_ms = Some(now_ms);

        let size = Vec2::new(self.tuning.projectile_width, self.tuning.projectile_height);
        let player = self.player.body.rect();
        let pos = Vec2::new(player.x + (player.width - size.x) / 2.0, player.top() - size.y);
        let mut body = KinematicBody::new(pos, size);
        body.vel.y = -self.tuning.projectile_speed;

        let id = self.next_entity_id();
        self.entities.push(Entity::new(id, EntityKind::Projectile, body));
        self.events.push(GameEvent::ProjectileFired { entity_id: id });
        Some(id)
    }

    /// Insert a spawner product at the end of the entity list
    pub fn insert_spawn(&mut self, spawn: Spawn) -> u32 {
        let id = self.next_entity_id();
        log::debug!(
            "Spawned {:?} #{} at ({:.0}, {:.0}) size {:.0}x{:.0}",
            spawn.kind,
            id,
            spawn.body.pos.x,
            spawn.body.pos.y,
            spawn.body.size.x,
            spawn.body.size.y
        );
        self.entities.push(Entity::new(id, spawn.kind, spawn.body));
        self.events.push(GameEvent::Spawned {
            entity_id: id,
            kind: spawn.kind,
        });
        id
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self, best_score: u64) -> RenderSnapshot {
        RenderSnapshot::capture(self, best_score)
    }
}
