//! Read-only render snapshot
//!
//! The renderer gets rectangles and flags, never the live state.

use serde::Serialize;

use super::collision::Rect;
use super::state::{EntityKind, GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub rect: Rect,
    pub hp: u32,
    pub jump_charges: u32,
    pub grounded: bool,
    pub is_flying: bool,
    /// Tint/alpha cue for the renderer
    pub is_invincible: bool,
    pub is_on_cooldown: bool,
    pub invincible_until: u64,
    pub cooldown_until: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityKind,
    pub rect: Rect,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub best_score: u64,
    pub frame: u64,
    pub game_speed: f32,
    pub player: PlayerView,
    /// Creation order
    pub entities: Vec<EntityView>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState, best_score: u64) -> Self {
        let player = &state.player;
        let abilities = &player.abilities;

        Self {
            phase: state.phase,
            score: state.score,
            best_score,
            frame: state.frame,
            game_speed: state.spawner.current_speed,
            player: PlayerView {
                rect: player.body.rect(),
                hp: player.hp,
                jump_charges: abilities.jump_charges,
                grounded: player.body.grounded,
                is_flying: abilities.is_flying,
                is_invincible: abilities.is_invincible,
                is_on_cooldown: abilities.is_on_cooldown,
                invincible_until: abilities.invincible_until,
                cooldown_until: abilities.cooldown_until,
            },
            entities: state
                .entities
                .iter()
                .map(|e| EntityView {
                    id: e.id,
                    kind: e.kind,
                    rect: e.rect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::KinematicBody;
    use crate::sim::state::Entity;
    use crate::tuning::Tuning;
    use glam::Vec2;

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(Tuning::runner(), 5).unwrap();
        for x in [300.0, 500.0] {
            let id = state.next_entity_id();
            let body = KinematicBody::new(Vec2::new(x, 340.0), Vec2::new(20.0, 50.0));
            state.entities.push(Entity::new(id, EntityKind::Obstacle, body));
        }
        state.score = 12;

        let snapshot = state.snapshot(40);
        assert_eq!(snapshot.phase, GamePhase::Playing);
        assert_eq!(snapshot.score, 12);
        assert_eq!(snapshot.best_score, 40);
        assert_eq!(snapshot.player.rect, state.player.body.rect());
        assert_eq!(snapshot.player.hp, 3);
        let ids: Vec<u32> = snapshot.entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(snapshot.entities[1].rect, Rect::new(500.0, 340.0, 20.0, 50.0));
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(Tuning::shooter(), 5).unwrap();
        let json = serde_json::to_value(state.snapshot(0)).unwrap();
        assert_eq!(json["phase"], "Playing");
        assert_eq!(json["player"]["isInvincible"], false);
        assert!(json["entities"].as_array().unwrap().is_empty());
    }
}
