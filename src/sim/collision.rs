//! Axis-aligned collision detection and entity lifecycle
//!
//! Removal is always mark-then-sweep: a pass collects the ids of consumed
//! entities and [`sweep`] drops them in a single `retain`, so removing
//! during a pass never skips or double-visits a neighbour.

use serde::{Deserialize, Serialize};

use super::state::{Entity, EntityKind, GameEvent, Player};
use crate::tuning::InvinciblePolicy;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// AABB overlap test with symmetric padding.
///
/// Positive padding grows the effective hitbox, negative shrinks it. The
/// padding is applied to the gap between the boxes, so
/// `overlaps(a, b, p) == overlaps(b, a, p)`. Each axis is written as two
/// mirrored `<` tests so the symmetry also holds under float rounding.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect, padding: f32) -> bool {
    a.left() < b.right() + padding
        && b.left() < a.right() + padding
        && a.top() < b.bottom() + padding
        && b.top() < a.bottom() + padding
}

/// Drop every entity whose id is in `doomed`. Returns how many were removed.
pub fn sweep(entities: &mut Vec<Entity>, doomed: &[u32]) -> usize {
    if doomed.is_empty() {
        return 0;
    }
    let before = entities.len();
    entities.retain(|e| !doomed.contains(&e.id));
    before - entities.len()
}

/// Projectiles against enemies, projectiles outer and enemies inner.
///
/// First hit wins: a projectile that destroys an enemy is consumed and not
/// tested against any further enemy this step. Returns the kill count.
pub fn resolve_projectile_hits(
    entities: &mut Vec<Entity>,
    padding: f32,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let mut doomed: Vec<u32> = Vec::new();
    let mut kills = 0;

    for projectile in entities.iter().filter(|e| e.kind == EntityKind::Projectile) {
        let shot = projectile.rect();
        let target = entities.iter().find(|e| {
            e.kind == EntityKind::Enemy
                && !doomed.contains(&e.id)
                && overlaps(&shot, &e.rect(), padding)
        });

        if let Some(enemy) = target {
            doomed.push(projectile.id);
            doomed.push(enemy.id);
            kills += 1;
            events.push(GameEvent::EnemyDestroyed {
                enemy_id: enemy.id,
                projectile_id: projectile.id,
            });
        }
    }

    sweep(entities, &doomed);
    kills
}

/// Player against obstacles and enemies.
///
/// A hit while vulnerable costs one HP and consumes the hazard. While
/// invincible the hazard is left alone or destroyed according to `policy`.
/// Processing stops at the hit that empties HP. Returns true on that hit.
pub fn resolve_player_hazards(
    player: &mut Player,
    entities: &mut Vec<Entity>,
    padding: f32,
    policy: InvinciblePolicy,
    events: &mut Vec<GameEvent>,
) -> bool {
    let body = player.body.rect();
    let mut doomed: Vec<u32> = Vec::new();
    let mut fatal = false;

    for hazard in entities.iter().filter(|e| e.is_hazard()) {
        if !overlaps(&body, &hazard.rect(), padding) {
            continue;
        }

        if player.abilities.is_invincible {
            if policy == InvinciblePolicy::Destroy {
                doomed.push(hazard.id);
                events.push(GameEvent::HazardShrugged {
                    entity_id: hazard.id,
                });
            }
            continue;
        }

        player.hp = player.hp.saturating_sub(1);
        doomed.push(hazard.id);
        events.push(GameEvent::Hit {
            entity_id: hazard.id,
            hp_left: player.hp,
        });
        log::debug!("Hit by entity {} - HP {}", hazard.id, player.hp);

        if player.hp == 0 {
            fatal = true;
            break;
        }
    }

    sweep(entities, &doomed);
    fatal
}

/// Flag obstacles whose trailing edge has moved past the player's left edge.
///
/// Each obstacle is counted once. Returns the number newly passed.
pub fn mark_passed(entities: &mut [Entity], player_left: f32, events: &mut Vec<GameEvent>) -> u32 {
    let mut passed = 0;
    for obstacle in entities
        .iter_mut()
        .filter(|e| e.kind == EntityKind::Obstacle && !e.passed)
    {
        if obstacle.rect().right() < player_left {
            obstacle.passed = true;
            passed += 1;
            events.push(GameEvent::ObstaclePassed {
                entity_id: obstacle.id,
            });
        }
    }
    passed
}

/// Remove entities that have fully left the visible area.
///
/// Culling never touches the score.
pub fn cull_offscreen(entities: &mut Vec<Entity>, viewport_width: f32, viewport_height: f32) -> usize {
    let before = entities.len();
    entities.retain(|e| !e.is_offscreen(viewport_width, viewport_height));
    before - entities.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::KinematicBody;
    use crate::sim::state::Player;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    fn entity(id: u32, kind: EntityKind, x: f32, y: f32, w: f32, h: f32) -> Entity {
        Entity::new(id, kind, KinematicBody::new(Vec2::new(x, y), Vec2::new(w, h)))
    }

    fn player_at(x: f32, y: f32) -> Player {
        let tuning = Tuning::runner();
        let mut player = Player::new(&tuning);
        player.body.pos = Vec2::new(x, y);
        player
    }

    #[test]
    fn test_overlap_basic() {
        let player = Rect::new(50.0, 50.0, 40.0, 40.0);
        let obstacle = Rect::new(60.0, 60.0, 40.0, 40.0);
        assert!(overlaps(&player, &obstacle, 0.0));

        let far = Rect::new(200.0, 60.0, 40.0, 40.0);
        assert!(!overlaps(&player, &far, 0.0));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &b, 0.0));
        assert!(overlaps(&a, &b, 1.0));
    }

    #[test]
    fn test_negative_padding_shrinks_hitbox() {
        let a = Rect::new(0.0, 0.0, 64.0, 64.0);
        let b = Rect::new(58.0, 0.0, 64.0, 64.0);
        assert!(overlaps(&a, &b, 0.0));
        assert!(!overlaps(&a, &b, -10.0));
    }

    #[test]
    fn test_sweep_every_other() {
        let mut entities: Vec<Entity> = (1..=10)
            .map(|id| entity(id, EntityKind::Obstacle, id as f32 * 10.0, 0.0, 5.0, 5.0))
            .collect();
        let doomed: Vec<u32> = (1..=10).filter(|id| id % 2 == 0).collect();

        assert_eq!(sweep(&mut entities, &doomed), 5);
        let ids: Vec<u32> = entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn test_projectile_first_hit_wins() {
        // One projectile overlapping two enemies, one enemy out of reach
        let mut entities = vec![
            entity(1, EntityKind::Enemy, 100.0, 100.0, 30.0, 30.0),
            entity(2, EntityKind::Enemy, 105.0, 105.0, 30.0, 30.0),
            entity(3, EntityKind::Enemy, 400.0, 100.0, 30.0, 30.0),
            entity(4, EntityKind::Projectile, 110.0, 110.0, 5.0, 10.0),
        ];
        let mut events = Vec::new();

        let kills = resolve_projectile_hits(&mut entities, 0.0, &mut events);
        assert_eq!(kills, 1);
        let ids: Vec<u32> = entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(
            events,
            vec![GameEvent::EnemyDestroyed {
                enemy_id: 1,
                projectile_id: 4
            }]
        );
    }

    #[test]
    fn test_two_projectiles_one_enemy() {
        let mut entities = vec![
            entity(1, EntityKind::Enemy, 100.0, 100.0, 30.0, 30.0),
            entity(2, EntityKind::Projectile, 110.0, 110.0, 5.0, 10.0),
            entity(3, EntityKind::Projectile, 112.0, 110.0, 5.0, 10.0),
        ];
        let mut events = Vec::new();

        assert_eq!(resolve_projectile_hits(&mut entities, 0.0, &mut events), 1);
        // The second projectile survives: its target was already consumed
        let ids: Vec<u32> = entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_hazard_costs_hp_and_consumes() {
        let mut player = player_at(50.0, 350.0);
        let mut entities = vec![entity(7, EntityKind::Obstacle, 60.0, 360.0, 30.0, 30.0)];
        let mut events = Vec::new();

        let fatal = resolve_player_hazards(
            &mut player,
            &mut entities,
            0.0,
            InvinciblePolicy::PassThrough,
            &mut events,
        );
        assert!(!fatal);
        assert_eq!(player.hp, 2);
        assert!(entities.is_empty());
        assert_eq!(
            events,
            vec![GameEvent::Hit {
                entity_id: 7,
                hp_left: 2
            }]
        );
    }

    #[test]
    fn test_invincible_pass_through() {
        let mut player = player_at(50.0, 350.0);
        player.abilities.is_invincible = true;
        let mut entities = vec![entity(7, EntityKind::Obstacle, 60.0, 360.0, 30.0, 30.0)];
        let mut events = Vec::new();

        resolve_player_hazards(
            &mut player,
            &mut entities,
            0.0,
            InvinciblePolicy::PassThrough,
            &mut events,
        );
        assert_eq!(player.hp, 3);
        assert_eq!(entities.len(), 1);
        assert!(events.is_empty());
    }

    #[test]
    fn test_invincible_destroy_policy() {
        let mut player = player_at(50.0, 350.0);
        player.abilities.is_invincible = true;
        let mut entities = vec![entity(7, EntityKind::Obstacle, 60.0, 360.0, 30.0, 30.0)];
        let mut events = Vec::new();

        resolve_player_hazards(
            &mut player,
            &mut entities,
            0.0,
            InvinciblePolicy::Destroy,
            &mut events,
        );
        assert_eq!(player.hp, 3);
        assert!(entities.is_empty());
        assert_eq!(events, vec![GameEvent::HazardShrugged { entity_id: 7 }]);
    }

    #[test]
    fn test_fatal_hit_stops_processing() {
        let mut player = player_at(50.0, 350.0);
        player.hp = 1;
        let mut entities = vec![
            entity(1, EntityKind::Obstacle, 60.0, 360.0, 30.0, 30.0),
            entity(2, EntityKind::Obstacle, 55.0, 360.0, 30.0, 30.0),
        ];
        let mut events = Vec::new();

        let fatal = resolve_player_hazards(
            &mut player,
            &mut entities,
            0.0,
            InvinciblePolicy::PassThrough,
            &mut events,
        );
        assert!(fatal);
        assert_eq!(player.hp, 0);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id, 2);
    }

    #[test]
    fn test_projectiles_are_not_hazards() {
        let mut player = player_at(50.0, 350.0);
        let mut entities = vec![entity(1, EntityKind::Projectile, 60.0, 360.0, 5.0, 10.0)];
        let mut events = Vec::new();

        resolve_player_hazards(
            &mut player,
            &mut entities,
            0.0,
            InvinciblePolicy::PassThrough,
            &mut events,
        );
        assert_eq!(player.hp, 3);
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn test_pass_counted_once() {
        let mut entities = vec![entity(1, EntityKind::Obstacle, 10.0, 360.0, 30.0, 30.0)];
        let mut events = Vec::new();

        assert_eq!(mark_passed(&mut entities, 50.0, &mut events), 1);
        assert_eq!(mark_passed(&mut entities, 50.0, &mut events), 0);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_cull_by_direction() {
        let mut entities = vec![
            entity(1, EntityKind::Obstacle, -31.0, 360.0, 30.0, 30.0),
            entity(2, EntityKind::Obstacle, -29.0, 360.0, 30.0, 30.0),
            entity(3, EntityKind::Enemy, 100.0, 401.0, 30.0, 30.0),
            entity(4, EntityKind::Enemy, 100.0, 399.0, 30.0, 30.0),
            entity(5, EntityKind::Projectile, 100.0, -11.0, 5.0, 10.0),
            entity(6, EntityKind::Projectile, 100.0, -9.0, 5.0, 10.0),
        ];

        assert_eq!(cull_offscreen(&mut entities, 800.0, 400.0), 3);
        let ids: Vec<u32> = entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 4, 6]);
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_overlap_symmetric(a in arb_rect(), b in arb_rect(), padding in -10.0f32..10.0) {
            prop_assert_eq!(overlaps(&a, &b, padding), overlaps(&b, &a, padding));
        }

        #[test]
        fn prop_sweep_keeps_survivors_in_order(n in 0u32..64) {
            let mut entities: Vec<Entity> = (0..n)
                .map(|id| entity(id, EntityKind::Enemy, 0.0, 0.0, 1.0, 1.0))
                .collect();
            let doomed: Vec<u32> = (0..n).filter(|id| id % 2 == 1).collect();
            sweep(&mut entities, &doomed);

            let ids: Vec<u32> = entities.iter().map(|e| e.id).collect();
            let expected: Vec<u32> = (0..n).filter(|id| id % 2 == 0).collect();
            prop_assert_eq!(ids, expected);
        }
    }
}
