//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clock values come from the caller, never from the system
//! - Seeded RNG only
//! - Stable iteration order (entity creation order)
//! - No rendering or platform dependencies

pub mod ability;
pub mod body;
pub mod collision;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use ability::{AbilityRejection, AbilityState, JumpOutcome, JumpPhase};
pub use body::KinematicBody;
pub use collision::{Rect, overlaps};
pub use snapshot::{EntityView, PlayerView, RenderSnapshot};
pub use spawner::{Spawn, Spawner};
pub use state::{Entity, EntityKind, GameEvent, GamePhase, GameState, Player};
pub use tick::{InputEvent, tick};
