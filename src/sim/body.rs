//! Kinematic bodies
//!
//! Gravity is applied once per simulation step, not scaled by elapsed time.
//! The feel of a jump is therefore tied to the step rate; a fixed-timestep
//! host must keep one [`KinematicBody::integrate`] call per step.
//!
//! Ground contact is a post-hoc clamp (discrete, not continuous). A body
//! that overshoots the floor is corrected in the same step, but there is no
//! tunneling prevention beyond that: a body fast enough to cross a thin
//! obstacle within one step will not collide with it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;

/// Position, size and velocity of one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Displacement per step
    pub vel: Vec2,
    /// Bottom edge rests on the ground line and `vel.y == 0`
    pub grounded: bool,
}

impl KinematicBody {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            grounded: false,
        }
    }

    /// A body standing on the ground line at horizontal position `x`
    pub fn resting_on(x: f32, ground_level: f32, size: Vec2) -> Self {
        Self {
            pos: Vec2::new(x, ground_level - size.y),
            size,
            vel: Vec2::ZERO,
            grounded: true,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Move by velocity with no acceleration (obstacles, enemies, projectiles)
    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// One gravity step: accelerate, move vertically, clamp to the ground.
    ///
    /// Returns true if the body touched down during this step.
    pub fn integrate(&mut self, gravity: f32, ground_level: f32) -> bool {
        let was_grounded = self.grounded;
        self.vel.y += gravity;
        self.pos.y += self.vel.y;
        self.clamp_to_ground(ground_level) && !was_grounded
    }

    /// Snap onto the ground line if at or below it. Idempotent.
    pub fn clamp_to_ground(&mut self, ground_level: f32) -> bool {
        if self.bottom() >= ground_level {
            self.pos.y = ground_level - self.size.y;
            self.vel.y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
        self.grounded
    }

    /// Keep the top edge at or below `ceiling`, cancelling upward motion
    pub fn clamp_to_ceiling(&mut self, ceiling: f32) {
        if self.pos.y < ceiling {
            self.pos.y = ceiling;
            self.vel.y = 0.0;
        }
    }

    /// Direct lateral displacement, clamped to `[0, viewport_width - width]`
    pub fn move_lateral(&mut self, dx: f32, viewport_width: f32) {
        let max_x = (viewport_width - self.size.x).max(0.0);
        self.pos.x = (self.pos.x + dx).clamp(0.0, max_x);
    }
}
