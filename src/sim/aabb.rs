//! Axis-aligned boxes in screen space
//!
//! The collision pass works entirely in screen space (y grows downward, the
//! ground line sits at `ground_y`). Entities store their height above the
//! floor, so they are converted with [`Aabb::from_ground`] before testing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Box for something standing `height_above_ground` above the floor
    pub fn from_ground(x: f32, height_above_ground: f32, size: Vec2, ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(x, ground_y - (height_above_ground + size.y)),
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap test; boxes that merely touch do not collide
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}
