//! Collision detection and resolution policy
//!
//! Narrow phase is a plain AABB overlap in screen space. What happens on an
//! overlap is decided by [`resolve`], which checks the rules in a fixed order
//! and returns the first that applies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::player::PlayerState;
use super::state::{EntityKind, PowerUpKind};

/// Outcome of the player overlapping an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Collectible picked up and removed
    Collect,
    /// Power-up granted and removed
    PickUp(PowerUpKind),
    /// Player came down on top of a platform
    Land,
    /// Shield spent instead of dying; hazards are destroyed by it
    ShieldAbsorb { destroy: bool },
    /// Run ends
    Fatal,
}

impl Resolution {
    /// Whether scanning continues after this outcome
    pub fn continues(&self) -> bool {
        !matches!(self, Resolution::Fatal)
    }
}

/// Whether a falling player is close enough to a platform's top to land on it
#[inline]
pub fn can_land(player: &PlayerState, platform: &Aabb, tolerance: f32) -> bool {
    player.vel.y >= 0.0 && player.bottom() < platform.top() + tolerance
}

/// Decide what an overlap with an entity of `kind` at `bounds` does
pub fn resolve(kind: EntityKind, bounds: &Aabb, player: &PlayerState, land_tolerance: f32) -> Resolution {
    match kind {
        EntityKind::Collectible => Resolution::Collect,
        EntityKind::PowerUp(power_up) => Resolution::PickUp(power_up),
        k if k.is_platform() && can_land(player, bounds, land_tolerance) => Resolution::Land,
        k if player.has_power_up(PowerUpKind::Shield) => Resolution::ShieldAbsorb {
            destroy: k == EntityKind::Spike,
        },
        _ => Resolution::Fatal,
    }
}

/// Whether a collectible is inside the magnet's reach from `center`
#[inline]
pub fn within_magnet(center: Vec2, bounds: &Aabb, radius: f32) -> bool {
    center.distance_squared(bounds.center()) <= radius * radius
}
