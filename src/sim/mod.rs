//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, tuning and frame
//! timestamps, a run plays out identically:
//! - Seeded RNG only (level and effects draw from separate streams)
//! - Entities scanned in x order
//! - No rendering, audio or platform dependencies

pub mod aabb;
pub mod collision;
pub mod level;
pub mod player;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use collision::{Resolution, can_land, resolve, within_magnet};
pub use level::{
    LEVEL_START_X, LEVEL_TAIL_MARGIN, Level, MAX_LEVEL_LENGTH, Pattern, generate_level,
};
pub use player::{JumpOutcome, PlayerPhysics, PlayerState};
pub use state::{
    ActivePowerUp, Entity, EntityKind, GameEvent, Oscillation, Particle, ParticleKind,
    PowerUpKind, RngState, Run, RunPhase, RunState, Surface,
};
pub use tick::{TickInput, tick};
