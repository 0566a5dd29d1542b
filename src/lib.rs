//! Neon Glide - An endless-runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level generation, physics, collisions, run state)
//! - `driver`: Frame scheduling and collaborator dispatch
//! - `audio`: Event-driven audio cues
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod driver;
pub mod sim;
pub mod tuning;

pub use audio::{AudioManager, SoundEffect};
pub use driver::{Driver, FeedbackSink, FrameOutcome, RunObserver};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frame duration in ms (dt == 1.0 at this rate)
    pub const FRAME_MS: f64 = 16.66;
    /// Largest frame delta fed into the integrator (ms)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Downward acceleration per nominal frame (screen space, y grows down)
    pub const GRAVITY: f32 = 0.85;
    /// Vertical velocity of the first jump from the ground
    pub const JUMP_FORCE: f32 = -13.0;
    /// Vertical velocity of every air jump
    pub const DOUBLE_JUMP_FORCE: f32 = -11.0;
    pub const MAX_JUMPS: u8 = 3;
    /// Airborne spin per nominal frame at base speed (radians)
    pub const ROTATION_SPEED: f32 = 0.1;
    pub const PLAYER_SIZE: f32 = 40.0;

    /// Horizontal speed (units per nominal frame)
    pub const BASE_SPEED: f32 = 8.0;
    pub const MAX_SPEED: f32 = 25.0;
    /// Speed gained per score point
    pub const SPEED_INCREMENT: f32 = 0.003;

    pub const SLOW_MO_FACTOR: f32 = 0.5;
    /// Power-up lifetime (ms)
    pub const POWER_UP_DURATION_MS: f64 = 8000.0;
    pub const MAGNET_RADIUS: f32 = 300.0;

    /// Screen-space y of the ground line
    pub const GROUND_Y: f32 = 450.0;
    /// Player spawn point
    pub const SPAWN_X: f32 = 100.0;
    pub const SPAWN_Y: f32 = 300.0;
    /// Fixed screen distance between the camera's left edge and the player
    pub const PLAYER_LEFT_OFFSET: f32 = 80.0;

    /// Collision window relative to the camera
    pub const WINDOW_BEHIND: f32 = 500.0;
    pub const WINDOW_AHEAD: f32 = 3000.0;
    /// How far below a platform top the player's feet may be and still land
    pub const LAND_TOLERANCE: f32 = 25.0;

    /// Death animation window before the run is reported over (ms)
    pub const DEATH_DURATION_MS: f64 = 1000.0;
    /// Destructible blocks stay solid this long after being stepped on (ms)
    pub const CRUMBLE_DELAY_MS: f64 = 400.0;

    pub const LEVEL_LENGTH: f32 = 500_000.0;
    /// World units per score point
    pub const SCORE_DIVISOR: f32 = 10.0;
    /// Score points per speed tier
    pub const TIER_STEP: u64 = 500;
}

/// Snap an angle to the nearest quarter turn
#[inline]
pub fn snap_quarter_turn(angle: f32) -> f32 {
    use std::f32::consts::FRAC_PI_2;
    (angle / FRAC_PI_2).round() * FRAC_PI_2
}

/// Clamp a frame delta and normalize it to nominal frame units
#[inline]
pub fn normalize_frame_delta(elapsed_ms: f64, max_frame_ms: f64, frame_ms: f64) -> f32 {
    (elapsed_ms.clamp(0.0, max_frame_ms) / frame_ms) as f32
}
