//! Data-driven game balance
//!
//! Every constant the simulation consumes lives here so it can be tuned
//! without recompiling. Missing fields fall back to the defaults in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Player physics parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    pub jump_force: f32,
    pub double_jump_force: f32,
    pub max_jumps: u8,
    pub rotation_speed: f32,
    pub player_size: f32,
    pub base_speed: f32,
    pub slow_mo_factor: f32,
    /// Power-up lifetime (ms)
    pub power_up_duration_ms: f64,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            double_jump_force: DOUBLE_JUMP_FORCE,
            max_jumps: MAX_JUMPS,
            rotation_speed: ROTATION_SPEED,
            player_size: PLAYER_SIZE,
            base_speed: BASE_SPEED,
            slow_mo_factor: SLOW_MO_FACTOR,
            power_up_duration_ms: POWER_UP_DURATION_MS,
        }
    }
}

/// Complete tuning table for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub max_speed: f32,
    pub speed_increment: f32,
    pub magnet_radius: f32,
    pub ground_y: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub player_left_offset: f32,
    pub frame_ms: f64,
    pub max_frame_ms: f64,
    pub window_behind: f32,
    pub window_ahead: f32,
    pub land_tolerance: f32,
    pub death_duration_ms: f64,
    pub crumble_delay_ms: f64,
    pub level_length: f32,
    pub score_divisor: f32,
    pub tier_step: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            physics: PhysicsTuning::default(),
            max_speed: MAX_SPEED,
            speed_increment: SPEED_INCREMENT,
            magnet_radius: MAGNET_RADIUS,
            ground_y: GROUND_Y,
            spawn_x: SPAWN_X,
            spawn_y: SPAWN_Y,
            player_left_offset: PLAYER_LEFT_OFFSET,
            frame_ms: FRAME_MS,
            max_frame_ms: MAX_FRAME_MS,
            window_behind: WINDOW_BEHIND,
            window_ahead: WINDOW_AHEAD,
            land_tolerance: LAND_TOLERANCE,
            death_duration_ms: DEATH_DURATION_MS,
            crumble_delay_ms: CRUMBLE_DELAY_MS,
            level_length: LEVEL_LENGTH,
            score_divisor: SCORE_DIVISOR,
            tier_step: TIER_STEP,
        }
    }
}

impl Tuning {
    /// Environment variable naming an optional tuning file
    pub const ENV_VAR: &'static str = "NEON_GLIDE_TUNING";

    /// Parse a tuning table from JSON (absent fields take their defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file, falling back to defaults if the file is
    /// missing or unparseable.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Load tuning from the file named by `NEON_GLIDE_TUNING`, if set
    pub fn from_env() -> Self {
        match std::env::var(Self::ENV_VAR) {
            Ok(path) => Self::load(path),
            Err(_) => Self::default(),
        }
    }

    /// Horizontal speed for a given score
    pub fn target_speed(&self, score: u64) -> f32 {
        (self.physics.base_speed + score as f32 * self.speed_increment).min(self.max_speed)
    }

    /// Speed tier for a given score (1-based)
    pub fn speed_tier(&self, score: u64) -> u32 {
        (score / self.tier_step.max(1)) as u32 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_speed": 30.0, "physics": { "max_jumps": 2 } }"#)
            .unwrap();
        assert_eq!(tuning.max_speed, 30.0);
        assert_eq!(tuning.physics.max_jumps, 2);
        assert_eq!(tuning.physics.gravity, GRAVITY);
        assert_eq!(tuning.ground_y, GROUND_Y);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load("/definitely/not/a/tuning.json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_target_speed_scales_and_caps() {
        let tuning = Tuning::default();
        assert_eq!(tuning.target_speed(0), BASE_SPEED);
        assert!((tuning.target_speed(1000) - 11.0).abs() < 1e-4);
        assert_eq!(tuning.target_speed(1_000_000), MAX_SPEED);
    }

    #[test]
    fn test_speed_tier() {
        let tuning = Tuning::default();
        assert_eq!(tuning.speed_tier(0), 1);
        assert_eq!(tuning.speed_tier(499), 1);
        assert_eq!(tuning.speed_tier(500), 2);
        assert_eq!(tuning.speed_tier(2600), 6);
    }
}
