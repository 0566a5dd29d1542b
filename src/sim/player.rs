//! Player physics
//!
//! Integrates the single player in screen space (y grows downward) once per
//! tick. Velocities are in units per nominal frame, so `dt` is a frame count
//! rather than seconds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::state::{ActivePowerUp, PowerUpKind};
use crate::snap_quarter_turn;
use crate::tuning::PhysicsTuning;

/// Result of a jump request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JumpOutcome {
    pub success: bool,
    /// First jump off a surface (full force, lighter feedback)
    pub initial: bool,
}

/// Kinematic state of the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub grounded: bool,
    pub size: Vec2,
    pub jumps_remaining: u8,
    /// At most one entry per kind
    pub power_ups: Vec<ActivePowerUp>,
}

impl PlayerState {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn has_power_up(&self, kind: PowerUpKind) -> bool {
        self.power_ups.iter().any(|p| p.kind == kind)
    }
}

/// Owns the player state and the constants that drive it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPhysics {
    pub state: PlayerState,
    tuning: PhysicsTuning,
}

impl PlayerPhysics {
    pub fn new(tuning: PhysicsTuning, x: f32, y: f32) -> Self {
        let mut physics = Self {
            state: PlayerState {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
                rotation: 0.0,
                grounded: false,
                size: Vec2::splat(tuning.player_size),
                jumps_remaining: tuning.max_jumps,
                power_ups: Vec::new(),
            },
            tuning,
        };
        physics.reset(x, y);
        physics
    }

    /// Put the player back at a spawn point with full charges and no effects
    pub fn reset(&mut self, x: f32, y: f32) {
        self.state = PlayerState {
            pos: Vec2::new(x, y),
            vel: Vec2::new(self.tuning.base_speed, 0.0),
            rotation: 0.0,
            grounded: false,
            size: Vec2::splat(self.tuning.player_size),
            jumps_remaining: self.tuning.max_jumps,
            power_ups: Vec::new(),
        };
    }

    /// Spend a jump charge if one is left
    pub fn jump(&mut self) -> JumpOutcome {
        let p = &mut self.state;
        if p.jumps_remaining == 0 {
            return JumpOutcome::default();
        }
        let initial = p.jumps_remaining == self.tuning.max_jumps;
        p.vel.y = if initial {
            self.tuning.jump_force
        } else {
            self.tuning.double_jump_force
        };
        p.jumps_remaining -= 1;
        p.grounded = false;
        JumpOutcome {
            success: true,
            initial,
        }
    }

    /// Advance one tick. Returns true if any power-up expired.
    pub fn update(&mut self, dt: f32, target_speed: f32, ground_y: f32, now_ms: f64) -> bool {
        let before = self.state.power_ups.len();
        self.state.power_ups.retain(|p| p.expires_at > now_ms);
        let expired = self.state.power_ups.len() != before;

        let effective_speed = self.effective_speed(target_speed);
        let p = &mut self.state;

        // Horizontal speed is imposed, not accumulated
        p.vel.x = effective_speed;
        p.pos.x += p.vel.x * dt;

        p.vel.y += self.tuning.gravity * dt;
        p.pos.y += p.vel.y * dt;

        if p.pos.y + p.size.y > ground_y {
            p.pos.y = ground_y - p.size.y;
            self.settle();
        } else {
            let p = &mut self.state;
            p.grounded = false;
            // Spin faster at higher speed tiers
            let spin = effective_speed / self.tuning.base_speed;
            p.rotation += self.tuning.rotation_speed * spin * dt;
        }

        expired
    }

    /// Land on a platform whose top edge is at `platform_top` (screen space).
    ///
    /// Only a falling or resting player lands; a rising one passes through.
    pub fn land_on_platform(&mut self, platform_top: f32) -> bool {
        if self.state.vel.y < 0.0 {
            return false;
        }
        self.state.pos.y = platform_top - self.state.size.y;
        self.settle();
        true
    }

    /// Grant a power-up, refreshing its expiry if already active
    pub fn add_power_up(&mut self, kind: PowerUpKind, now_ms: f64) {
        let expires_at = now_ms + self.tuning.power_up_duration_ms;
        match self.state.power_ups.iter_mut().find(|p| p.kind == kind) {
            Some(existing) => existing.expires_at = existing.expires_at.max(expires_at),
            None => self.state.power_ups.push(ActivePowerUp { kind, expires_at }),
        }
    }

    /// Drop a power-up. Returns true if it was active.
    pub fn remove_power_up(&mut self, kind: PowerUpKind) -> bool {
        let before = self.state.power_ups.len();
        self.state.power_ups.retain(|p| p.kind != kind);
        self.state.power_ups.len() != before
    }

    /// Horizontal speed after slow-motion
    pub fn effective_speed(&self, target_speed: f32) -> f32 {
        if self.state.has_power_up(PowerUpKind::SlowMo) {
            target_speed * self.tuning.slow_mo_factor
        } else {
            target_speed
        }
    }

    fn settle(&mut self) {
        let p = &mut self.state;
        p.vel.y = 0.0;
        p.grounded = true;
        p.jumps_remaining = self.tuning.max_jumps;
        p.rotation = snap_quarter_turn(p.rotation);
    }
}
