//! Run state and core simulation types
//!
//! Everything a run owns lives here: the placed entities, the run counters,
//! the events queued for collaborators, and the cosmetic particle pool.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::level::Level;
use super::player::PlayerPhysics;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Player is alive and the world scrolls
    Playing,
    /// Death animation window, player frozen
    Dying,
    /// Run ended and reported
    Over,
}

/// Time-limited power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Magnet,
    Shield,
    SlowMo,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Magnet, PowerUpKind::Shield, PowerUpKind::SlowMo];
}

/// Entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Spike,
    Block,
    MovingBlock,
    DestructibleBlock,
    Collectible,
    PowerUp(PowerUpKind),
}

impl EntityKind {
    /// Kinds the player can land on
    pub fn is_platform(&self) -> bool {
        matches!(
            self,
            EntityKind::Block | EntityKind::MovingBlock | EntityKind::DestructibleBlock
        )
    }

    /// Display color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            EntityKind::Spike => 0xff0055,
            EntityKind::Block => 0x1e293b,
            EntityKind::MovingBlock => 0x334155,
            EntityKind::DestructibleBlock => 0x475569,
            EntityKind::Collectible => 0x00f2ff,
            EntityKind::PowerUp(PowerUpKind::Magnet) => 0x38bdf8,
            EntityKind::PowerUp(PowerUpKind::Shield) => 0xfacc15,
            EntityKind::PowerUp(PowerUpKind::SlowMo) => 0xdb2777,
        }
    }
}

/// Vertical oscillation of a moving block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    /// Peak offset from the baseline
    pub range: f32,
    /// Angular speed (radians per ms)
    pub speed: f32,
    /// Height above the floor at rest
    pub base_y: f32,
}

/// A placed object in world space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// World x and height above the floor
    pub pos: Vec2,
    pub size: Vec2,
    pub color: u32,
    #[serde(default)]
    pub oscillation: Option<Oscillation>,
    /// Run clock (ms) at which a destructible block was stepped on
    #[serde(default)]
    pub destroyed_at: Option<f64>,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            color: kind.color(),
            oscillation: None,
            destroyed_at: None,
        }
    }

    pub fn with_oscillation(mut self, oscillation: Oscillation) -> Self {
        self.oscillation = Some(oscillation);
        self
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed_at.is_some()
    }

    /// Height above the floor at the given run time
    pub fn y_at(&self, time_ms: f64) -> f32 {
        match self.oscillation {
            Some(osc) => {
                // Phase in f64: run clocks grow large
                let phase = (time_ms * f64::from(osc.speed)).sin() as f32;
                osc.base_y + phase * osc.range
            }
            None => self.pos.y,
        }
    }

    /// Screen-space box at the given run time
    pub fn bounds(&self, ground_y: f32, time_ms: f64) -> Aabb {
        Aabb::from_ground(self.pos.x, self.y_at(time_ms), self.size, ground_y)
    }

    /// Whether this entity still takes part in collision
    pub fn is_solid(&self, time_ms: f64, crumble_delay_ms: f64) -> bool {
        match self.destroyed_at {
            Some(at) => time_ms - at < crumble_delay_ms,
            None => true,
        }
    }
}

/// Active power-up effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    /// Run clock (ms) at which the effect ends
    pub expires_at: f64,
}

/// Cosmetic particle styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Spark,
    Sparkle,
    Shockwave,
    Electric,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32, // 0-1, decreases over time
    pub kind: ParticleKind,
}

impl Particle {
    /// Fade rate per nominal frame
    pub fn decay(&self) -> f32 {
        match self.kind {
            ParticleKind::Electric => 0.03,
            _ => 0.015,
        }
    }
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 512;

/// Player glow color (0xRRGGBB)
pub const PLAYER_COLOR: u32 = 0x00f2ff;

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// RNG for level generation
    pub fn level_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }

    /// RNG for cosmetic effects, independent of the level stream
    pub fn effects_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream.wrapping_add(0xda3e_39cb_94b9_5bdb) | 1)
    }
}

/// What the player came to rest on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Ground,
    Platform { id: u32 },
}

/// Discrete notifications emitted by a tick, drained by the driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { initial: bool },
    Collected { id: u32, pos: Vec2, total: u32, magnetized: bool },
    PowerUpPicked { kind: PowerUpKind, pos: Vec2 },
    PowerUpsChanged { active: Vec<ActivePowerUp> },
    ShieldAbsorbed { destroyed_hazard: bool },
    Landed { on: Surface },
    Died { pos: Vec2 },
    ScoreChanged { score: u64, tier: u32 },
    GameOver { score: u64, collected: u32 },
}

/// Per-run counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    /// Monotonic score derived from distance
    pub score: u64,
    /// Collectibles picked up this run
    pub collected: u32,
    pub speed_tier: u32,
    /// World x of the camera's left edge
    pub camera_x: f32,
    /// Run clock (ms) when the death sequence began
    pub death_started_at: Option<f64>,
    /// Surface the player is riding; survives brief gaps above a sinking platform
    #[serde(default)]
    pub support: Option<Surface>,
    /// Run clock (ms) of the current tick
    pub clock_ms: f64,
    /// Timestamp of the previous tick, `None` before the first tick
    pub last_frame_ms: Option<f64>,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            phase: RunPhase::Playing,
            score: 0,
            collected: 0,
            speed_tier: 1,
            camera_x: 0.0,
            death_started_at: None,
            support: None,
            clock_ms: 0.0,
            last_frame_ms: None,
        }
    }
}

/// Everything one run owns: created fresh at start, discarded at reset
#[derive(Debug, Clone)]
pub struct Run {
    /// Run seed for reproducibility
    pub rng_state: RngState,
    pub tuning: Tuning,
    pub level: Level,
    pub player: PlayerPhysics,
    pub state: RunState,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    effects_rng: Pcg32,
}

impl Run {
    /// Generate a level and spawn the player
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let rng_state = RngState::new(seed);
        let level = Level::generate(tuning.level_length, &mut rng_state.level_rng());
        Self::with_level(rng_state, tuning, level)
    }

    /// Start a run on a prepared level
    pub fn with_level(rng_state: RngState, tuning: Tuning, level: Level) -> Self {
        let player = PlayerPhysics::new(tuning.physics, tuning.spawn_x, tuning.spawn_y);
        log::info!(
            "Run started: seed={}, entities={}",
            rng_state.seed,
            level.len()
        );
        Self {
            effects_rng: rng_state.effects_rng(),
            rng_state,
            tuning,
            level,
            player,
            state: RunState::default(),
            particles: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == RunPhase::Over
    }

    /// Take the events queued by previous ticks
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn effects_rng(&mut self) -> &mut Pcg32 {
        &mut self.effects_rng
    }
}
