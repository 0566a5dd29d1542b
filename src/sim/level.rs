//! Procedural level generation
//!
//! A cursor walks from [`LEVEL_START_X`] to the requested length, emitting one
//! obstacle pattern per step followed by a gap. Difficulty rises linearly with
//! distance and saturates at [`FULL_DIFFICULTY_X`]: clusters grow, bridges get
//! longer and the gaps between patterns tighten.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Entity, EntityKind, Oscillation, PowerUpKind};

/// World x of the first pattern
pub const LEVEL_START_X: f32 = 1500.0;
/// Distance at which difficulty saturates
pub const FULL_DIFFICULTY_X: f32 = 100_000.0;
/// Widest pattern (a four-segment bridge)
pub const MAX_PATTERN_WIDTH: f32 = 400.0;
/// Widest inter-pattern gap
pub const MAX_GAP: f32 = 700.0;
/// Bound on how far past the requested length entities may be placed
pub const LEVEL_TAIL_MARGIN: f32 = MAX_PATTERN_WIDTH + MAX_GAP;
/// Longest level the generator will build; longer requests are clamped
pub const MAX_LEVEL_LENGTH: f32 = 10_000_000.0;

const SPIKE_SIZE: Vec2 = Vec2::new(40.0, 40.0);
const CORE_SIZE: Vec2 = Vec2::new(24.0, 24.0);
const POWER_UP_SIZE: Vec2 = Vec2::new(36.0, 36.0);
const GATE_WIDTH: f32 = 60.0;
const GATE_TOP_HEIGHT: f32 = 400.0;
const BRIDGE_STRIDE: f32 = 100.0;
const BRIDGE_SEGMENT: Vec2 = Vec2::new(95.0, 40.0);
const PLATFORM_THICKNESS: f32 = 40.0;
const CORE_SPACING: f32 = 60.0;

/// Obstacle pattern categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    SpikeCluster,
    GatedCorridor,
    MovingPlatform,
    DestructibleBridge,
    AerialSpikes,
}

impl Pattern {
    /// Pick a pattern from a uniform roll in [0, 1)
    pub fn from_roll(roll: f32) -> Self {
        match roll {
            r if r < 0.2 => Pattern::SpikeCluster,
            r if r < 0.4 => Pattern::GatedCorridor,
            r if r < 0.6 => Pattern::MovingPlatform,
            r if r < 0.8 => Pattern::DestructibleBridge,
            _ => Pattern::AerialSpikes,
        }
    }
}

/// Difficulty in [0, 1] for a cursor position
#[inline]
pub fn difficulty_at(x: f32) -> f32 {
    (x / FULL_DIFFICULTY_X).clamp(0.0, 1.0)
}

/// Number of spikes in a cluster at the given difficulty
pub fn spike_cluster_size(difficulty: f32) -> u32 {
    if difficulty > 0.6 {
        3
    } else if difficulty > 0.3 {
        2
    } else {
        1
    }
}

/// Emits entities with sequential ids
struct Builder {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Builder {
    fn push(&mut self, kind: EntityKind, x: f32, y: f32, size: Vec2) -> &mut Entity {
        let id = self.next_id;
        self.next_id += 1;
        let index = self.entities.len();
        self.entities.push(Entity::new(id, kind, Vec2::new(x, y), size));
        &mut self.entities[index]
    }
}

/// Generate a level spanning `total_length` world units.
///
/// The result is sorted by x (stable, so entities sharing an x keep their
/// emission order). Every entity lies in
/// `[LEVEL_START_X, total_length + LEVEL_TAIL_MARGIN)`, with `total_length`
/// capped at [`MAX_LEVEL_LENGTH`].
pub fn generate_level<R: Rng + ?Sized>(total_length: f32, rng: &mut R) -> Vec<Entity> {
    let mut b = Builder {
        entities: Vec::new(),
        next_id: 1,
    };
    if total_length > MAX_LEVEL_LENGTH {
        log::warn!("Level length {total_length} exceeds {MAX_LEVEL_LENGTH}, clamping");
    }
    // f64 so the cursor keeps advancing long after f32 would stall
    let total_length = f64::from(total_length.min(MAX_LEVEL_LENGTH));
    let mut cursor = f64::from(LEVEL_START_X);

    while cursor < total_length {
        let start = cursor;
        let x = cursor as f32;
        let difficulty = difficulty_at(x);
        let spacing = 200.0 + (1.0 - difficulty) * 300.0 + rng.random::<f32>() * 200.0;

        // Pickup rolls happen before the pattern; placement waits for its width
        let cores = if rng.random::<f32>() < 0.4 {
            rng.random_range(1..=3u32)
        } else {
            0
        };
        let power_up = if rng.random::<f32>() < 0.05 {
            Some(PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())])
        } else {
            None
        };

        let width = emit_pattern(&mut b, Pattern::from_roll(rng.random()), x, difficulty, rng);
        cursor += f64::from(width);
        let gap_start = cursor as f32;

        // Pickups float in the gap that follows the pattern
        for i in 0..cores {
            let x = gap_start + spacing * 0.3 + i as f32 * CORE_SPACING;
            let y = 60.0 + rng.random::<f32>() * 120.0;
            b.push(EntityKind::Collectible, x, y, CORE_SIZE);
        }
        if let Some(kind) = power_up {
            let y = 120.0 + rng.random::<f32>() * 100.0;
            b.push(EntityKind::PowerUp(kind), gap_start + spacing / 2.0, y, POWER_UP_SIZE);
        }

        cursor += f64::from(spacing);
        debug_assert!(cursor > start, "level cursor must advance");
    }

    let mut entities = b.entities;
    entities.sort_by(|a, b| a.pos.x.total_cmp(&b.pos.x));
    log::debug!(
        "Generated level: length={}, entities={}",
        total_length,
        entities.len()
    );
    entities
}

/// Emit one obstacle pattern at `x`, returning its width
fn emit_pattern<R: Rng + ?Sized>(
    b: &mut Builder,
    pattern: Pattern,
    x: f32,
    difficulty: f32,
    rng: &mut R,
) -> f32 {
    match pattern {
        Pattern::SpikeCluster => {
            let count = spike_cluster_size(difficulty);
            for i in 0..count {
                b.push(EntityKind::Spike, x + i as f32 * SPIKE_SIZE.x, 0.0, SPIKE_SIZE);
            }
            count as f32 * SPIKE_SIZE.x
        }
        Pattern::GatedCorridor => {
            let gap_y = 60.0 + rng.random::<f32>() * 70.0;
            let gap_height = 140.0 + (1.0 - difficulty) * 60.0;
            b.push(
                EntityKind::Block,
                x,
                gap_y + gap_height,
                Vec2::new(GATE_WIDTH, GATE_TOP_HEIGHT),
            );
            b.push(EntityKind::Block, x, 0.0, Vec2::new(GATE_WIDTH, gap_y));
            GATE_WIDTH
        }
        Pattern::MovingPlatform => {
            let width = 120.0 + rng.random::<f32>() * 100.0;
            let height = 80.0 + rng.random::<f32>() * 90.0;
            let osc = Oscillation {
                range: 40.0 + difficulty * 60.0,
                speed: 0.002 + difficulty * 0.002,
                base_y: height,
            };
            b.push(
                EntityKind::MovingBlock,
                x,
                height,
                Vec2::new(width, PLATFORM_THICKNESS),
            )
            .oscillation = Some(osc);
            // Rider sits on the platform and moves with it
            if difficulty > 0.5 && rng.random_bool(0.5) {
                let rider_y = height + PLATFORM_THICKNESS;
                b.push(
                    EntityKind::Spike,
                    x + width / 2.0 - SPIKE_SIZE.x / 2.0,
                    rider_y,
                    SPIKE_SIZE,
                )
                .oscillation = Some(Oscillation {
                    base_y: rider_y,
                    ..osc
                });
            }
            width
        }
        Pattern::DestructibleBridge => {
            let extra = (difficulty * 2.0).round() as u32;
            let segments = 2 + rng.random_range(0..=extra);
            let height = 100.0 + rng.random::<f32>() * 40.0;
            for i in 0..segments {
                b.push(
                    EntityKind::DestructibleBlock,
                    x + i as f32 * BRIDGE_STRIDE,
                    height,
                    BRIDGE_SEGMENT,
                );
            }
            segments as f32 * BRIDGE_STRIDE
        }
        Pattern::AerialSpikes => {
            let drone_y = 140.0 + rng.random::<f32>() * 140.0;
            b.push(EntityKind::Spike, x, drone_y, SPIKE_SIZE);
            if difficulty > 0.7 {
                b.push(EntityKind::Spike, x + 80.0, drone_y - 60.0, SPIKE_SIZE);
            }
            120.0
        }
    }
}

/// The live entity collection of a run, windowed around the camera.
///
/// Entities stay in x order. Anything that falls behind the window is
/// dropped for good since the player only moves forward.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    pub entities: Vec<Entity>,
    /// Entities discarded behind the window so far
    pub discarded: usize,
}

impl Level {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            entities,
            discarded: 0,
        }
    }

    pub fn generate<R: Rng + ?Sized>(total_length: f32, rng: &mut R) -> Self {
        Self::new(generate_level(total_length, rng))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop entities left of `min_x` and return the index range of entities
    /// whose x lies in `[min_x, max_x]`.
    pub fn window(&mut self, min_x: f32, max_x: f32) -> std::ops::Range<usize> {
        let behind = self.entities.partition_point(|e| e.pos.x < min_x);
        if behind > 0 {
            self.entities.drain(..behind);
            self.discarded += behind;
        }
        let end = self.entities.partition_point(|e| e.pos.x <= max_x);
        0..end
    }

    /// Remove one entity, preserving order
    pub fn remove(&mut self, index: usize) -> Entity {
        self.entities.remove(index)
    }
}
