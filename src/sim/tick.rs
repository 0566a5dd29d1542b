//! Per-frame simulation tick
//!
//! Core run loop: integrates the player, scans the collision window, applies
//! the resolution policy and sequences death.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Resolution, resolve, within_magnet};
use super::state::{
    EntityKind, GameEvent, MAX_PARTICLES, PLAYER_COLOR, Particle, ParticleKind, PowerUpKind, Run,
    RunPhase, Surface,
};
use crate::normalize_frame_delta;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Jump pressed since the previous tick (space/up/W/pointer)
    pub jump: bool,
}

/// What the collision pass ran into
#[derive(Debug, Default)]
struct ScanOutcome {
    fatal: bool,
    landed_on: Option<u32>,
}

/// Advance the run to `now_ms` (monotonic clock, milliseconds)
pub fn tick(run: &mut Run, input: &TickInput, now_ms: f64) {
    if run.state.phase == RunPhase::Over {
        return;
    }

    let dt = match run.state.last_frame_ms {
        Some(last) => normalize_frame_delta(
            now_ms - last,
            run.tuning.max_frame_ms,
            run.tuning.frame_ms,
        ),
        None => 0.0,
    };
    run.state.last_frame_ms = Some(now_ms);
    run.state.clock_ms = now_ms;

    match run.state.phase {
        RunPhase::Playing => tick_playing(run, input, dt, now_ms),
        RunPhase::Dying => tick_dying(run, dt, now_ms),
        RunPhase::Over => {}
    }
}

fn tick_playing(run: &mut Run, input: &TickInput, dt: f32, now_ms: f64) {
    if input.jump {
        let outcome = run.player.jump();
        if outcome.success {
            run.state.support = None;
            run.events.push(GameEvent::Jumped {
                initial: outcome.initial,
            });
            spawn_jump_particles(run, outcome.initial);
        }
    }

    let was_grounded = run.player.state.grounded;
    let target_speed = run.tuning.target_speed(run.state.score);
    let expired = run
        .player
        .update(dt, target_speed, run.tuning.ground_y, now_ms);
    if expired {
        push_power_ups(run);
    }

    run.state.camera_x = run.player.state.pos.x - run.tuning.player_left_offset;
    update_particles(run, dt);

    let scan = scan_collisions(run, now_ms);
    if scan.fatal {
        begin_death(run, now_ms);
        return;
    }

    if run.player.state.grounded {
        let on = match scan.landed_on {
            Some(id) => Surface::Platform { id },
            None => Surface::Ground,
        };
        // Re-touching the platform being ridden is not a new landing
        if !was_grounded && run.state.support != Some(on) {
            run.events.push(GameEvent::Landed { on });
        }
        run.state.support = Some(on);
    } else if !still_riding(run, now_ms) {
        run.state.support = None;
    }

    let score = (run.player.state.pos.x / run.tuning.score_divisor).floor().max(0.0) as u64;
    if score > run.state.score {
        run.state.score = score;
        run.state.speed_tier = run.tuning.speed_tier(score);
        run.events.push(GameEvent::ScoreChanged {
            score,
            tier: run.state.speed_tier,
        });
    }
}

fn tick_dying(run: &mut Run, dt: f32, now_ms: f64) {
    update_particles(run, dt);

    let Some(started) = run.state.death_started_at else {
        return;
    };
    if now_ms - started >= run.tuning.death_duration_ms {
        run.state.phase = RunPhase::Over;
        log::info!(
            "Run over: score={}, collected={}",
            run.state.score,
            run.state.collected
        );
        run.events.push(GameEvent::GameOver {
            score: run.state.score,
            collected: run.state.collected,
        });
    }
}

/// Test the player against every entity in the collision window, in x order
fn scan_collisions(run: &mut Run, now_ms: f64) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    let camera = run.state.camera_x;
    let range = run.level.window(
        camera - run.tuning.window_behind,
        camera + run.tuning.window_ahead,
    );
    let ground_y = run.tuning.ground_y;
    let magnet = run.player.state.has_power_up(PowerUpKind::Magnet);

    let mut i = range.start;
    let mut end = range.end;
    while i < end {
        let entity = &run.level.entities[i];
        if !entity.is_solid(now_ms, run.tuning.crumble_delay_ms) {
            i += 1;
            continue;
        }
        let kind = entity.kind;
        let id = entity.id;
        let bounds = entity.bounds(ground_y, now_ms);

        // Landing moves the player, so re-read the box for every entity
        let player = &run.player.state;
        let touching = player.bounds().overlaps(&bounds);
        let magnetized = !touching
            && magnet
            && kind == EntityKind::Collectible
            && within_magnet(player.center(), &bounds, run.tuning.magnet_radius);
        if !touching && !magnetized {
            i += 1;
            continue;
        }

        match resolve(kind, &bounds, player, run.tuning.land_tolerance) {
            Resolution::Collect => {
                run.level.remove(i);
                end -= 1;
                run.state.collected += 1;
                log::debug!("Collected core {id} (total {})", run.state.collected);
                run.events.push(GameEvent::Collected {
                    id,
                    pos: bounds.center(),
                    total: run.state.collected,
                    magnetized,
                });
                spawn_burst(run, bounds.center(), kind.color());
            }
            Resolution::PickUp(power_up) => {
                run.level.remove(i);
                end -= 1;
                run.player.add_power_up(power_up, now_ms);
                log::debug!("Picked up {power_up:?}");
                run.events.push(GameEvent::PowerUpPicked {
                    kind: power_up,
                    pos: bounds.center(),
                });
                push_power_ups(run);
                spawn_burst(run, bounds.center(), kind.color());
            }
            Resolution::Land => {
                if run.player.land_on_platform(bounds.top()) {
                    outcome.landed_on = Some(id);
                    let entity = &mut run.level.entities[i];
                    if kind == EntityKind::DestructibleBlock && entity.destroyed_at.is_none() {
                        entity.destroyed_at = Some(now_ms);
                    }
                }
                i += 1;
            }
            Resolution::ShieldAbsorb { destroy } => {
                run.player.remove_power_up(PowerUpKind::Shield);
                log::debug!("Shield absorbed hit on {kind:?} {id}");
                run.events.push(GameEvent::ShieldAbsorbed {
                    destroyed_hazard: destroy,
                });
                push_power_ups(run);
                if destroy {
                    run.level.remove(i);
                    end -= 1;
                } else {
                    i += 1;
                }
            }
            Resolution::Fatal => {
                outcome.fatal = true;
                break;
            }
        }
    }

    outcome
}

/// Whether an airborne player is still just above the platform it rode
fn still_riding(run: &Run, now_ms: f64) -> bool {
    let Some(Surface::Platform { id }) = run.state.support else {
        return false;
    };
    let Some(platform) = run.level.entities.iter().find(|e| e.id == id) else {
        return false;
    };
    if !platform.is_solid(now_ms, run.tuning.crumble_delay_ms) {
        return false;
    }
    let bounds = platform.bounds(run.tuning.ground_y, now_ms);
    let player = run.player.state.bounds();
    player.right() > bounds.left()
        && player.left() < bounds.right()
        && bounds.top() - player.bottom() <= run.tuning.land_tolerance
}

fn begin_death(run: &mut Run, now_ms: f64) {
    run.state.phase = RunPhase::Dying;
    run.state.death_started_at = Some(now_ms);
    let center = run.player.state.center();
    log::info!(
        "Player died at x={:.0} (score {})",
        run.player.state.pos.x,
        run.state.score
    );
    run.events.push(GameEvent::Died { pos: center });

    for _ in 0..30 {
        let rng = run.effects_rng();
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 20.0,
            (rng.random::<f32>() - 0.5) * 20.0,
        );
        push_particle(run, center, vel, PLAYER_COLOR, 1.0, ParticleKind::Spark);
    }
}

fn push_power_ups(run: &mut Run) {
    run.events.push(GameEvent::PowerUpsChanged {
        active: run.player.state.power_ups.clone(),
    });
}

fn spawn_jump_particles(run: &mut Run, initial: bool) {
    let center = run.player.state.center();
    if initial {
        for _ in 0..8 {
            let rng = run.effects_rng();
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * 8.0,
                (rng.random::<f32>() - 0.5) * 8.0,
            );
            push_particle(run, center, vel, PLAYER_COLOR, 0.8, ParticleKind::Spark);
        }
    } else {
        for _ in 0..15 {
            let rng = run.effects_rng();
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * 15.0,
                (rng.random::<f32>() - 0.5) * 15.0,
            );
            push_particle(run, center, vel, 0xffffff, 0.7, ParticleKind::Sparkle);
        }
        push_particle(run, center, Vec2::ZERO, PLAYER_COLOR, 0.5, ParticleKind::Shockwave);
    }
}

/// Burst scaled by speed tier
fn spawn_burst(run: &mut Run, pos: Vec2, color: u32) {
    let tier = run.state.speed_tier as f32;
    let count = 10 + run.state.speed_tier as usize * 5;
    let spread = 5.0 + tier * 2.0;
    for _ in 0..count {
        let rng = run.effects_rng();
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed = (0.5 + rng.random::<f32>()) * spread;
        let life = 0.6 + rng.random::<f32>() * 0.4;
        let tint = if rng.random::<f32>() > 0.4 { color } else { 0xffffff };
        let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
        push_particle(run, pos, vel, tint, life, ParticleKind::Electric);
    }
}

fn push_particle(run: &mut Run, pos: Vec2, vel: Vec2, color: u32, life: f32, kind: ParticleKind) {
    if run.particles.len() >= MAX_PARTICLES {
        run.particles.remove(0);
    }
    run.particles.push(Particle {
        pos,
        vel,
        color,
        life,
        kind,
    });
}

fn update_particles(run: &mut Run, dt: f32) {
    for particle in run.particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.life -= particle.decay() * dt;
    }
    run.particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::level::Level;
    use crate::sim::state::{Entity, Oscillation, RngState};
    use crate::tuning::Tuning;

    const GROUND: f32 = GROUND_Y;

    /// A run on a hand-built level
    fn run_with(entities: Vec<Entity>) -> Run {
        Run::with_level(RngState::new(1), Tuning::default(), Level::new(entities))
    }

    /// A run whose player has settled on the ground at x=100
    fn grounded_run(entities: Vec<Entity>) -> Run {
        let mut run = run_with(entities);
        run.player.state.pos.y = GROUND - PLAYER_SIZE;
        run.player.state.grounded = true;
        tick(&mut run, &TickInput::default(), 0.0);
        run.events.clear();
        run
    }

    fn entity(id: u32, kind: EntityKind, x: f32, y: f32, w: f32, h: f32) -> Entity {
        Entity::new(id, kind, Vec2::new(x, y), Vec2::new(w, h))
    }

    fn find(level: &Level, id: u32) -> Option<&Entity> {
        level.entities.iter().find(|e| e.id == id)
    }

    fn count<F: Fn(&GameEvent) -> bool>(run: &Run, f: F) -> usize {
        run.events.iter().filter(|e| f(e)).count()
    }

    #[test]
    fn test_first_tick_has_zero_dt() {
        let mut run = run_with(Vec::new());
        let start = run.player.state.pos;
        tick(&mut run, &TickInput::default(), 5000.0);
        assert_eq!(run.player.state.pos.x, start.x);
        assert_eq!(run.state.last_frame_ms, Some(5000.0));
        assert_eq!(run.state.camera_x, start.x - PLAYER_LEFT_OFFSET);
    }

    #[test]
    fn test_stalled_frame_is_clamped() {
        let mut run = grounded_run(Vec::new());
        let x = run.player.state.pos.x;
        tick(&mut run, &TickInput::default(), 60_000.0);
        let max_step = BASE_SPEED * (MAX_FRAME_MS / FRAME_MS) as f32;
        assert!(run.player.state.pos.x - x <= max_step + 1e-3);
    }

    #[test]
    fn test_collectible_collected_once() {
        // Core overlapping the grounded player's box (x 100..140, y 410..450)
        let core = entity(5, EntityKind::Collectible, 110.0, 10.0, 24.0, 24.0);
        let mut run = grounded_run(vec![core]);
        // grounded_run already ticked once with the core in reach
        assert_eq!(run.state.collected, 1);
        assert!(find(&run.level, 5).is_none());

        run.events.clear();
        tick(&mut run, &TickInput::default(), FRAME_MS);
        assert_eq!(run.state.collected, 1);
        assert_eq!(count(&run, |e| matches!(e, GameEvent::Collected { .. })), 0);
    }

    #[test]
    fn test_collect_event_fires_once_and_scan_continues() {
        let mut run = grounded_run(Vec::new());
        run.level = Level::new(vec![
            entity(1, EntityKind::Collectible, 120.0, 10.0, 24.0, 24.0),
            entity(2, EntityKind::Collectible, 130.0, 10.0, 24.0, 24.0),
        ]);
        tick(&mut run, &TickInput::default(), FRAME_MS);
        assert_eq!(run.state.collected, 2);
        assert!(run.level.is_empty());
        let collected: Vec<u32> = run
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Collected { total, .. } => Some(*total),
                _ => None,
            })
            .collect();
        assert_eq!(collected, vec![1, 2]);
        assert_eq!(run.phase(), RunPhase::Playing);
    }

    #[test]
    fn test_power_up_pickup() {
        let mut run = grounded_run(Vec::new());
        run.level = Level::new(vec![entity(
            3,
            EntityKind::PowerUp(PowerUpKind::Shield),
            120.0,
            0.0,
            36.0,
            36.0,
        )]);
        tick(&mut run, &TickInput::default(), FRAME_MS);
        assert!(run.player.state.has_power_up(PowerUpKind::Shield));
        assert!(run.level.is_empty());
        assert_eq!(count(&run, |e| matches!(e, GameEvent::PowerUpPicked { .. })), 1);
        assert_eq!(count(&run, |e| matches!(e, GameEvent::PowerUpsChanged { .. })), 1);
    }

    #[test]
    fn test_land_on_block() {
        let mut run = run_with(vec![entity(9, EntityKind::Block, 80.0, 100.0, 200.0, 40.0)]);
        // Block top is at 450 - 140 = 310; feet 2 units into it, falling
        run.player.state.pos = Vec2::new(100.0, 310.0 - PLAYER_SIZE + 2.0);
        run.player.state.vel.y = 4.0;
        run.player.state.jumps_remaining = 0;
        tick(&mut run, &TickInput::default(), 0.0);
        assert_eq!(run.phase(), RunPhase::Playing);
        assert!(run.player.state.grounded);
        assert_eq!(run.player.state.jumps_remaining, MAX_JUMPS);
        assert_eq!(run.player.state.pos.y, 310.0 - PLAYER_SIZE);
        assert_eq!(
            count(&run, |e| matches!(e, GameEvent::Landed { on: Surface::Platform { id: 9 } })),
            1
        );
    }

    #[test]
    fn test_standing_on_block_emits_one_landing() {
        let mut run = run_with(vec![entity(9, EntityKind::Block, 80.0, 100.0, 2000.0, 40.0)]);
        run.player.state.pos = Vec2::new(100.0, 310.0 - PLAYER_SIZE + 2.0);
        run.player.state.vel.y = 4.0;
        for frame in 0..20 {
            tick(&mut run, &TickInput::default(), frame as f64 * FRAME_MS);
        }
        assert_eq!(run.phase(), RunPhase::Playing);
        assert_eq!(count(&run, |e| matches!(e, GameEvent::Landed { .. })), 1);
    }

    #[test]
    fn test_riding_sinking_platform_lands_once() {
        let osc = Oscillation {
            range: 100.0,
            speed: 0.004,
            base_y: 100.0,
        };
        let block = entity(3, EntityKind::MovingBlock, 80.0, 100.0, 3000.0, 40.0).with_oscillation(osc);
        let tuning = Tuning {
            window_behind: 5000.0,
            ..Tuning::default()
        };
        let mut run = Run::with_level(RngState::new(1), tuning, Level::new(vec![block]));
        run.player.state.pos = Vec2::new(100.0, 310.0 - PLAYER_SIZE + 2.0);
        run.player.state.vel.y = 4.0;

        let mut now = 0.0;
        while now < 2000.0 {
            tick(&mut run, &TickInput::default(), now);
            now += FRAME_MS;
        }
        assert_eq!(run.phase(), RunPhase::Playing);
        assert_eq!(count(&run, |e| matches!(e, GameEvent::Landed { .. })), 1);
    }

    #[test]
    fn test_landing_again_after_jump_is_reported() {
        let mut run = grounded_run(Vec::new());
        tick(&mut run, &TickInput::default(), FRAME_MS);
        assert_eq!(run.state.support, Some(Surface::Ground));
        run.events.clear();

        let mut now = FRAME_MS * 2.0;
        tick(&mut run, &TickInput { jump: true }, now);
        assert_eq!(run.state.support, None);
        while !run.player.state.grounded {
            now += FRAME_MS;
            tick(&mut run, &TickInput::default(), now);
        }
        assert_eq!(
            count(&run, |e| matches!(e, GameEvent::Landed { on: Surface::Ground })),
            1
        );
    }

    #[test]
    fn test_spike_kills_then_game_over() {
        let mut run = grounded_run(Vec::new());
        run.level = Level::new(vec![entity(4, EntityKind::Spike, 120.0, 0.0, 40.0, 40.0)]);
        tick(&mut run, &TickInput::default(), 1000.0);
        assert_eq!(run.phase(), RunPhase::Dying);
        assert_eq!(run.state.death_started_at, Some(1000.0));
        assert_eq!(count(&run, |e| matches!(e, GameEvent::Died { .. })), 1);
        assert!(!run.particles.is_empty());

        let frozen_x = run.player.state.pos.x;
        let frozen_score = run.state.score;
        tick(&mut run, &TickInput { jump: true }, 1500.0);
        assert_eq!(run.phase(), RunPhase::Dying);
        assert_eq!(run.player.state.pos.x, frozen_x);
        assert_eq!(count(&run, |e| matches!(e, GameEvent::Jumped { .. })), 0);

        tick(&mut run, &TickInput::default(), 2000.0);
        assert_eq!(run.phase(), RunPhase::Over);
        assert!(run.events.contains(&GameEvent::GameOver {
            score: frozen_score,
            collected: 0,
        }));

        // Terminal
        let events = run.events.len();
        tick(&mut run, &TickInput::default(), 5000.0);
        assert_eq!(run.events.len(), events);
    }

    #[test]
    fn test_shield_absorbs_spike() {
        let mut run = grounded_run(Vec::new());
        run.player.add_power_up(PowerUpKind::Shield, 0.0);
        run.level = Level::new(vec![entity(4, EntityKind::Spike, 120.0, 0.0, 40.0, 40.0)]);
        tick(&mut run, &TickInput::default(), FRAME_MS);
        assert_eq!(run.phase(), RunPhase::Playing);
        assert!(!run.player.state.has_power_up(PowerUpKind::Shield));
        assert!(run.level.is_empty());
        assert!(run.events.contains(&GameEvent::ShieldAbsorbed {
            destroyed_hazard: true
        }));
    }

    #[test]
    fn test_shield_spent_on_first_of_two_spikes() {
        let mut run = grounded_run(Vec::new());
        run.player.add_power_up(PowerUpKind::Shield, 0.0);
        run.level = Level::new(vec![
            entity(4, EntityKind::Spike, 110.0, 0.0, 40.0, 40.0),
            entity(5, EntityKind::Spike, 130.0, 0.0, 40.0, 40.0),
        ]);
        tick(&mut run, &TickInput::default(), FRAME_MS);
        assert_eq!(count(&run, |e| matches!(e, GameEvent::ShieldAbsorbed { .. })), 1);
        assert_eq!(run.phase(), RunPhase::Dying);
    }

    #[test]
    fn test_shield_does_not_remove_blocks() {
        let mut run = grounded_run(Vec::new());
        run.player.add_power_up(PowerUpKind::Shield, 0.0);
        // Wall standing on the ground, hit from the side
        run.level = Level::new(vec![entity(6, EntityKind::Block, 130.0, 0.0, 60.0, 100.0)]);
        tick(&mut run, &TickInput::default(), FRAME_MS);
        assert_eq!(run.phase(), RunPhase::Playing);
        assert!(find(&run.level, 6).is_some());
        assert!(run.events.contains(&GameEvent::ShieldAbsorbed {
            destroyed_hazard: false
        }));
    }

    #[test]
    fn test_magnet_pulls_nearby_cores() {
        let mut run = grounded_run(Vec::new());
        run.player.add_power_up(PowerUpKind::Magnet, 0.0);
        run.level = Level::new(vec![
            entity(1, EntityKind::Collectible, 300.0, 60.0, 24.0, 24.0),
            entity(2, EntityKind::Collectible, 1200.0, 60.0, 24.0, 24.0),
        ]);
        tick(&mut run, &TickInput::default(), FRAME_MS);
        assert_eq!(run.state.collected, 1);
        assert!(find(&run.level, 1).is_none());
        assert!(find(&run.level, 2).is_some());
        assert!(run.events.iter().any(|e| matches!(
            e,
            GameEvent::Collected {
                magnetized: true,
                ..
            }
        )));
    }

    #[test]
    fn test_bridge_crumbles_after_landing() {
        let mut run = run_with(vec![entity(
            8,
            EntityKind::DestructibleBlock,
            80.0,
            100.0,
            5000.0,
            40.0,
        )]);
        run.player.state.pos = Vec2::new(100.0, 310.0 - PLAYER_SIZE + 2.0);
        run.player.state.vel.y = 4.0;
        tick(&mut run, &TickInput::default(), 0.0);
        assert_eq!(find(&run.level, 8).and_then(|e| e.destroyed_at), Some(0.0));

        // Keeps standing while the block crumbles, then falls through
        let mut now = 0.0;
        while now < CRUMBLE_DELAY_MS + 100.0 {
            now += FRAME_MS;
            tick(&mut run, &TickInput::default(), now);
        }
        assert_eq!(run.phase(), RunPhase::Playing);
        assert!(run.player.state.pos.y > 310.0 - PLAYER_SIZE);
    }

    #[test]
    fn test_moving_block_uses_current_height() {
        let osc = Oscillation {
            range: 50.0,
            speed: 0.002,
            base_y: 100.0,
        };
        let block = entity(2, EntityKind::MovingBlock, 80.0, 100.0, 300.0, 40.0).with_oscillation(osc);
        let mut run = run_with(vec![block]);
        // At t = quarter period the block is 50 higher: top at 450 - 190 = 260
        let quarter = std::f64::consts::FRAC_PI_2 / 0.002;
        run.player.state.pos = Vec2::new(100.0, 260.0 - PLAYER_SIZE + 2.0);
        run.player.state.vel.y = 4.0;
        tick(&mut run, &TickInput::default(), quarter);
        assert!(run.player.state.grounded);
        assert!((run.player.state.pos.y - (260.0 - PLAYER_SIZE)).abs() < 0.01);
    }

    #[test]
    fn test_jump_input_emits_event() {
        let mut run = grounded_run(Vec::new());
        tick(&mut run, &TickInput { jump: true }, FRAME_MS);
        assert!(run.events.contains(&GameEvent::Jumped { initial: true }));
        assert!(!run.player.state.grounded);
        assert!(run.player.state.vel.y < 0.0);
        assert_eq!(run.player.state.jumps_remaining, MAX_JUMPS - 1);
    }

    #[test]
    fn test_power_up_expiry_reported() {
        let mut run = grounded_run(Vec::new());
        run.player.add_power_up(PowerUpKind::SlowMo, 0.0);
        tick(&mut run, &TickInput::default(), POWER_UP_DURATION_MS + 1.0);
        assert!(run.events.contains(&GameEvent::PowerUpsChanged { active: Vec::new() }));
    }

    #[test]
    fn test_score_and_tier() {
        let mut run = grounded_run(Vec::new());
        run.player.state.pos.x = 5100.0;
        tick(&mut run, &TickInput::default(), FRAME_MS);
        assert!(run.state.score >= 510);
        assert_eq!(run.state.speed_tier, 2);
        assert_eq!(count(&run, |e| matches!(e, GameEvent::ScoreChanged { tier: 2, .. })), 1);
    }

    #[test]
    fn test_entities_far_behind_are_discarded() {
        let mut run = grounded_run(Vec::new());
        run.level = Level::new(vec![
            entity(1, EntityKind::Spike, 0.0, 300.0, 40.0, 40.0),
            entity(2, EntityKind::Spike, 50_000.0, 300.0, 40.0, 40.0),
        ]);
        run.player.state.pos.x = 2000.0;
        tick(&mut run, &TickInput::default(), FRAME_MS);
        assert_eq!(run.level.discarded, 1);
        assert!(find(&run.level, 1).is_none());
        assert!(find(&run.level, 2).is_some());
    }

    #[test]
    fn test_same_seed_same_run() {
        let inputs = [false, true, false, false, true, false, false, false];
        let mut a = Run::new(7, Tuning::default());
        let mut b = Run::new(7, Tuning::default());
        for (frame, &jump) in inputs.iter().cycle().take(400).enumerate() {
            let now = frame as f64 * FRAME_MS;
            tick(&mut a, &TickInput { jump }, now);
            tick(&mut b, &TickInput { jump }, now);
        }
        assert_eq!(a.player.state, b.player.state);
        assert_eq!(a.state.score, b.state.score);
        assert_eq!(a.drain_events(), b.drain_events());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn score_never_decreases(
                seed in 0u64..500,
                jumps in proptest::collection::vec(any::<bool>(), 1..300),
                frame_ms in 1.0f64..120.0,
            ) {
                let mut run = Run::new(seed, Tuning { level_length: 20_000.0, ..Tuning::default() });
                let mut now = 0.0;
                let mut last_score = 0;
                let mut last_x = run.player.state.pos.x;
                for jump in jumps {
                    now += frame_ms;
                    tick(&mut run, &TickInput { jump }, now);
                    prop_assert!(run.player.state.pos.x >= last_x);
                    prop_assert!(run.state.score >= last_score);
                    prop_assert!(run.player.state.jumps_remaining <= MAX_JUMPS);
                    last_score = run.state.score;
                    last_x = run.player.state.pos.x;
                }
            }
        }
    }
}
