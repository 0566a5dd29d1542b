//! Neon Glide entry point
//!
//! Headless runner: plays one seeded run at a fixed 60 Hz with a simple
//! autopilot and logs what happens.
//!
//! Usage: `neon-glide [seed] [--realtime]`

use std::time::{Duration, Instant};

use neon_glide::consts::FRAME_MS;
use neon_glide::sim::{ActivePowerUp, EntityKind, GameEvent, Run, RunPhase};
use neon_glide::{AudioManager, Driver, FeedbackSink, FrameOutcome, RunObserver, Tuning};

/// Frames before a run is abandoned
const MAX_FRAMES: u64 = 60 * 60 * 10;
/// Nominal frames of travel the autopilot looks ahead
const LOOKAHEAD_FRAMES: f32 = 10.0;

/// Logs shell notifications
#[derive(Default)]
struct LogObserver {
    last_logged_score: u64,
}

impl RunObserver for LogObserver {
    fn on_score_update(&mut self, score: u64) {
        if score == 0 || score >= self.last_logged_score + 500 {
            self.last_logged_score = score;
            log::info!("Score {score}");
        }
    }

    fn on_core_collect(&mut self, count: u32) {
        log::debug!("Cores collected: {count}");
    }

    fn on_power_ups_update(&mut self, active: &[ActivePowerUp]) {
        let kinds: Vec<_> = active.iter().map(|p| p.kind).collect();
        log::info!("Active power-ups: {kinds:?}");
    }

    fn on_game_over(&mut self, score: u64, collected: u32) {
        log::info!("Game over: score={score}, cores={collected}");
    }
}

/// Traces every simulation event
struct EventTrace;

impl FeedbackSink for EventTrace {
    fn on_event(&mut self, event: &GameEvent) {
        log::trace!("{event:?}");
    }
}

/// Jump when something dangerous is coming up at the player's height
fn autopilot(run: &Run) -> bool {
    if run.phase() != RunPhase::Playing {
        return false;
    }
    let player = &run.player.state;
    if player.jumps_remaining == 0 || player.vel.y < 0.0 {
        return false;
    }

    let ground_y = run.tuning.ground_y;
    let now = run.state.clock_ms;
    let front = player.pos.x + player.size.x;
    let reach = front + player.vel.x.max(1.0) * LOOKAHEAD_FRAMES;
    let feet = player.bottom();

    run.level
        .entities
        .iter()
        .skip_while(|e| e.pos.x + e.size.x < player.pos.x)
        .take_while(|e| e.pos.x <= reach)
        .filter(|e| e.is_solid(now, run.tuning.crumble_delay_ms))
        .any(|e| {
            let bounds = e.bounds(ground_y, now);
            match e.kind {
                EntityKind::Spike => bounds.bottom() > feet - 10.0,
                // Walls rising above the feet
                k if k.is_platform() => bounds.top() < feet - run.tuning.land_tolerance,
                _ => false,
            }
        })
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Glide (headless) starting...");

    let mut seed = None;
    let mut realtime = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--realtime" => realtime = true,
            other => match other.parse::<u64>() {
                Ok(s) => seed = Some(s),
                Err(_) => log::warn!("Ignoring argument {other:?}"),
            },
        }
    }
    let seed = seed.unwrap_or_else(rand::random);

    let mut driver = Driver::new(Tuning::from_env());
    let mut observer = LogObserver::default();
    let mut audio = AudioManager::new();
    let mut trace = EventTrace;

    let run = driver.start(seed, &mut observer);
    log::info!(
        "Game initialized with seed: {}, {} entities",
        run.seed(),
        run.level.len()
    );

    let frame = Duration::from_secs_f64(FRAME_MS / 1000.0);
    let started = Instant::now();
    let mut tones = 0usize;

    for index in 0..MAX_FRAMES {
        if driver.run().is_some_and(autopilot) {
            driver.request_jump();
        }

        let now_ms = index as f64 * FRAME_MS;
        let outcome = driver.frame(now_ms, &mut observer, &mut [&mut audio, &mut trace]);
        tones += audio.drain_tones().len();

        match outcome {
            FrameOutcome::Continue => {}
            FrameOutcome::Finished { score, collected } => {
                log::info!(
                    "Finished after {index} frames ({:.1}s simulated): score={score}, cores={collected}, cues={tones}",
                    now_ms / 1000.0
                );
                return;
            }
            FrameOutcome::Idle => break,
        }

        if realtime {
            let target = frame * (index as u32 + 1);
            if let Some(wait) = target.checked_sub(started.elapsed()) {
                std::thread::sleep(wait);
            }
        }
    }

    if let Some(run) = driver.run() {
        log::warn!(
            "Stopping after {MAX_FRAMES} frames: score={}, cores={}",
            run.state.score,
            run.state.collected
        );
    }
    driver.stop();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedding shells drive `Driver::frame` from their own animation callback
}
