//! Frame driver
//!
//! Owns the active run and the pending-tick flag. Whatever produces frames
//! (animation-frame callback, fixed-rate loop, test harness) calls
//! [`Driver::frame`] with a monotonic timestamp until it reports the run is
//! finished; [`Driver::stop`] cancels the pending tick.

use crate::sim::{ActivePowerUp, GameEvent, Run, RunPhase, TickInput, tick};
use crate::tuning::Tuning;

/// Shell-side notifications about the run
pub trait RunObserver {
    fn on_score_update(&mut self, _score: u64) {}
    fn on_core_collect(&mut self, _count: u32) {}
    fn on_power_ups_update(&mut self, _active: &[ActivePowerUp]) {}
    fn on_game_over(&mut self, score: u64, collected: u32);
}

/// Fire-and-forget consumer of simulation events (audio, effects, haptics)
pub trait FeedbackSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Result of processing one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No run is scheduled
    Idle,
    /// Run still going, schedule the next frame
    Continue,
    /// Run reached `Over` this frame; nothing more is scheduled
    Finished { score: u64, collected: u32 },
}

/// Drives one run at a time
#[derive(Debug)]
pub struct Driver {
    tuning: Tuning,
    run: Option<Run>,
    scheduled: bool,
    jump_requested: bool,
}

impl Driver {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            run: None,
            scheduled: false,
            jump_requested: false,
        }
    }

    /// Start a fresh run, replacing any previous one
    pub fn start(&mut self, seed: u64, observer: &mut dyn RunObserver) -> &Run {
        self.jump_requested = false;
        self.scheduled = true;
        observer.on_score_update(0);
        observer.on_core_collect(0);
        observer.on_power_ups_update(&[]);
        self.run.insert(Run::new(seed, self.tuning.clone()))
    }

    /// Tear down the active run and cancel the pending tick
    pub fn stop(&mut self) {
        if self.scheduled {
            log::info!("Run stopped");
        }
        self.scheduled = false;
        self.jump_requested = false;
        self.run = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    /// Queue a jump for the next frame. Ignored unless the player is alive.
    pub fn request_jump(&mut self) -> bool {
        let alive = self.scheduled
            && self
                .run
                .as_ref()
                .is_some_and(|run| run.phase() == RunPhase::Playing);
        if alive {
            self.jump_requested = true;
        }
        alive
    }

    /// Process one display frame
    pub fn frame(
        &mut self,
        now_ms: f64,
        observer: &mut dyn RunObserver,
        feedback: &mut [&mut dyn FeedbackSink],
    ) -> FrameOutcome {
        if !self.scheduled {
            return FrameOutcome::Idle;
        }
        let Some(run) = self.run.as_mut() else {
            self.scheduled = false;
            return FrameOutcome::Idle;
        };

        let input = TickInput {
            jump: std::mem::take(&mut self.jump_requested),
        };
        tick(run, &input, now_ms);

        let mut outcome = FrameOutcome::Continue;
        for event in run.drain_events() {
            for sink in feedback.iter_mut() {
                sink.on_event(&event);
            }
            match event {
                GameEvent::ScoreChanged { score, .. } => observer.on_score_update(score),
                GameEvent::Collected { total, .. } => observer.on_core_collect(total),
                GameEvent::PowerUpsChanged { ref active } => observer.on_power_ups_update(active),
                GameEvent::GameOver { score, collected } => {
                    observer.on_game_over(score, collected);
                    outcome = FrameOutcome::Finished { score, collected };
                }
                _ => {}
            }
        }

        if matches!(outcome, FrameOutcome::Finished { .. }) {
            self.scheduled = false;
        }
        outcome
    }
}
