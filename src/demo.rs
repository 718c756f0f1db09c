//! Demo mode - seeded bots play both sides
//!
//! The drum bot fires at a random lane after a random pause; the piano bot
//! reacts to each shot after a fixed delay and sometimes freezes. Both draw
//! from a `Pcg32` seeded from the settings, so a demo run replays exactly.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::session::Action;
use crate::settings::{DemoSettings, Settings};
use crate::sim::{EngineSnapshot, EngineState};

/// Fires whenever the engine is idle
#[derive(Debug, Clone)]
pub struct DrumBot {
    rng: Pcg32,
    delay_ms: (u64, u64),
    next_fire_at: Option<Duration>,
}

impl DrumBot {
    pub fn new(seed: u64, delay_ms: (u64, u64)) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            delay_ms,
            next_fire_at: None,
        }
    }

    pub fn poll(&mut self, snap: &EngineSnapshot, now: Duration) -> Option<Action> {
        if snap.state != EngineState::Idle {
            self.next_fire_at = None;
            return None;
        }

        let fire_at = match self.next_fire_at {
            Some(at) => at,
            None => {
                let (lo, hi) = self.delay_ms;
                let at = now + Duration::from_millis(self.rng.random_range(lo..=hi));
                self.next_fire_at = Some(at);
                at
            }
        };

        if now < fire_at {
            return None;
        }
        self.next_fire_at = None;
        Some(Action::Fire(self.rng.random_range(0..snap.lane_count)))
    }
}

/// Slides out of the way of each shot, unless it freezes
#[derive(Debug, Clone)]
pub struct PianoBot {
    rng: Pcg32,
    reaction: Duration,
    freeze_chance: f64,
    react_at: Option<Duration>,
    /// Already decided what to do about the current shot
    reacted: bool,
}

impl PianoBot {
    pub fn new(seed: u64, settings: &DemoSettings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            reaction: settings.reaction(),
            freeze_chance: settings.freeze_chance,
            react_at: None,
            reacted: false,
        }
    }

    pub fn poll(&mut self, snap: &EngineSnapshot, now: Duration) -> Option<Action> {
        let incoming = match (snap.state, snap.projectile_lane) {
            (EngineState::InFlight, Some(lane)) => lane,
            _ => {
                self.react_at = None;
                self.reacted = false;
                return None;
            }
        };
        if self.reacted {
            return None;
        }

        let react_at = *self.react_at.get_or_insert(now + self.reaction);
        if now < react_at {
            return None;
        }
        self.reacted = true;

        if self.rng.random_bool(self.freeze_chance) {
            log::debug!("Piano bot froze");
            return None;
        }

        let threatened = snap.paddle_lane.is_none_or(|lane| lane == incoming);
        if !threatened || snap.lane_count < 2 {
            return None;
        }

        // Any lane but the incoming one
        let mut lane = self.rng.random_range(0..snap.lane_count - 1);
        if lane >= incoming {
            lane += 1;
        }
        Some(Action::Move(lane))
    }
}

/// Both bots plus a round limit
#[derive(Debug, Clone)]
pub struct Demo {
    drums: DrumBot,
    piano: PianoBot,
    max_rounds: u32,
    rounds: u32,
}

impl Demo {
    pub fn new(settings: &Settings) -> Self {
        let demo = &settings.demo;
        Self {
            drums: DrumBot::new(settings.seed, demo.fire_delay_ms),
            piano: PianoBot::new(settings.seed.wrapping_add(1), demo),
            max_rounds: demo.max_rounds,
            rounds: 0,
        }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Round limit reached
    pub fn is_done(&self) -> bool {
        self.max_rounds > 0 && self.rounds >= self.max_rounds
    }

    /// Inputs the bots want pressed at `now`
    pub fn poll(&mut self, snap: &EngineSnapshot, now: Duration) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(action) = self.piano.poll(snap, now) {
            actions.push(action);
        }
        if !self.is_done() {
            if let Some(action) = self.drums.poll(snap, now) {
                self.rounds += 1;
                actions.push(action);
            }
        }
        actions
    }
}
