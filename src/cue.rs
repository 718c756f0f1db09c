//! Cue dispatch
//!
//! The engine announces what happened as semantic cues. Whatever turns those
//! into sound or light (MIDI notes, OSC messages, a log line) lives behind
//! [`CueSink`]. Emission is fire-and-forget: a sink must never block the
//! engine or hand an error back to it.

use serde::{Deserialize, Serialize};

pub use crate::sim::Winner;

/// Semantic game events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cue", rename_all = "snake_case")]
pub enum CueEvent {
    /// Session opened (background music on)
    GameStart,
    /// Drums fired down a lane
    ProjectileFired { lane: usize },
    /// Piano collapsed the paddle onto a lane
    PaddleMoved { lane: usize },
    /// Projectile landed on the paddle
    ProjectileHit,
    /// Projectile missed the paddle; `remaining` dodges left to win
    ProjectileDodged { remaining: u32 },
    GameOver { winner: Winner },
    /// Session torn down (fade everything out)
    SessionClosing,
}

impl CueEvent {
    /// Address tag, matching external cue naming
    pub fn tag(&self) -> &'static str {
        match self {
            CueEvent::GameStart => "game_start",
            CueEvent::ProjectileFired { .. } => "projectile_fired",
            CueEvent::PaddleMoved { .. } => "paddle_moved",
            CueEvent::ProjectileHit => "projectile_hit",
            CueEvent::ProjectileDodged { .. } => "projectile_dodged",
            CueEvent::GameOver { .. } => "game_over",
            CueEvent::SessionClosing => "session_closing",
        }
    }

    /// Integer parameters carried with the tag
    pub fn params(&self) -> Vec<u32> {
        match *self {
            CueEvent::ProjectileFired { lane } | CueEvent::PaddleMoved { lane } => {
                vec![lane as u32]
            }
            CueEvent::ProjectileDodged { remaining } => vec![remaining],
            CueEvent::GameOver { winner } => vec![winner.code()],
            CueEvent::GameStart | CueEvent::ProjectileHit | CueEvent::SessionClosing => {
                Vec::new()
            }
        }
    }
}

/// Receiver for semantic cues
pub trait CueSink {
    fn emit(&mut self, event: &CueEvent);
}

impl<S: CueSink + ?Sized> CueSink for &mut S {
    fn emit(&mut self, event: &CueEvent) {
        (**self).emit(event);
    }
}

impl<S: CueSink + ?Sized> CueSink for Box<S> {
    fn emit(&mut self, event: &CueEvent) {
        (**self).emit(event);
    }
}

/// Writes every cue to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCueSink;

impl CueSink for LogCueSink {
    fn emit(&mut self, event: &CueEvent) {
        log::info!("cue {} {:?}", event.tag(), event.params());
    }
}

/// Drops every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCueSink;

impl CueSink for NullCueSink {
    fn emit(&mut self, _event: &CueEvent) {}
}

/// Keeps every cue in order of emission
#[derive(Debug, Default, Clone)]
pub struct RecordingCueSink {
    pub events: Vec<CueEvent>,
}

impl RecordingCueSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded cues matching a predicate
    pub fn count(&self, pred: impl Fn(&CueEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn last(&self) -> Option<&CueEvent> {
        self.events.last()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl CueSink for RecordingCueSink {
    fn emit(&mut self, event: &CueEvent) {
        self.events.push(*event);
    }
}
