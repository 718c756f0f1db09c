//! Game session state
//!
//! Score and win/lose bookkeeping for a single session, plus the
//! serializable snapshot handed to the presentation layer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{DRUMS_WIN_BANNER, PIANO_WINS_BANNER};

/// Who won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    DrumsWin,
    PianoWins,
}

impl Winner {
    /// Integer code used as a cue parameter
    pub fn code(&self) -> u32 {
        match self {
            Winner::DrumsWin => 0,
            Winner::PianoWins => 1,
        }
    }

    pub fn banner(&self) -> &'static str {
        match self {
            Winner::DrumsWin => DRUMS_WIN_BANNER,
            Winner::PianoWins => PIANO_WINS_BANNER,
        }
    }
}

/// Current phase of the match. Terminal once not `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    DrumsWin,
    PianoWins,
}

impl GamePhase {
    pub fn is_playing(&self) -> bool {
        *self == GamePhase::Playing
    }

    pub fn winner(&self) -> Option<Winner> {
        match self {
            GamePhase::Playing => None,
            GamePhase::DrumsWin => Some(Winner::DrumsWin),
            GamePhase::PianoWins => Some(Winner::PianoWins),
        }
    }
}

/// Reaction engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EngineState {
    /// Waiting for the drums to fire
    Idle,
    /// A projectile is travelling
    InFlight,
    /// Dodged; the drums may fire again at `until`
    Recovering { until: Duration },
    /// Absorbing
    GameOver,
}

/// Score and phase of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    dodge_count: u32,
    phase: GamePhase,
}

impl GameSession {
    pub fn new(starting_dodges: u32) -> Self {
        Self {
            dodge_count: starting_dodges,
            phase: GamePhase::Playing,
        }
    }

    /// Dodges still needed for the piano to win
    pub fn dodge_count(&self) -> u32 {
        self.dodge_count
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Count a dodge. Reaching zero ends the game in the piano's favour.
    pub fn record_dodge(&mut self) -> GamePhase {
        if self.phase.is_playing() {
            self.dodge_count = self.dodge_count.saturating_sub(1);
            if self.dodge_count == 0 {
                self.phase = GamePhase::PianoWins;
            }
        }
        self.phase
    }

    pub fn record_hit(&mut self) -> GamePhase {
        if self.phase.is_playing() {
            self.phase = GamePhase::DrumsWin;
        }
        self.phase
    }
}

/// Point-in-time view of the engine for rendering and diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Session time the snapshot was taken at
    pub time: Duration,
    pub phase: GamePhase,
    pub state: EngineState,
    pub dodges_remaining: u32,
    pub lane_count: usize,
    /// Collapsed lane, `None` when the paddle spans every lane
    pub paddle_lane: Option<usize>,
    pub paddle_hidden: bool,
    pub projectile_lane: Option<usize>,
    /// Reload bar fill, 0-1
    pub reload_progress: f32,
    /// "Dodge: N", only while the game is running
    pub score_text: Option<String>,
    /// Win banner, only once the game is over
    pub banner: Option<String>,
}
