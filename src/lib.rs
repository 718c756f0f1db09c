//! Kitchen Dodge - a two-player reflex game engine
//!
//! One player (the drums) fires a projectile down one of N lanes, the other
//! (the piano) slides a paddle to dodge it before it lands.
//!
//! Core modules:
//! - `sim`: Deterministic state machine (paddle, projectile, reaction engine)
//! - `cue`: Semantic events forwarded to external audio/lighting systems
//! - `session`: Per-game ownership of the engine and held inputs
//! - `settings`: JSON-backed configuration
//! - `demo`: Seeded bots that play both sides

pub mod cue;
pub mod demo;
pub mod error;
pub mod session;
pub mod settings;
pub mod sim;

pub use cue::{CueEvent, CueSink, LogCueSink, NullCueSink, RecordingCueSink, Winner};
pub use error::{GameError, Result};
pub use session::{Action, PressOutcome, Session};
pub use settings::{DemoSettings, Settings};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Run loop timestep (120 Hz)
    pub const POLL_INTERVAL: Duration = Duration::from_micros(8_333);
    /// Slowest acceptable poll; anything coarser makes collisions visibly late
    pub const MAX_POLL_INTERVAL: Duration = Duration::from_millis(16);

    /// Projectile travel time from spawn to collision check
    pub const TRANSIT_DURATION: Duration = Duration::from_millis(500);
    /// Time for the paddle to spread back across every lane
    pub const PADDLE_RETURN_DURATION: Duration = Duration::from_millis(500);
    /// Delay after a dodge before the drums may fire again
    pub const RECOVERY_DURATION: Duration = Duration::ZERO;

    /// Dodges the piano needs to win
    pub const STARTING_DODGES: u32 = 5;
    pub const DEFAULT_LANE_COUNT: usize = 5;

    /// Banner text shown when the game ends
    pub const DRUMS_WIN_BANNER: &str = "DRUMS WIN!";
    pub const PIANO_WINS_BANNER: &str = "PIANO WINS!";
}

/// Check a lane index against the configured lane count
#[inline]
pub fn check_lane(lane: usize, lane_count: usize) -> Result<()> {
    if lane < lane_count {
        Ok(())
    } else {
        Err(GameError::InvalidLane { lane, lane_count })
    }
}
