//! Deterministic game simulation
//!
//! All gameplay logic lives here. Time is passed in explicitly as a
//! `Duration` since session start; nothing in this module reads a clock,
//! sleeps, or touches I/O other than the cue sink it is handed.

pub mod engine;
pub mod paddle;
pub mod projectile;
pub mod state;

pub use engine::{IgnoreReason, Outcome, ReactionEngine};
pub use paddle::Paddle;
pub use projectile::{Projectile, ProjectileState};
pub use state::{EngineSnapshot, EngineState, GamePhase, GameSession, Winner};
