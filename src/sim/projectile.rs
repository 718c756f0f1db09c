//! The drums' projectile
//!
//! A projectile travels down one lane for a fixed transit time and is then
//! resolved exactly once.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Lifecycle of a single projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    InFlight,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    lane: usize,
    spawn_time: Duration,
    transit: Duration,
    state: ProjectileState,
}

impl Projectile {
    /// Launch a projectile. The engine guarantees no other is in flight.
    pub fn spawn(lane: usize, now: Duration, transit: Duration) -> Self {
        Self {
            lane,
            spawn_time: now,
            transit,
            state: ProjectileState::InFlight,
        }
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn spawn_time(&self) -> Duration {
        self.spawn_time
    }

    pub fn state(&self) -> ProjectileState {
        self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.state == ProjectileState::InFlight
    }

    /// Session time at which transit completes
    pub fn lands_at(&self) -> Duration {
        self.spawn_time + self.transit
    }

    /// Has the transit time elapsed by `now`?
    pub fn is_resolved(&self, now: Duration) -> bool {
        now.saturating_sub(self.spawn_time) >= self.transit
    }

    /// Fraction of transit completed, clamped to [0, 1]
    pub fn progress(&self, now: Duration) -> f32 {
        let elapsed = now.saturating_sub(self.spawn_time);
        (elapsed.as_secs_f32() / self.transit.as_secs_f32()).min(1.0)
    }

    /// Mark the projectile resolved. Resolving twice is a scheduler bug.
    pub fn resolve(&mut self) -> Result<()> {
        if self.state == ProjectileState::Resolved {
            return Err(GameError::DoubleResolve);
        }
        self.state = ProjectileState::Resolved;
        Ok(())
    }
}
