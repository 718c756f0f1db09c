//! The piano's paddle
//!
//! The paddle either spans every lane (expanded) or is collapsed onto a
//! single lane. Collapsing is immediate; spreading back out is a timed
//! transition that any later move cancels.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::check_lane;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    lane_count: usize,
    /// Collapsed lane, or `None` when spanning every lane
    active_lane: Option<usize>,
    /// Session time at which a pending return completes
    return_at: Option<Duration>,
    return_duration: Duration,
    /// Disabled after being hit; a hidden paddle blocks nothing
    hidden: bool,
}

impl Paddle {
    /// New expanded paddle
    pub fn new(lane_count: usize, return_duration: Duration) -> Self {
        Self {
            lane_count,
            active_lane: None,
            return_at: None,
            return_duration,
            hidden: false,
        }
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn active_lane(&self) -> Option<usize> {
        self.active_lane
    }

    pub fn is_expanded(&self) -> bool {
        self.active_lane.is_none()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Deadline of the pending return, if one is scheduled
    pub fn return_at(&self) -> Option<Duration> {
        self.return_at
    }

    /// Collapse onto `lane`, cancelling any pending return.
    ///
    /// A cancelled return is not rescheduled; the paddle stays collapsed
    /// until something calls [`Paddle::begin_return_to_expanded`] again.
    pub fn move_to(&mut self, lane: usize) -> Result<()> {
        check_lane(lane, self.lane_count)?;
        if self.return_at.take().is_some() {
            log::debug!("Paddle return cancelled by move to lane {}", lane);
        }
        self.active_lane = Some(lane);
        Ok(())
    }

    /// Schedule the spread back across every lane.
    ///
    /// An already pending return keeps its original deadline.
    pub fn begin_return_to_expanded(&mut self, now: Duration) {
        if self.return_at.is_none() && !self.is_expanded() {
            self.return_at = Some(now + self.return_duration);
        }
    }

    /// Apply a pending return whose deadline is at or before `now`.
    /// Returns true if the paddle expanded.
    pub fn advance(&mut self, now: Duration) -> bool {
        match self.return_at {
            Some(deadline) if deadline <= now => {
                self.return_at = None;
                self.active_lane = None;
                true
            }
            _ => false,
        }
    }

    /// Does the paddle currently block `lane`?
    pub fn intersects(&self, lane: usize) -> bool {
        if self.hidden {
            return false;
        }
        match self.active_lane {
            None => true,
            Some(active) => active == lane,
        }
    }

    /// Take the paddle out of play
    pub fn hide(&mut self) {
        self.hidden = true;
        self.return_at = None;
    }
}
