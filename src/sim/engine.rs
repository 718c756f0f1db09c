//! Reaction engine
//!
//! Owns the paddle, the (single) projectile and the session score, and is
//! the only thing allowed to mutate them. Each call runs to completion
//! before the next one starts; the owner drives timers by calling
//! [`ReactionEngine::tick`] with the current session time.
//!
//! Every command first catches up on timers that expired at or before its
//! timestamp, so a late poll never evaluates a collision against a paddle
//! move that happened after the projectile landed.

use std::time::Duration;

use super::paddle::Paddle;
use super::projectile::Projectile;
use super::state::{EngineSnapshot, EngineState, GamePhase, GameSession, Winner};
use crate::check_lane;
use crate::cue::{CueEvent, CueSink};
use crate::error::Result;
use crate::settings::Settings;

/// Why a valid command changed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The game has ended
    GameOver,
    /// A projectile is already travelling
    AlreadyInFlight,
    /// Still inside the post-dodge recovery window
    Recovering,
}

/// Result of a command that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(IgnoreReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        *self == Outcome::Applied
    }
}

pub struct ReactionEngine<S: CueSink> {
    lane_count: usize,
    transit: Duration,
    recovery: Duration,
    session: GameSession,
    paddle: Paddle,
    projectile: Option<Projectile>,
    state: EngineState,
    /// Latest session time seen; time never runs backwards
    now: Duration,
    sink: S,
}

impl<S: CueSink> ReactionEngine<S> {
    /// Open a session: the paddle collapses onto the initial lane and
    /// `GameStart` is announced.
    pub fn new(settings: &Settings, mut sink: S) -> Result<Self> {
        settings.validate()?;

        let mut paddle = Paddle::new(settings.lane_count, settings.paddle_return());
        paddle.move_to(settings.initial_lane)?;

        log::info!(
            "Session start: {} lanes, {} dodges to win, transit {:?}",
            settings.lane_count,
            settings.starting_dodges,
            settings.transit()
        );
        sink.emit(&CueEvent::GameStart);

        Ok(Self {
            lane_count: settings.lane_count,
            transit: settings.transit(),
            recovery: settings.recovery(),
            session: GameSession::new(settings.starting_dodges),
            paddle,
            projectile: None,
            state: EngineState::Idle,
            now: Duration::ZERO,
            sink,
        })
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn dodges_remaining(&self) -> u32 {
        self.session.dodge_count()
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    /// Current or most recently resolved projectile
    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Latest session time the engine has observed
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Drums fire down `lane`
    pub fn fire(&mut self, lane: usize, now: Duration) -> Result<Outcome> {
        check_lane(lane, self.lane_count)?;
        self.tick(now)?;

        let reason = match self.state {
            EngineState::GameOver => Some(IgnoreReason::GameOver),
            EngineState::InFlight => Some(IgnoreReason::AlreadyInFlight),
            EngineState::Recovering { .. } => Some(IgnoreReason::Recovering),
            EngineState::Idle => None,
        };
        if let Some(reason) = reason {
            log::debug!("fire({}) ignored: {:?}", lane, reason);
            return Ok(Outcome::Ignored(reason));
        }

        self.sink.emit(&CueEvent::ProjectileFired { lane });
        let projectile = Projectile::spawn(lane, self.now, self.transit);
        log::info!("Fired lane {}, lands at {:?}", lane, projectile.lands_at());
        self.projectile = Some(projectile);
        self.state = EngineState::InFlight;
        Ok(Outcome::Applied)
    }

    /// Piano collapses the paddle onto `lane`. Allowed while a projectile is
    /// in flight: moving is how the piano dodges.
    pub fn move_paddle(&mut self, lane: usize, now: Duration) -> Result<Outcome> {
        check_lane(lane, self.lane_count)?;
        self.tick(now)?;

        if !self.phase().is_playing() {
            log::debug!("move({}) ignored: game over", lane);
            return Ok(Outcome::Ignored(IgnoreReason::GameOver));
        }

        self.paddle.move_to(lane)?;
        self.sink.emit(&CueEvent::PaddleMoved { lane });
        Ok(Outcome::Applied)
    }

    /// Start spreading the paddle back across every lane
    pub fn return_paddle(&mut self, now: Duration) -> Result<Outcome> {
        self.tick(now)?;

        if !self.phase().is_playing() {
            log::debug!("paddle return ignored: game over");
            return Ok(Outcome::Ignored(IgnoreReason::GameOver));
        }

        self.paddle.begin_return_to_expanded(self.now);
        Ok(Outcome::Applied)
    }

    /// Advance timers to `now`, in the order their deadlines fall
    pub fn tick(&mut self, now: Duration) -> Result<()> {
        if now > self.now {
            self.now = now;
        }
        let now = self.now;

        if self.state == EngineState::InFlight {
            if let Some(lands_at) = self.projectile.as_ref().map(Projectile::lands_at) {
                if lands_at <= now {
                    // A return due before the landing counts; one due after does not
                    self.paddle.advance(lands_at);
                    self.resolve_projectile(lands_at)?;
                }
            }
        }

        if self.state == EngineState::GameOver {
            return Ok(());
        }

        if self.paddle.advance(now) {
            log::debug!("Paddle expanded at {:?}", now);
        }

        if let EngineState::Recovering { until } = self.state {
            if until <= now {
                self.enter_idle();
            }
        }
        Ok(())
    }

    /// Collision check, run exactly once when the transit timer expires
    fn resolve_projectile(&mut self, at: Duration) -> Result<()> {
        let Some(projectile) = self.projectile.as_mut() else {
            return Ok(());
        };
        projectile.resolve()?;
        let lane = projectile.lane();

        if self.paddle.intersects(lane) {
            log::info!("Projectile hit paddle in lane {}", lane);
            self.sink.emit(&CueEvent::ProjectileHit);
            self.session.record_hit();
            self.paddle.hide();
            self.finish(Winner::DrumsWin);
            return Ok(());
        }

        match self.session.record_dodge() {
            GamePhase::PianoWins => self.finish(Winner::PianoWins),
            _ => {
                let remaining = self.session.dodge_count();
                log::info!("Dodged lane {}, {} to go", lane, remaining);
                self.sink.emit(&CueEvent::ProjectileDodged { remaining });
                if self.recovery.is_zero() {
                    self.enter_idle();
                } else {
                    self.state = EngineState::Recovering {
                        until: at + self.recovery,
                    };
                }
            }
        }
        Ok(())
    }

    fn enter_idle(&mut self) {
        self.projectile = None;
        self.state = EngineState::Idle;
    }

    fn finish(&mut self, winner: Winner) {
        log::info!("Game over: {}", winner.banner());
        self.state = EngineState::GameOver;
        self.sink.emit(&CueEvent::GameOver { winner });
    }

    /// How far the current projectile has travelled, 0-1
    pub fn reload_progress(&self, now: Duration) -> f32 {
        match self.state {
            EngineState::InFlight => self
                .projectile
                .as_ref()
                .map_or(0.0, |p| p.progress(now.max(self.now))),
            EngineState::GameOver => 1.0,
            EngineState::Idle | EngineState::Recovering { .. } => 0.0,
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let phase = self.phase();
        EngineSnapshot {
            time: self.now,
            phase,
            state: self.state,
            dodges_remaining: self.session.dodge_count(),
            lane_count: self.lane_count,
            paddle_lane: self.paddle.active_lane(),
            paddle_hidden: self.paddle.is_hidden(),
            projectile_lane: self.projectile.as_ref().map(Projectile::lane),
            reload_progress: self.reload_progress(self.now),
            score_text: phase
                .is_playing()
                .then(|| format!("Dodge: {}", self.session.dodge_count())),
            banner: phase.winner().map(|w| w.banner().to_string()),
        }
    }

    /// Tear the session down, returning the sink
    pub fn close(mut self) -> S {
        log::info!("Session closing at {:?}", self.now);
        self.sink.emit(&CueEvent::SessionClosing);
        self.sink
    }
}
