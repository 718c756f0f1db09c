//! Game session
//!
//! A [`Session`] is the single owner of one game: the reaction engine and
//! the set of logical inputs currently held down. The input layer maps
//! physical keys or sensors onto [`Action`]s and reports presses and
//! releases here; holding an input does not repeat it.

use std::collections::HashSet;
use std::time::Duration;

use crate::check_lane;
use crate::cue::CueSink;
use crate::error::Result;
use crate::settings::Settings;
use crate::sim::{EngineSnapshot, Outcome, ReactionEngine};

/// Logical input, independent of the device that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Drum pad for a lane
    Fire(usize),
    /// Piano key for a lane
    Move(usize),
}

impl Action {
    pub fn lane(&self) -> usize {
        match *self {
            Action::Fire(lane) | Action::Move(lane) => lane,
        }
    }
}

/// What became of a press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Reached the engine
    Engine(Outcome),
    /// Input still held down from an earlier press; dropped before the engine
    AlreadyHeld,
}

impl PressOutcome {
    pub fn is_applied(&self) -> bool {
        *self == PressOutcome::Engine(Outcome::Applied)
    }
}

pub struct Session<S: CueSink> {
    engine: ReactionEngine<S>,
    held: HashSet<Action>,
}

impl<S: CueSink> Session<S> {
    pub fn new(settings: &Settings, sink: S) -> Result<Self> {
        Ok(Self {
            engine: ReactionEngine::new(settings, sink)?,
            held: HashSet::new(),
        })
    }

    pub fn engine(&self) -> &ReactionEngine<S> {
        &self.engine
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// An input went down
    pub fn press(&mut self, action: Action, now: Duration) -> Result<PressOutcome> {
        check_lane(action.lane(), self.engine.lane_count())?;

        if self.held.contains(&action) {
            log::debug!("{:?} ignored: still held", action);
            return Ok(PressOutcome::AlreadyHeld);
        }

        let outcome = match action {
            Action::Fire(lane) => {
                self.held.insert(action);
                self.engine.fire(lane, now)?
            }
            Action::Move(lane) => {
                let outcome = self.engine.move_paddle(lane, now)?;
                // Keys pressed after the game ends are not tracked
                if outcome.is_applied() {
                    self.held.insert(action);
                }
                outcome
            }
        };
        Ok(PressOutcome::Engine(outcome))
    }

    /// Press and immediately release, for inputs with no key-up of their own
    pub fn tap(&mut self, action: Action, now: Duration) -> Result<PressOutcome> {
        let outcome = self.press(action, now)?;
        self.held.remove(&action);
        Ok(outcome)
    }

    /// An input came back up. Only affects which inputs count as held.
    pub fn release(&mut self, action: Action) -> bool {
        self.held.remove(&action)
    }

    /// Ask the paddle to spread back across every lane
    pub fn return_paddle(&mut self, now: Duration) -> Result<Outcome> {
        self.engine.return_paddle(now)
    }

    pub fn tick(&mut self, now: Duration) -> Result<()> {
        self.engine.tick(now)
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.engine.snapshot()
    }

    /// End the session, returning the cue sink
    pub fn close(self) -> S {
        self.engine.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::{CueEvent, RecordingCueSink};
    use crate::error::GameError;
    use crate::sim::{GamePhase, IgnoreReason};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn session() -> Session<RecordingCueSink> {
        Session::new(&Settings::default(), RecordingCueSink::new()).unwrap()
    }

    #[test]
    fn test_held_press_does_not_repeat() {
        let mut s = session();
        assert!(s.press(Action::Move(2), ms(0)).unwrap().is_applied());
        assert_eq!(
            s.press(Action::Move(2), ms(10)).unwrap(),
            PressOutcome::AlreadyHeld
        );
        let moves = s
            .engine()
            .sink()
            .count(|e| matches!(e, CueEvent::PaddleMoved { .. }));
        assert_eq!(moves, 1);

        assert!(s.release(Action::Move(2)));
        assert!(s.press(Action::Move(2), ms(20)).unwrap().is_applied());
    }

    #[test]
    fn test_release_never_touches_engine() {
        let mut s = session();
        s.press(Action::Fire(1), ms(0)).unwrap();
        let before = s.snapshot();
        assert!(s.release(Action::Fire(1)));
        assert!(!s.release(Action::Fire(1)));
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_fire_held_even_when_ignored() {
        let mut s = session();
        s.press(Action::Fire(1), ms(0)).unwrap();
        s.press(Action::Fire(3), ms(5)).unwrap();
        assert!(s.is_held(Action::Fire(3)));
        assert_eq!(s.engine().projectile().map(|p| p.lane()), Some(1));
    }

    #[test]
    fn test_moves_after_game_over_not_tracked() {
        let mut s = session();
        s.press(Action::Fire(0), ms(0)).unwrap();
        s.tick(ms(500)).unwrap();
        assert_eq!(s.engine().phase(), GamePhase::DrumsWin);

        assert_eq!(
            s.press(Action::Move(4), ms(600)).unwrap(),
            PressOutcome::Engine(Outcome::Ignored(IgnoreReason::GameOver))
        );
        assert!(!s.is_held(Action::Move(4)));
    }

    #[test]
    fn test_invalid_lane_not_tracked() {
        let mut s = session();
        let err = s.press(Action::Move(7), ms(0)).unwrap_err();
        assert!(matches!(err, GameError::InvalidLane { lane: 7, .. }));
        assert!(!s.is_held(Action::Move(7)));
    }

    #[test]
    fn test_taps_repeat_on_same_lane() {
        let mut s = session();
        assert!(s.tap(Action::Fire(2), ms(0)).unwrap().is_applied());
        assert!(!s.is_held(Action::Fire(2)));
        s.tick(ms(500)).unwrap();
        assert!(s.tap(Action::Fire(2), ms(600)).unwrap().is_applied());

        let fired = s
            .engine()
            .sink()
            .count(|e| matches!(e, CueEvent::ProjectileFired { lane: 2 }));
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_tap_leaves_other_held_inputs() {
        let mut s = session();
        s.press(Action::Move(1), ms(0)).unwrap();
        s.tap(Action::Fire(3), ms(0)).unwrap();
        assert!(s.is_held(Action::Move(1)));
        assert!(!s.is_held(Action::Fire(3)));
    }

    #[test]
    fn test_close() {
        let s = session();
        let sink = s.close();
        assert_eq!(sink.events.first(), Some(&CueEvent::GameStart));
        assert_eq!(sink.last(), Some(&CueEvent::SessionClosing));
    }
}
