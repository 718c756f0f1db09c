//! Kitchen Dodge entry point
//!
//! Reads line commands from stdin on a dedicated thread and feeds them to a
//! single-owner fixed-timestep loop, which is the only place the session is
//! touched.
//!
//! Commands: `fire N`, `move N` (press and release), `press fire N`,
//! `press move N`, `release fire N`, `release move N` (held inputs),
//! `return`, `status`, `quit`.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use kitchen_dodge::demo::Demo;
use kitchen_dodge::sim::EngineState;
use kitchen_dodge::{
    Action, CueSink, GameError, LogCueSink, PressOutcome, Result, Session, Settings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// A line has no key-up, so a bare `fire N` is a full press and release
    Tap(Action),
    Press(Action),
    Release(Action),
    Return,
    Status,
    Quit,
}

fn parse_action(kind: &str, lane: &str) -> Option<Action> {
    let lane = lane.parse().ok()?;
    match kind {
        "fire" => Some(Action::Fire(lane)),
        "move" => Some(Action::Move(lane)),
        _ => None,
    }
}

fn parse_command(line: &str) -> Option<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["press", kind, lane] => parse_action(kind, lane).map(Command::Press),
        ["release", kind, lane] => parse_action(kind, lane).map(Command::Release),
        [kind, lane] => parse_action(kind, lane).map(Command::Tap),
        ["return"] => Some(Command::Return),
        ["status"] => Some(Command::Status),
        ["quit" | "exit"] => Some(Command::Quit),
        _ => None,
    }
}

struct Args {
    config: Option<PathBuf>,
    demo: bool,
    seed: Option<u64>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        demo: false,
        seed: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| GameError::InvalidConfig("--config needs a path".into()))?;
                args.config = Some(PathBuf::from(path));
            }
            "--seed" => {
                let seed = iter
                    .next()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| GameError::InvalidConfig("--seed needs a number".into()))?;
                args.seed = Some(seed);
            }
            "--demo" => args.demo = true,
            other => {
                return Err(GameError::InvalidConfig(format!("unknown argument {other}")));
            }
        }
    }
    Ok(args)
}

/// Forward stdin lines to the run loop so it never blocks on input
fn spawn_input_reader() -> Receiver<Command> {
    let (tx, rx) = mpsc::channel::<Command>();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Some(command) => {
                    if tx.send(command).is_err() {
                        break; // run loop gone
                    }
                }
                None => log::warn!("Unrecognised command: {}", line.trim()),
            }
        }
    });
    rx
}

/// Apply one stdin command. Returns false when the operator asked to quit.
fn apply_command<S: CueSink>(
    session: &mut Session<S>,
    command: Command,
    now: Duration,
) -> Result<bool> {
    let lane_count = session.engine().lane_count();
    let outcome = match command {
        Command::Quit => return Ok(false),
        Command::Tap(action) | Command::Press(action) if action.lane() >= lane_count => {
            // Out-of-range lanes are a typo here, not an engine bug
            log::warn!("No lane {} in a {}-lane game", action.lane(), lane_count);
            return Ok(true);
        }
        Command::Tap(action) => session.tap(action, now)?,
        Command::Press(action) => session.press(action, now)?,
        Command::Release(action) => {
            session.release(action);
            return Ok(true);
        }
        Command::Return => PressOutcome::Engine(session.return_paddle(now)?),
        Command::Status => {
            println!("{}", serde_json::to_string(&session.snapshot())?);
            return Ok(true);
        }
    };
    if !outcome.is_applied() {
        log::debug!("{:?} ignored: {:?}", command, outcome);
    }
    Ok(true)
}

fn run() -> Result<()> {
    let args = parse_args()?;
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }

    let mut session = Session::new(&settings, LogCueSink)?;
    let mut demo = args.demo.then(|| Demo::new(&settings));
    let input = spawn_input_reader();
    let mut input_open = true;

    let start = Instant::now();
    let step = settings.poll_interval();
    let mut next_tick = start;

    loop {
        let now = start.elapsed();

        // Apply queued commands one at a time, each to completion
        while input_open {
            match input.try_recv() {
                Ok(command) => {
                    if !apply_command(&mut session, command, now)? {
                        log::info!("Quit requested");
                        session.close();
                        return Ok(());
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::info!("Input closed");
                    input_open = false;
                }
            }
        }

        session.tick(now)?;

        if let Some(demo) = demo.as_mut() {
            for action in demo.poll(&session.snapshot(), now) {
                session.tap(action, now)?;
            }
        }

        let state = session.engine().state();
        let game_over = state == EngineState::GameOver;
        let demo_finished = demo
            .as_ref()
            .is_some_and(|d| game_over || (d.is_done() && state == EngineState::Idle));
        let input_finished = demo.is_none() && !input_open && state != EngineState::InFlight;
        if demo_finished || input_finished {
            if let Some(banner) = session.snapshot().banner {
                println!("{banner}");
            }
            session.close();
            return Ok(());
        }

        next_tick += step;
        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        } else {
            // Fell behind; don't try to catch up with a burst of ticks
            next_tick = now;
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Kitchen Dodge starting...");

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_dodge::{CueEvent, RecordingCueSink};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn session() -> Session<RecordingCueSink> {
        Session::new(&Settings::default(), RecordingCueSink::new()).unwrap()
    }

    fn play(session: &mut Session<RecordingCueSink>, line: &str, at: u64) -> bool {
        let command = parse_command(line).unwrap();
        apply_command(session, command, ms(at)).unwrap()
    }

    fn fired(session: &Session<RecordingCueSink>) -> usize {
        session
            .engine()
            .sink()
            .count(|e| matches!(e, CueEvent::ProjectileFired { .. }))
    }

    #[test]
    fn test_same_lane_fires_again_after_landing() {
        let mut s = session();
        assert!(play(&mut s, "fire 2", 0));
        s.tick(ms(500)).unwrap();
        assert!(play(&mut s, "fire 2", 600));
        assert_eq!(fired(&s), 2);
        assert!(!s.is_held(Action::Fire(2)));
    }

    #[test]
    fn test_held_fire_needs_release() {
        let mut s = session();
        play(&mut s, "press fire 2", 0);
        s.tick(ms(500)).unwrap();
        play(&mut s, "press fire 2", 600);
        assert_eq!(fired(&s), 1);

        play(&mut s, "release fire 2", 700);
        play(&mut s, "press fire 2", 800);
        assert_eq!(fired(&s), 2);
    }

    #[test]
    fn test_out_of_range_lane_is_skipped() {
        let mut s = session();
        assert!(play(&mut s, "fire 9", 0));
        assert_eq!(fired(&s), 0);
    }

    #[test]
    fn test_quit_stops_loop() {
        let mut s = session();
        assert!(!play(&mut s, "quit", 0));
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("fire 2"), Some(Command::Tap(Action::Fire(2))));
        assert_eq!(
            parse_command("  move 0 "),
            Some(Command::Tap(Action::Move(0)))
        );
        assert_eq!(
            parse_command("press fire 1"),
            Some(Command::Press(Action::Fire(1)))
        );
        assert_eq!(
            parse_command("release move 4"),
            Some(Command::Release(Action::Move(4)))
        );
        assert_eq!(parse_command("return"), Some(Command::Return));
        assert_eq!(parse_command("status"), Some(Command::Status));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
    }

    #[test]
    fn test_parse_command_rejects_garbage() {
        assert_eq!(parse_command("fire"), None);
        assert_eq!(parse_command("fire -1"), None);
        assert_eq!(parse_command("jump 2"), None);
        assert_eq!(parse_command("release fire x"), None);
        assert_eq!(parse_command("press 2"), None);
    }
}
