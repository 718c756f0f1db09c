//! Game settings
//!
//! Loaded from an optional JSON file; every field falls back to its default.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};

/// Tuning for the demo bots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    /// How long the piano bot takes to react to a fired projectile
    pub reaction_ms: u64,
    /// Chance (0-1) the piano bot freezes instead of dodging
    pub freeze_chance: f64,
    /// Drum bot waits a random delay in this range before firing
    pub fire_delay_ms: (u64, u64),
    /// Stop after this many rounds even if nobody has won (0 = unlimited)
    pub max_rounds: u32,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            reaction_ms: 180,
            freeze_chance: 0.15,
            fire_delay_ms: (300, 1200),
            max_rounds: 0,
        }
    }
}

impl DemoSettings {
    pub fn reaction(&self) -> Duration {
        Duration::from_millis(self.reaction_ms)
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of lanes shared by the projectile and the paddle
    pub lane_count: usize,
    /// Dodges the piano needs to win
    pub starting_dodges: u32,
    /// Lane the paddle collapses onto when the session opens
    pub initial_lane: usize,

    // === Timing ===
    pub transit_ms: u64,
    pub recovery_ms: u64,
    pub paddle_return_ms: u64,
    /// Run loop timestep; must not exceed 16ms
    pub poll_interval_ms: u64,

    /// Seed for the demo bots
    pub seed: u64,
    pub demo: DemoSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lane_count: DEFAULT_LANE_COUNT,
            starting_dodges: STARTING_DODGES,
            initial_lane: 0,

            transit_ms: TRANSIT_DURATION.as_millis() as u64,
            recovery_ms: RECOVERY_DURATION.as_millis() as u64,
            paddle_return_ms: PADDLE_RETURN_DURATION.as_millis() as u64,
            poll_interval_ms: POLL_INTERVAL.as_millis() as u64,

            seed: 0x5eed,
            demo: DemoSettings::default(),
        }
    }
}

impl Settings {
    pub fn transit(&self) -> Duration {
        Duration::from_millis(self.transit_ms)
    }

    pub fn recovery(&self) -> Duration {
        Duration::from_millis(self.recovery_ms)
    }

    pub fn paddle_return(&self) -> Duration {
        Duration::from_millis(self.paddle_return_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(GameError::InvalidConfig(msg));

        if self.lane_count == 0 {
            return fail("lane_count must be at least 1".into());
        }
        if self.initial_lane >= self.lane_count {
            return fail(format!(
                "initial_lane {} out of range for {} lanes",
                self.initial_lane, self.lane_count
            ));
        }
        if self.starting_dodges == 0 {
            return fail("starting_dodges must be at least 1".into());
        }
        if self.transit_ms == 0 {
            return fail("transit_ms must be positive".into());
        }
        if self.poll_interval_ms == 0 || self.poll_interval() > MAX_POLL_INTERVAL {
            return fail(format!(
                "poll_interval_ms must be in 1..={}",
                MAX_POLL_INTERVAL.as_millis()
            ));
        }
        if !(0.0..=1.0).contains(&self.demo.freeze_chance) {
            return fail("demo.freeze_chance must be within [0, 1]".into());
        }
        let (lo, hi) = self.demo.fire_delay_ms;
        if lo > hi {
            return fail(format!("demo.fire_delay_ms range {lo}..{hi} is inverted"));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file, or defaults when there is none
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Ok(Self::default());
        };

        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.transit(), TRANSIT_DURATION);
        assert_eq!(settings.paddle_return(), PADDLE_RETURN_DURATION);
        assert_eq!(settings.starting_dodges, 5);
        assert!(settings.poll_interval() <= MAX_POLL_INTERVAL);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "lane_count": 6, "demo": { "reaction_ms": 50 } }"#)
            .unwrap();
        assert_eq!(settings.lane_count, 6);
        assert_eq!(settings.transit_ms, 500);
        assert_eq!(settings.demo.reaction_ms, 50);
        assert_eq!(settings.demo.fire_delay_ms, (300, 1200));
    }

    #[test]
    fn test_rejects_bad_values() {
        for json in [
            r#"{ "lane_count": 0 }"#,
            r#"{ "lane_count": 3, "initial_lane": 3 }"#,
            r#"{ "starting_dodges": 0 }"#,
            r#"{ "transit_ms": 0 }"#,
            r#"{ "poll_interval_ms": 17 }"#,
            r#"{ "demo": { "freeze_chance": 1.5 } }"#,
            r#"{ "demo": { "fire_delay_ms": [900, 100] } }"#,
        ] {
            let err = Settings::from_json(json).unwrap_err();
            assert!(matches!(err, GameError::InvalidConfig(_)), "{json}: {err}");
        }
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = Settings::from_json("{ lane_count: ").unwrap_err();
        assert!(matches!(err, GameError::Json(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("kitchen-dodge-does-not-exist.json");
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("kitchen-dodge-{}.json", std::process::id()));
        let settings = Settings {
            lane_count: 6,
            recovery_ms: 250,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(Some(&path)).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
