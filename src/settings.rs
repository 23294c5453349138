//! Session settings
//!
//! Loaded from JSON (a page-embedded script tag on the web, a file natively).
//! Never written back: a bingo session has no persisted state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::sim::NUMBER_MAX;

/// Tunable session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Balls drawn before the session ends
    pub max_balls: u32,
    /// Time between draw ticks (ms)
    pub draw_interval_ms: u64,
    /// Delay between balls of the same batch (ms)
    pub stagger_ms: u64,
    /// How long a message stays visible (ms)
    pub message_duration_ms: u64,
    /// Fixed RNG seed; `None` means the caller picks one (e.g. from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_balls: 30,
            draw_interval_ms: 1500,
            stagger_ms: 300,
            message_duration_ms: 3000,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.validated())
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp out-of-range values into something playable
    pub fn validated(mut self) -> Self {
        let max_balls = clamp_max_balls(self.max_balls);
        if max_balls != self.max_balls {
            log::warn!("max_balls {} out of range, using {}", self.max_balls, max_balls);
            self.max_balls = max_balls;
        }
        if self.draw_interval_ms == 0 {
            log::warn!("draw_interval_ms must be positive, using default");
            self.draw_interval_ms = Self::default().draw_interval_ms;
        }
        self
    }

    pub fn draw_interval(&self) -> Duration {
        Duration::from_millis(self.draw_interval_ms)
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    pub fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_duration_ms)
    }
}

/// Clamp a requested ball count into `1..=NUMBER_MAX`
pub fn clamp_max_balls(count: u32) -> u32 {
    count.clamp(1, NUMBER_MAX as u32)
}
