//! TOML-backed session tuning with compiled-in defaults.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use zombie_defence_world::LevelConfig;

const DEFAULT_RELEASE_INTERVAL_MS: u64 = 1500;
const DEFAULT_MAX_DT_MS: u64 = 250;

/// Tunable parameters of a headless session.
///
/// Every field has a default, so a config file only needs to name the
/// values it changes.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Currency the player starts with.
    pub starting_currency: u32,
    /// Lives the player starts with.
    pub starting_lives: u32,
    /// Seed for the world's deterministic draws.
    pub rng_seed: u64,
    /// Milliseconds between wave releases at one spawn point.
    pub release_interval_ms: u64,
    /// Upper bound on a single tick's delta time, in milliseconds.
    ///
    /// Wall-clock stalls (a dragged window, a debugger pause) otherwise
    /// arrive as one giant catch-up step.
    pub max_dt_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let level = LevelConfig::default();
        Self {
            starting_currency: level.starting_currency,
            starting_lives: level.starting_lives,
            rng_seed: level.rng_seed,
            release_interval_ms: DEFAULT_RELEASE_INTERVAL_MS,
            max_dt_ms: DEFAULT_MAX_DT_MS,
        }
    }
}

impl SessionConfig {
    /// Parses a TOML document into a configuration.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse session configuration")
    }

    /// Starting conditions handed to the world.
    #[must_use]
    pub fn level(&self) -> LevelConfig {
        LevelConfig {
            starting_currency: self.starting_currency,
            starting_lives: self.starting_lives,
            rng_seed: self.rng_seed,
        }
    }

    /// Wave release cadence.
    #[must_use]
    pub fn release_interval(&self) -> Duration {
        Duration::from_millis(self.release_interval_ms)
    }

    /// Delta-time clamp applied to every tick.
    #[must_use]
    pub fn max_dt(&self) -> Duration {
        Duration::from_millis(self.max_dt_ms)
    }
}
