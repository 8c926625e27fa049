use std::time::Duration;

use crate::error::{FlowError, Result};

pub const SPLASH_DELAY_ENV: &str = "TASTE_SPLASH_MS";
pub const PROVIDER_LATENCY_ENV: &str = "TASTE_PROVIDER_LATENCY_MS";
pub const PROVIDER_TIMEOUT_ENV: &str = "TASTE_PROVIDER_TIMEOUT_MS";

/// Timing knobs for one wizard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardConfig {
    /// How long the splash step stays up before moving to the first question.
    pub splash_delay: Duration,
    /// Simulated latency of the mock provider.
    pub provider_latency: Duration,
    /// A provider call still running after this long counts as failed.
    pub provider_timeout: Duration,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            splash_delay: Duration::from_millis(2500),
            provider_latency: Duration::from_millis(1500),
            provider_timeout: Duration::from_secs(10),
        }
    }
}

impl WizardConfig {
    /// Defaults overridden by `TASTE_*_MS` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            splash_delay: read_millis(&lookup, SPLASH_DELAY_ENV)?.unwrap_or(defaults.splash_delay),
            provider_latency: read_millis(&lookup, PROVIDER_LATENCY_ENV)?
                .unwrap_or(defaults.provider_latency),
            provider_timeout: read_millis(&lookup, PROVIDER_TIMEOUT_ENV)?
                .unwrap_or(defaults.provider_timeout),
        })
    }
}

fn read_millis(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<Duration>> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|e| FlowError::Config(format!("{key}={raw:?} is not a number of milliseconds: {e}")))
}
