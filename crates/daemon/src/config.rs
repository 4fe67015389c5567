//! Daemon configuration, loaded from a TOML file with CLI overrides.

use std::time::Duration;

use serde::Deserialize;

use flowreap_engine::{CleanupConfig, FilterStrategy};

/// Errors raised while loading or interpreting configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("unable to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML of the expected shape.
    #[error("unable to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A duration string could not be parsed.
    #[error("invalid duration {input:?}: {reason}")]
    InvalidDuration {
        /// The offending value.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An unknown filter strategy name.
    #[error("{0}")]
    InvalidStrategy(String),
}

/// Top-level daemon configuration.
///
/// Durations are Go-style strings (`"10m"`, `"1h30m"`, `"90s"`), kept
/// as strings here and parsed on use so that a bad value fails the run
/// before any network call.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Base URL of the workflow engine.
    pub engine_url: String,
    /// Age threshold; finished instances older than this are deleted.
    pub max_age: String,
    /// Page size per history request.
    pub batch_size: usize,
    /// Eligibility strategy: `"server"` or `"client"`.
    pub strategy: FilterStrategy,
    /// How often to repeat the cleanup pass. Absent or `"-"` means run
    /// exactly once.
    pub interval: Option<String>,
    /// IANA timezone name used for the engine's `finishedBefore`
    /// comparisons.
    pub timezone: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            engine_url: "http://localhost:8080".to_string(),
            // 28 days.
            max_age: "672h".to_string(),
            batch_size: 100,
            strategy: FilterStrategy::default(),
            interval: None,
            timezone: "Europe/Berlin".to_string(),
            timeout_secs: 30,
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Build the engine-facing cleanup configuration.
    pub fn cleanup_config(&self) -> Result<CleanupConfig, ConfigError> {
        Ok(CleanupConfig {
            max_age: parse_duration(&self.max_age)?,
            batch_size: self.batch_size,
            strategy: self.strategy,
        })
    }

    /// Effective repeat interval. `None` means run once and exit.
    pub fn interval(&self) -> Result<Option<Duration>, ConfigError> {
        match self.interval.as_deref() {
            None | Some("") | Some("-") => Ok(None),
            Some(raw) => Ok(Some(parse_duration(raw)?)),
        }
    }
}

/// Parse a Go-style duration string: one or more `<integer><unit>`
/// segments, units `h`, `m`, `s`, `ms` (e.g. `"10m"`, `"1h30m"`,
/// `"500ms"`).
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let reject = |reason: &str| ConfigError::InvalidDuration {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let s = input.trim();
    if s.is_empty() {
        return Err(reject("empty duration"));
    }

    let bytes = s.as_bytes();
    let mut total = Duration::ZERO;
    let mut i = 0;
    while i < bytes.len() {
        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == digits_start {
            return Err(reject("expected a number"));
        }
        let value: u64 = s[digits_start..i]
            .parse()
            .map_err(|_| reject("number out of range"))?;

        let unit_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_digit() {
            i += 1;
        }
        let segment = match &s[unit_start..i] {
            "h" => value.checked_mul(60 * 60).map(Duration::from_secs),
            "m" => value.checked_mul(60).map(Duration::from_secs),
            "s" => Some(Duration::from_secs(value)),
            "ms" => Some(Duration::from_millis(value)),
            "" => return Err(reject("missing unit")),
            _ => return Err(reject("unknown unit, expected h, m, s or ms")),
        }
        .ok_or_else(|| reject("duration out of range"))?;

        total = total
            .checked_add(segment)
            .ok_or_else(|| reject("duration out of range"))?;
    }
    Ok(total)
}
