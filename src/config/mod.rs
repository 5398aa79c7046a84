//! Environment-driven configuration.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_UPDATE_CRON: &str = "0 30 22 * * *";

/// Deployment environment name (`APP_ENV`), defaults to `sandbox`.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_redis_url() -> String {
    env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

pub fn get_questdb_url() -> String {
    env::var("QUESTDB_URL")
        .unwrap_or_else(|_| "host=localhost port=8812 user=admin password=quest dbname=qdb".to_string())
}

/// Directory holding JSON signal files and file-backed documents.
pub fn get_data_dir() -> PathBuf {
    env::var("REGIME_DATA_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Where raw signals come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalSource {
    JsonFiles,
    QuestDb,
}

impl FromStr for SignalSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "file" | "files" => Ok(SignalSource::JsonFiles),
            "questdb" | "quest" => Ok(SignalSource::QuestDb),
            other => Err(format!("unknown signal source '{}'", other)),
        }
    }
}

/// Where the result record and confidence history are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    File,
    Redis,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(CacheBackend::File),
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Crisis-score cut-offs for the coarse rule-based regime label.
///
/// Must stay monotonic: `neutral < bear < recession_watch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegimeThresholds {
    pub neutral: u8,
    pub bear: u8,
    pub recession_watch: u8,
}

impl RegimeThresholds {
    pub const NEUTRAL: u8 = 15;
    pub const BEAR: u8 = 40;
    pub const RECESSION_WATCH: u8 = 65;

    pub fn is_monotonic(&self) -> bool {
        self.neutral < self.bear && self.bear < self.recession_watch && self.recession_watch <= 100
    }
}

impl Default for RegimeThresholds {
    fn default() -> Self {
        Self {
            neutral: Self::NEUTRAL,
            bear: Self::BEAR,
            recession_watch: Self::RECESSION_WATCH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    pub signal_source: SignalSource,
    pub cache_backend: CacheBackend,
    /// Six-field cron expression (seconds first).
    pub update_cron: String,
    pub run_once: bool,
    pub thresholds: RegimeThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            signal_source: SignalSource::JsonFiles,
            cache_backend: CacheBackend::File,
            update_cron: DEFAULT_UPDATE_CRON.to_string(),
            run_once: false,
            thresholds: RegimeThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment.
    ///
    /// Unparseable values are logged and replaced with defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let thresholds = RegimeThresholds {
            neutral: parse_env("REGIME_NEUTRAL_SCORE").unwrap_or(RegimeThresholds::NEUTRAL),
            bear: parse_env("REGIME_BEAR_SCORE").unwrap_or(RegimeThresholds::BEAR),
            recession_watch: parse_env("REGIME_RECESSION_SCORE")
                .unwrap_or(RegimeThresholds::RECESSION_WATCH),
        };
        let thresholds = if thresholds.is_monotonic() {
            thresholds
        } else {
            warn!(?thresholds, "Regime thresholds are not monotonic, using defaults");
            RegimeThresholds::default()
        };

        Self {
            data_dir: get_data_dir(),
            signal_source: parse_env("SIGNAL_SOURCE").unwrap_or(defaults.signal_source),
            cache_backend: parse_env("CACHE_BACKEND").unwrap_or(defaults.cache_backend),
            update_cron: env::var("REGIME_UPDATE_CRON").unwrap_or(defaults.update_cron),
            run_once: parse_env::<bool>("RUN_ONCE").unwrap_or(false),
            thresholds,
        }
    }
}

fn parse_env<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(name).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(variable = name, value = %raw, error = %e, "Ignoring invalid {}", name);
            None
        }
    }
}
