//! Subscriber setup for the client's `tracing` events.
//!
//! The client only emits events. Applications without a subscriber of their
//! own can install one with [`LoggingConfig::init`]. `RUST_LOG`, when set,
//! replaces the configured levels.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::errors::{DataForSeoError, DataForSeoResult};

const CRATE_TARGET: &str = "integrations_dataforseo";

/// How events are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-readable.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
    /// One line per event.
    Compact,
}

impl FromStr for LogFormat {
    type Err = DataForSeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(DataForSeoError::configuration(format!(
                "Unknown log format '{other}', expected pretty, json or compact"
            ))),
        }
    }
}

/// Levels and output format for [`init`](LoggingConfig::init).
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level for this crate's events.
    pub level: Level,
    /// Level for every other target, such as `reqwest` and `hyper`.
    pub dependency_level: Level,
    /// Output format.
    pub format: LogFormat,
    /// Include the source file and line of each event.
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            dependency_level: Level::WARN,
            format: LogFormat::default(),
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Info for this crate, warnings for everything else, pretty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `DATAFORSEO_LOG_LEVEL` and `DATAFORSEO_LOG_FORMAT`. Missing or
    /// unparseable values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(level) = env_value("DATAFORSEO_LOG_LEVEL") {
            config.level = level;
        }
        if let Some(format) = env_value("DATAFORSEO_LOG_FORMAT") {
            config.format = format;
        }
        config
    }

    /// Sets this crate's level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the level for other targets.
    #[must_use]
    pub fn with_dependency_level(mut self, level: Level) -> Self {
        self.dependency_level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Includes file and line in every event.
    #[must_use]
    pub fn with_source_location(mut self, enabled: bool) -> Self {
        self.source_location = enabled;
        self
    }

    /// `EnvFilter` directives for the configured levels.
    pub fn directives(&self) -> String {
        format!(
            "{},{CRATE_TARGET}={}",
            self.dependency_level.as_str().to_ascii_lowercase(),
            self.level.as_str().to_ascii_lowercase()
        )
    }

    /// Installs a global subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`DataForSeoError::Configuration`] if a global subscriber is
    /// already installed.
    pub fn init(&self) -> DataForSeoResult<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.directives()));

        let output: Box<dyn Layer<Registry> + Send + Sync> = match self.format {
            LogFormat::Pretty => fmt::layer()
                .pretty()
                .with_file(self.source_location)
                .with_line_number(self.source_location)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .flatten_event(true)
                .with_file(self.source_location)
                .with_line_number(self.source_location)
                .boxed(),
            LogFormat::Compact => fmt::layer().compact().with_target(false).boxed(),
        };

        tracing_subscriber::registry()
            .with(output)
            .with(filter)
            .try_init()
            .map_err(|e| DataForSeoError::configuration(format!("Logging already initialized: {e}")))
    }
}

fn env_value<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
