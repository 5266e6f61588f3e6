use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;
use thiserror::Error;

use crate::adapters::traits::{
    ExtractContext, DEFAULT_HTTP_TIMEOUT, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_SCROLL_SETTLE,
};
use crate::clock::{RunClock, DEFAULT_RECENCY_HOURS};
use crate::session::browser::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use crate::session::BrowserOptions;
use crate::sources::{self, SourceEntry};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to read sources file {path}: {source}")]
    SourcesRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse sources file {path}: {source}")]
    SourcesParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Output
    pub output_path: PathBuf,

    // Run policy
    pub recency_window_hours: u32,
    pub politeness_delay: Duration,

    // Page loading
    pub navigation_timeout: Duration,
    pub scroll_settle: Duration,
    pub http_timeout: Duration,

    // Browser
    pub chrome_path: Option<String>,
    pub viewport_width: u32,
    pub viewport_height: u32,

    // Registry override
    pub sources_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("jobs.json"),
            recency_window_hours: DEFAULT_RECENCY_HOURS,
            politeness_delay: Duration::from_millis(1000),
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            scroll_settle: DEFAULT_SCROLL_SETTLE,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            chrome_path: None,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            sources_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Output
            output_path: PathBuf::from(env_or_default("OUTPUT_PATH", "jobs.json")),

            // Run policy
            recency_window_hours: parse_env_u32("RECENCY_WINDOW_HOURS", DEFAULT_RECENCY_HOURS)?,
            politeness_delay: Duration::from_millis(parse_env_u64("POLITENESS_DELAY_MS", 1000)?),

            // Page loading
            navigation_timeout: Duration::from_secs(parse_env_u64("NAVIGATION_TIMEOUT_SECS", 60)?),
            scroll_settle: Duration::from_millis(parse_env_u64("SCROLL_SETTLE_MS", 3000)?),
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 15)?),

            // Browser
            chrome_path: optional_env("CHROME_PATH"),
            viewport_width: parse_env_u32("VIEWPORT_WIDTH", DEFAULT_VIEWPORT_WIDTH)?,
            viewport_height: parse_env_u32("VIEWPORT_HEIGHT", DEFAULT_VIEWPORT_HEIGHT)?,

            // Registry override
            sources_file: optional_env("SOURCES_FILE").map(PathBuf::from),
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the recency window or a timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recency_window_hours == 0 {
            return Err(ConfigError::InvalidValue {
                name: "RECENCY_WINDOW_HOURS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.navigation_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "NAVIGATION_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "HTTP_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ConfigError::InvalidValue {
                name: "VIEWPORT_WIDTH/VIEWPORT_HEIGHT".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn recency_window(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.recency_window_hours))
    }

    #[must_use]
    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
            request_timeout: self.navigation_timeout,
            chrome_path: self.chrome_path.clone(),
        }
    }

    /// Per-run adapter inputs for `clock`.
    #[must_use]
    pub fn extract_context(&self, clock: RunClock) -> ExtractContext {
        ExtractContext {
            clock,
            navigation_timeout: self.navigation_timeout,
            scroll_settle: self.scroll_settle,
            http_timeout: self.http_timeout,
        }
    }

    /// The source registry: the sources file when set, else the built-in list.
    ///
    /// # Errors
    ///
    /// Returns an error if the sources file cannot be read or parsed.
    pub fn sources(&self) -> Result<Vec<SourceEntry>, ConfigError> {
        match &self.sources_file {
            Some(path) => sources::load_sources(path),
            None => Ok(sources::default_sources()),
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    const VARS: [&str; 6] = [
        "OUTPUT_PATH",
        "RECENCY_WINDOW_HOURS",
        "POLITENESS_DELAY_MS",
        "NAVIGATION_TIMEOUT_SECS",
        "CHROME_PATH",
        "SOURCES_FILE",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.output_path, PathBuf::from("jobs.json"));
        assert_eq!(config.recency_window(), TimeDelta::hours(48));
        assert_eq!(config.politeness_delay, Duration::from_secs(1));
        assert_eq!(config.navigation_timeout, Duration::from_secs(60));
        assert!(config.chrome_path.is_none());
        assert!(config.validate().is_ok());
        assert_eq!(config.sources().unwrap().len(), 10);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("OUTPUT_PATH", "/tmp/feed.json");
        std::env::set_var("RECENCY_WINDOW_HOURS", "24");
        std::env::set_var("POLITENESS_DELAY_MS", "0");
        std::env::set_var("CHROME_PATH", "/usr/bin/chromium");

        let config = Config::from_env().unwrap();
        assert_eq!(config.output_path, PathBuf::from("/tmp/feed.json"));
        assert_eq!(config.recency_window(), TimeDelta::hours(24));
        assert!(config.politeness_delay.is_zero());
        assert_eq!(
            config.browser_options().chrome_path.as_deref(),
            Some("/usr/bin/chromium")
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_integer() {
        clear_env();
        std::env::set_var("RECENCY_WINDOW_HOURS", "two days");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::ParseInt { .. })
        ));
        clear_env();
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let config = Config {
            recency_window_hours: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            http_timeout: Duration::ZERO,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
