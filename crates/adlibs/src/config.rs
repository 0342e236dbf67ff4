//! Configuration management for adlibs.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::theme::Theme;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "adlibs";

/// Longest forecast horizon accepted, in days.
pub const MAX_HORIZON_DAYS: u32 = 365;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ADLIBS_`)
/// 2. TOML config file at `~/.config/adlibs/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Synthetic data generator configuration.
    pub generator: GeneratorConfig,
    /// Record buffer configuration.
    pub buffer: BufferConfig,
    /// Dashboard presentation configuration.
    pub dashboard: DashboardConfig,
    /// Revenue forecast configuration.
    pub forecast: ForecastConfig,
    /// PDF report configuration.
    pub report: ReportConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the listener to.
    pub bind: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum number of viewer sessions remembered at once.
    pub max_sessions: usize,
}

/// Synthetic data generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Records generated per tick.
    pub batch_size: usize,
    /// Seconds between batches.
    pub interval_secs: u64,
    /// Optional RNG seed for reproducible data.
    pub seed: Option<u64>,
}

/// Record buffer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Maximum number of records retained (oldest evicted first).
    pub capacity: usize,
}

/// Dashboard presentation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Page title.
    pub title: String,
    /// Seconds between browser refreshes of the dashboard view.
    pub refresh_interval_secs: u64,
    /// Theme used when a request does not name one.
    pub default_theme: Theme,
}

/// Revenue forecast configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Date assigned to the oldest buffered record.
    pub start_date: NaiveDate,
    /// Days forecast beyond the history (1 to [`MAX_HORIZON_DAYS`]).
    pub horizon_days: u32,
}

/// PDF report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Prefix of generated report file names.
    pub file_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8050,
            request_timeout_secs: 30,
            max_sessions: 1024,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            interval_secs: 60,
            seed: None,
        }
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self { capacity: 50 }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Ad-Libs".to_string(),
            refresh_interval_secs: 300,
            default_theme: Theme::Light,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            horizon_days: 30,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            file_prefix: "ad_performance_report".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `ADLIBS_`, `__` separating sections)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("ADLIBS_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.buffer.capacity == 0 {
            return Err(invalid("buffer.capacity must be greater than 0"));
        }

        if self.generator.batch_size == 0 {
            return Err(invalid("generator.batch_size must be greater than 0"));
        }

        if self.generator.interval_secs == 0 {
            return Err(invalid("generator.interval_secs must be greater than 0"));
        }

        if self.dashboard.refresh_interval_secs == 0 {
            return Err(invalid(
                "dashboard.refresh_interval_secs must be greater than 0",
            ));
        }

        if self.server.max_sessions == 0 {
            return Err(invalid("server.max_sessions must be greater than 0"));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(invalid("server.request_timeout_secs must be greater than 0"));
        }

        if !(1..=MAX_HORIZON_DAYS).contains(&self.forecast.horizon_days) {
            return Err(invalid(&format!(
                "forecast.horizon_days must be between 1 and {MAX_HORIZON_DAYS}"
            )));
        }

        if self.report.file_prefix.trim().is_empty() {
            return Err(invalid("report.file_prefix cannot be empty"));
        }

        Ok(())
    }

    /// Get the socket address the server listens on.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.bind, self.server.port)
    }

    /// Get the generator interval as a Duration.
    #[must_use]
    pub fn generator_interval(&self) -> Duration {
        Duration::from_secs(self.generator.interval_secs)
    }

    /// Get the dashboard refresh interval as a Duration.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard.refresh_interval_secs)
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

fn invalid(message: &str) -> Error {
    Error::ConfigValidation {
        message: message.to_string(),
    }
}
