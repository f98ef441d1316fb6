//! Configuration management for the `DroneWx` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::DroneWxError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `DroneWx` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DroneWxConfig {
    /// Safety scoring settings
    #[serde(default)]
    pub safety: SafetyConfig,
    /// Forecast horizon settings
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Weather source settings
    #[serde(default)]
    pub source: SourceConfig,
    /// Flight planning settings
    #[serde(default)]
    pub planning: PlanningConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Safety scoring settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Minimum safety index for a forecast hour to count towards a safe window
    #[serde(default = "default_safe_threshold")]
    pub safe_threshold: u8,
}

/// Forecast horizon settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Hours returned by the current-weather operation
    #[serde(default = "default_current_hours")]
    pub current_hours: u32,
    /// Hours returned by the forecast operation when none are requested
    #[serde(default = "default_forecast_hours")]
    pub default_hours: u32,
    /// Largest horizon a caller may request
    #[serde(default = "default_max_hours")]
    pub max_hours: u32,
}

/// Weather source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Seed for the synthetic generator, random when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Simulated latency of a current-weather fetch in milliseconds
    #[serde(default = "default_current_latency")]
    pub current_latency_ms: u64,
    /// Simulated latency of a forecast fetch in milliseconds
    #[serde(default = "default_forecast_latency")]
    pub forecast_latency_ms: u64,
}

/// Flight planning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// Hours of forecast searched for a better start beyond the flight itself
    #[serde(default = "default_lookahead")]
    pub lookahead_hours: u32,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_safe_threshold() -> u8 {
    crate::safety::SAFE_THRESHOLD
}

fn default_current_hours() -> u32 {
    6
}

fn default_forecast_hours() -> u32 {
    6
}

fn default_max_hours() -> u32 {
    48
}

fn default_current_latency() -> u64 {
    400
}

fn default_forecast_latency() -> u64 {
    500
}

fn default_lookahead() -> u32 {
    6
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            safe_threshold: default_safe_threshold(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            current_hours: default_current_hours(),
            default_hours: default_forecast_hours(),
            max_hours: default_max_hours(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            seed: None,
            current_latency_ms: default_current_latency(),
            forecast_latency_ms: default_forecast_latency(),
        }
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            lookahead_hours: default_lookahead(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl DroneWxConfig {
    /// Load configuration from the given file (or the default location) and environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. DRONEWX_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("DRONEWX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DroneWxConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dronewx").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.safety.safe_threshold == 0 {
            self.safety.safe_threshold = default_safe_threshold();
        }
        if self.forecast.current_hours == 0 {
            self.forecast.current_hours = default_current_hours();
        }
        if self.forecast.default_hours == 0 {
            self.forecast.default_hours = default_forecast_hours();
        }
        if self.forecast.max_hours == 0 {
            self.forecast.max_hours = default_max_hours();
        }
        if self.planning.lookahead_hours == 0 {
            self.planning.lookahead_hours = default_lookahead();
        }
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.port == 0 {
            self.server.port = default_server_port();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.safety.safe_threshold > 100 {
            return Err(DroneWxError::config("Safe threshold cannot exceed 100").into());
        }

        if self.forecast.max_hours > 168 {
            return Err(
                DroneWxError::config("Forecast horizon cannot exceed 168 hours (1 week)").into(),
            );
        }

        if self.forecast.current_hours > self.forecast.max_hours
            || self.forecast.default_hours > self.forecast.max_hours
        {
            return Err(DroneWxError::config(format!(
                "Current and default forecast hours cannot exceed max_hours ({})",
                self.forecast.max_hours
            ))
            .into());
        }

        if self.source.current_latency_ms > 10_000 || self.source.forecast_latency_ms > 10_000 {
            return Err(
                DroneWxError::config("Simulated latency cannot exceed 10000 ms").into(),
            );
        }

        if self.planning.lookahead_hours > 48 {
            return Err(DroneWxError::config("Planning look-ahead cannot exceed 48 hours").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DroneWxError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DroneWxError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    /// Address the HTTP server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
