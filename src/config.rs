//! Configuration management for the avalanche forecast skill
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AvalancheError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AvalancheConfig {
    /// Upstream forecast feed
    pub source: SourceConfig,
    /// Snapshot cache
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Spoken fallback messages
    pub skill: SkillConfig,
}

/// Upstream forecast feed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Map-layer URL
    pub url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Retries for transient failures, applied by the HTTP middleware
    pub max_retries: u32,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Snapshot TTL in hours
    pub ttl_hours: u32,
    /// Store directory location
    pub location: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    /// Apologies spoken when a request cannot be answered; one is picked at random
    pub apology_messages: Vec<String>,
}

// Default value functions
fn default_source_url() -> String {
    "http://avalanche.org/wp-admin/admin-ajax.php?action=map_layer".to_string()
}

fn default_source_timeout() -> u32 {
    10
}

fn default_cache_ttl() -> u32 {
    10
}

fn default_cache_location() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join("avalanche-forecast"))
        .unwrap_or_else(|| PathBuf::from(".cache/avalanche-forecast"))
        .to_string_lossy()
        .into_owned()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_apology_messages() -> Vec<String> {
    vec![
        "Hmmm. I can't seem to figure that one out.".to_string(),
        "There's a chance I misunderstood you, but I don't know how to answer your question."
            .to_string(),
        "I'm sorry. I don't know how to help you with that.".to_string(),
    ]
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            timeout_seconds: default_source_timeout(),
            max_retries: 0,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_cache_ttl(),
            location: default_cache_location(),
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

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            apology_messages: default_apology_messages(),
        }
    }
}

impl AvalancheConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

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

        // AVALANCHE__CACHE__TTL_HOURS=6 overrides cache.ttl_hours
        builder = builder.add_source(
            Environment::with_prefix("AVALANCHE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AvalancheConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("avalanche-forecast").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.source.url.is_empty() {
            self.source.url = default_source_url();
        }
        if self.source.timeout_seconds == 0 {
            self.source.timeout_seconds = default_source_timeout();
        }
        if self.cache.ttl_hours == 0 {
            self.cache.ttl_hours = default_cache_ttl();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_cache_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.skill.apology_messages.is_empty() {
            self.skill.apology_messages = default_apology_messages();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.source.timeout_seconds > 300 {
            return Err(AvalancheError::config(
                "Forecast source timeout cannot exceed 300 seconds",
            )
            .into());
        }

        if self.source.max_retries > 10 {
            return Err(
                AvalancheError::config("Forecast source max retries cannot exceed 10").into(),
            );
        }

        if self.cache.ttl_hours == 0 || self.cache.ttl_hours > 168 {
            return Err(AvalancheError::config(
                "Cache TTL must be between 1 and 168 hours (1 week)",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AvalancheError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AvalancheError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.source.url.starts_with("http://") && !self.source.url.starts_with("https://") {
            return Err(AvalancheError::config(
                "Forecast source URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if self.skill.apology_messages.iter().any(|m| m.trim().is_empty()) {
            return Err(AvalancheError::config("Apology messages cannot be blank").into());
        }

        Ok(())
    }
}
