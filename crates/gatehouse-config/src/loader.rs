//! Configuration loader with layered approach.
//!
//! The loader applies configuration in layers, later layers overriding
//! earlier ones:
//! 1. Default values (or a preset)
//! 2. Configuration file (TOML or JSON)
//! 3. Environment variables

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, GatehouseConfig, LogFormat};

/// Layered configuration loader.
///
/// # Example
///
/// ```no_run
/// use gatehouse_config::ConfigLoader;
///
/// # fn main() -> Result<(), gatehouse_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_file("gatehouse.toml")?
///     .with_env_prefix("GATEHOUSE")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: GatehouseConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader starting from default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: GatehouseConfig::default(),
            env_prefix: None,
        }
    }

    /// Start from the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = GatehouseConfig::development();
        self
    }

    /// Start from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = GatehouseConfig::production();
        self
    }

    /// Load configuration from a file. TOML (`.toml`) and JSON (`.json`)
    /// are supported, selected by extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, or
    /// contains invalid or unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        self.config = Self::parse(&content, path)?;
        Ok(self)
    }

    /// Load configuration from a file if it exists; otherwise continue
    /// with the current layers.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` only if the file exists but cannot be
    /// loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from an inline TOML string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` on invalid TOML.
    pub fn with_toml_str(mut self, content: &str) -> Result<Self, ConfigError> {
        self.config = toml::from_str(content)
            .map_err(|e| ConfigError::parse_error("<inline>", e.to_string()))?;
        Ok(self)
    }

    /// Enable environment-variable overrides with the given prefix.
    ///
    /// A `.env` file in the working directory is honored. Recognized
    /// variables (shown for prefix `GATEHOUSE`):
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `GATEHOUSE_ROOT_DOMAIN` | `platform.root_domain` |
    /// | `GATEHOUSE_CANONICAL_SCHEME` | `platform.canonical_scheme` |
    /// | `GATEHOUSE_MAINTENANCE_ENABLED` | `maintenance.enabled` |
    /// | `GATEHOUSE_DEV_BYPASS` | `auth.dev_bypass` |
    /// | `GATEHOUSE_LOG_LEVEL` | `telemetry.log_level` |
    /// | `GATEHOUSE_LOG_FORMAT` | `telemetry.log_format` (`json`/`pretty`) |
    /// | `GATEHOUSE_ENVIRONMENT` | `telemetry.environment` |
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Apply all layers, validate, and return the final configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on invalid environment values or failed
    /// validation.
    pub fn load(mut self) -> Result<GatehouseConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            dotenvy::dotenv().ok();
            self.apply_env(&prefix)?;
        }
        self.config.validate()?;
        Ok(self.config)
    }

    fn parse(content: &str, path: &Path) -> Result<GatehouseConfig, ConfigError> {
        let display = path.display().to_string();
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => {
                toml::from_str(content).map_err(|e| ConfigError::parse_error(display, e.to_string()))
            }
            Some("json") => serde_json::from_str(content)
                .map_err(|e| ConfigError::parse_error(display, e.to_string())),
            other => Err(ConfigError::parse_error(
                display,
                format!("unsupported extension: {other:?} (expected .toml or .json)"),
            )),
        }
    }

    fn apply_env(&mut self, prefix: &str) -> Result<(), ConfigError> {
        if let Ok(value) = env::var(format!("{prefix}_ROOT_DOMAIN")) {
            self.config.platform.root_domain = value;
        }
        if let Ok(value) = env::var(format!("{prefix}_CANONICAL_SCHEME")) {
            self.config.platform.canonical_scheme = value;
        }
        if let Ok(value) = env::var(format!("{prefix}_MAINTENANCE_ENABLED")) {
            self.config.maintenance.enabled = parse_bool("maintenance.enabled", &value)?;
        }
        if let Ok(value) = env::var(format!("{prefix}_DEV_BYPASS")) {
            self.config.auth.dev_bypass = parse_bool("auth.dev_bypass", &value)?;
        }
        if let Ok(value) = env::var(format!("{prefix}_LOG_LEVEL")) {
            self.config.telemetry.log_level = value;
        }
        if let Ok(value) = env::var(format!("{prefix}_LOG_FORMAT")) {
            self.config.telemetry.log_format = match value.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                other => {
                    return Err(ConfigError::invalid_value(
                        "telemetry.log_format",
                        format!("expected 'json' or 'pretty', got '{other}'"),
                    ))
                }
            };
        }
        if let Ok(value) = env::var(format!("{prefix}_ENVIRONMENT")) {
            self.config.telemetry.environment = value;
        }
        Ok(())
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::invalid_value(
            field,
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
