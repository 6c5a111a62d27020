//! Main configuration types.
//!
//! This module provides the top-level [`GatehouseConfig`] struct and its
//! builder.

use serde::{Deserialize, Serialize};

use crate::{
    AuthConfig, ConfigError, LocaleConfig, LogFormat, MaintenanceConfig, PlatformConfig,
    RoutesConfig, TelemetryConfigSection,
};

/// Complete Gatehouse pipeline configuration.
///
/// This is the root configuration type containing all sections. Use
/// [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use gatehouse_config::GatehouseConfig;
///
/// let config = GatehouseConfig::default();
/// assert_eq!(config.platform.root_domain, "example.com");
/// assert!(!config.maintenance.enabled);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GatehouseConfig {
    /// Platform identity and tenant routing conventions.
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Locale negotiation settings.
    #[serde(default)]
    pub locales: LocaleConfig,

    /// Route manifest and well-known paths.
    #[serde(default)]
    pub routes: RoutesConfig,

    /// Maintenance kill-switch.
    #[serde(default)]
    pub maintenance: MaintenanceConfig,

    /// Authorization gate settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Telemetry settings.
    #[serde(default)]
    pub telemetry: TelemetryConfigSection,
}

impl GatehouseConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> GatehouseConfigBuilder {
        GatehouseConfigBuilder::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - the root domain is empty or carries a scheme or port
    /// - the default locale is not in the supported set
    /// - the tenant path prefix is empty or contains `/`
    /// - a well-known path does not start with `/`
    /// - the login path is classified `protected` (redirect loop)
    pub fn validate(&self) -> Result<(), ConfigError> {
        let domain = &self.platform.root_domain;
        if domain.is_empty() {
            return Err(ConfigError::invalid_value(
                "platform.root_domain",
                "must not be empty",
            ));
        }
        if domain.contains("://") || domain.contains(':') || domain.contains('/') {
            return Err(ConfigError::invalid_value(
                "platform.root_domain",
                format!("must be a bare domain, got {domain}"),
            ));
        }

        if !self.locales.supported.contains(&self.locales.default) {
            return Err(ConfigError::invalid_value(
                "locales.default",
                "default locale must be listed in locales.supported",
            ));
        }

        let prefix = &self.platform.tenant_path_prefix;
        if prefix.is_empty() || prefix.contains('/') {
            return Err(ConfigError::invalid_value(
                "platform.tenant_path_prefix",
                "must be a single non-empty path segment",
            ));
        }

        for (field, path) in [
            ("routes.login_path", &self.routes.login_path),
            ("routes.landing_path", &self.routes.landing_path),
            ("routes.onboarding_path", &self.routes.onboarding_path),
            ("routes.maintenance_page", &self.routes.maintenance_page),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::invalid_value(field, "must start with '/'"));
            }
        }

        let compiled = self.routes.manifest.compile();
        if compiled.classify(&self.routes.login_path) == crate::RouteClass::Protected {
            return Err(ConfigError::validation_error(
                "routes.login_path must not be classified protected: unauthenticated \
                 visitors would be redirected to login in a loop",
            ));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty logs at debug level, dev auth bypass left off, staging
    /// environment label.
    ///
    /// # Example
    ///
    /// ```
    /// use gatehouse_config::GatehouseConfig;
    ///
    /// let config = GatehouseConfig::development();
    /// assert_eq!(config.telemetry.log_level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.telemetry.log_level = "debug".to_string();
        config.telemetry.log_format = LogFormat::Pretty;
        config.telemetry.environment = "development".to_string();
        config
    }

    /// Create a production configuration preset.
    ///
    /// JSON logs at info level, visitor events on.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.telemetry.log_level = "info".to_string();
        config.telemetry.log_format = LogFormat::Json;
        config.telemetry.environment = "production".to_string();
        config
    }
}

/// Builder for [`GatehouseConfig`].
#[derive(Debug, Default)]
pub struct GatehouseConfigBuilder {
    platform: Option<PlatformConfig>,
    locales: Option<LocaleConfig>,
    routes: Option<RoutesConfig>,
    maintenance: Option<MaintenanceConfig>,
    auth: Option<AuthConfig>,
    telemetry: Option<TelemetryConfigSection>,
}

impl GatehouseConfigBuilder {
    /// Sets the platform section.
    #[must_use]
    pub fn platform(mut self, platform: PlatformConfig) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Sets the locales section.
    #[must_use]
    pub fn locales(mut self, locales: LocaleConfig) -> Self {
        self.locales = Some(locales);
        self
    }

    /// Sets the routes section.
    #[must_use]
    pub fn routes(mut self, routes: RoutesConfig) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Sets the maintenance section.
    #[must_use]
    pub fn maintenance(mut self, maintenance: MaintenanceConfig) -> Self {
        self.maintenance = Some(maintenance);
        self
    }

    /// Sets the auth section.
    #[must_use]
    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the telemetry section.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetryConfigSection) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Builds the configuration, filling unset sections with defaults.
    #[must_use]
    pub fn build(self) -> GatehouseConfig {
        GatehouseConfig {
            platform: self.platform.unwrap_or_default(),
            locales: self.locales.unwrap_or_default(),
            routes: self.routes.unwrap_or_default(),
            maintenance: self.maintenance.unwrap_or_default(),
            auth: self.auth.unwrap_or_default(),
            telemetry: self.telemetry.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::Locale;

    #[test]
    fn test_default_config_is_valid() {
        let config = GatehouseConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides_sections() {
        let config = GatehouseConfig::builder()
            .platform(PlatformConfig {
                root_domain: "sites.test".to_string(),
                ..PlatformConfig::default()
            })
            .build();
        assert_eq!(config.platform.root_domain, "sites.test");
        assert_eq!(config.routes.login_path, "/login");
    }

    #[test]
    fn test_validate_rejects_domain_with_scheme() {
        let config = GatehouseConfig::builder()
            .platform(PlatformConfig {
                root_domain: "https://example.com".to_string(),
                ..PlatformConfig::default()
            })
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_default_locale_outside_supported() {
        let config = GatehouseConfig::builder()
            .locales(LocaleConfig {
                supported: vec![Locale::EsEs],
                default: Locale::EnUs,
                ..LocaleConfig::default()
            })
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_protected_login_path() {
        let mut routes = RoutesConfig::default();
        routes.login_path = "/dashboard/login".to_string();
        let config = GatehouseConfig::builder().routes(routes).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_slashed_tenant_prefix() {
        let config = GatehouseConfig::builder()
            .platform(PlatformConfig {
                tenant_path_prefix: "s/t".to_string(),
                ..PlatformConfig::default()
            })
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(GatehouseConfig::development().telemetry.log_format, LogFormat::Pretty);
        assert_eq!(GatehouseConfig::production().telemetry.log_format, LogFormat::Json);
    }
}
