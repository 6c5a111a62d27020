//! # Gatehouse Config
//!
//! Typed configuration for the Gatehouse edge pipeline.
//!
//! This crate provides:
//!
//! - [`GatehouseConfig`] - the root configuration type with per-section
//!   defaults, validation, and development/production presets
//! - [`RouteManifest`] / [`CompiledManifest`] - static path-prefix
//!   classification (`public` / `auth` / `protected`) with role-gated
//!   sub-trees, compiled once at startup for O(log n) lookups
//! - [`ConfigLoader`] - layered loading: defaults → TOML/JSON file →
//!   environment variables
//!
//! # Example
//!
//! ```
//! use gatehouse_config::{ConfigLoader, RouteClass};
//!
//! let config = ConfigLoader::new().load().expect("defaults are valid");
//! let manifest = config.routes.manifest.compile();
//! assert_eq!(manifest.classify("/dashboard"), RouteClass::Protected);
//! ```

#![doc(html_root_url = "https://docs.rs/gatehouse-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod manifest;
mod schema;

pub use config::{GatehouseConfig, GatehouseConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use manifest::{CompiledManifest, RoleGate, RouteClass, RouteManifest};
pub use schema::{
    AuthConfig, LocaleConfig, LogFormat, MaintenanceConfig, PlatformConfig, RoutesConfig,
    TelemetryConfigSection,
};
