//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tenant
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{CoverageTarget, PaymentRule};

use super::types::{CoverageConfig, EngineSettings, RolesConfig, TenantConfig, TenantMetadata};

/// Loads and provides access to tenant configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query settings, roles and coverage targets.
///
/// # Directory Structure
///
/// ```text
/// config/demo/
/// ├── tenant.yaml     # Tenant metadata
/// ├── settings.yaml   # Default hours, rounding, roster inclusion
/// ├── roles.yaml      # Role catalogue with default payment rules
/// └── coverage.yaml   # Optional coverage targets
/// ```
///
/// # Example
///
/// ```no_run
/// use daily_pay_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/demo").unwrap();
/// println!("Tenant: {}", loader.tenant().name);
/// println!("Default hours: {}", loader.settings().default_daily_hours);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: TenantConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any required field is missing from the configuration
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<TenantMetadata>(&path.join("tenant.yaml"))?;
        let settings = Self::load_yaml::<EngineSettings>(&path.join("settings.yaml"))?;
        let roles = Self::load_yaml::<RolesConfig>(&path.join("roles.yaml"))?;

        // coverage.yaml is optional
        let coverage_path = path.join("coverage.yaml");
        let coverage = if coverage_path.exists() {
            Self::load_yaml::<CoverageConfig>(&coverage_path)?
        } else {
            CoverageConfig::default()
        };

        debug!(
            tenant_id = %metadata.id,
            roles = roles.roles.len(),
            coverage_targets = coverage.targets.len(),
            "Loaded tenant configuration"
        );

        Ok(Self {
            config: TenantConfig::new(metadata, settings, roles.roles, coverage.targets),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: TenantConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying tenant configuration.
    pub fn config(&self) -> &TenantConfig {
        &self.config
    }

    /// Returns the tenant metadata.
    pub fn tenant(&self) -> &TenantMetadata {
        self.config.tenant()
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        self.config.settings()
    }

    /// Returns the role defaults as payment rules.
    pub fn role_default_rules(&self) -> Vec<PaymentRule> {
        self.config.role_default_rules()
    }

    /// Returns the configured coverage targets.
    pub fn coverage_targets(&self) -> &[CoverageTarget] {
        self.config.coverage_targets()
    }
}
