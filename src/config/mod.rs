//! Configuration loading and management for the Daily Payment Engine.
//!
//! This module provides functionality to load tenant configurations from YAML
//! files, including tenant metadata, engine settings, the role catalogue with
//! default payment rules, and coverage targets.
//!
//! # Example
//!
//! ```no_run
//! use daily_pay_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/demo").unwrap();
//! println!("Loaded tenant: {}", config.tenant().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CoverageConfig, EngineSettings, RoleConfig, RoleDefaultRule, RolesConfig, TenantConfig,
    TenantMetadata,
};
