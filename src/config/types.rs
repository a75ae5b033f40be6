//! Configuration types for a tenant.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{CoverageTarget, PaymentRule, RuleKind, RuleScope};

/// Metadata about the tenant.
#[derive(Debug, Clone, Deserialize)]
pub struct TenantMetadata {
    /// The tenant identifier.
    pub id: String,
    /// The human-readable name of the tenant.
    pub name: String,
    /// ISO currency code amounts are expressed in.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "BRL".to_string()
}

/// Engine settings from settings.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Hours used when no override, time entry or schedule gives any.
    pub default_daily_hours: Decimal,
    /// Decimal places money is rounded to.
    #[serde(default = "default_money_scale")]
    pub money_scale: u32,
    /// Include every active person in the day, not only those with activity.
    #[serde(default)]
    pub include_unscheduled: bool,
}

fn default_money_scale() -> u32 {
    2
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_daily_hours: Decimal::new(8, 0),
            money_scale: default_money_scale(),
            include_unscheduled: false,
        }
    }
}

/// The default payment rule for a role.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleDefaultRule {
    /// How the amount is applied.
    pub kind: RuleKind,
    /// The rate.
    pub amount: Decimal,
}

/// A role in the tenant's catalogue.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleConfig {
    /// The human-readable name of the role.
    pub name: String,
    /// The rule applied to holders of the role without a person-level rule.
    #[serde(default)]
    pub default_rule: Option<RoleDefaultRule>,
}

/// Roles configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct RolesConfig {
    /// Map of role code to role details.
    pub roles: BTreeMap<String, RoleConfig>,
}

/// Coverage configuration file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverageConfig {
    /// Minimum headcount targets.
    #[serde(default)]
    pub targets: Vec<CoverageTarget>,
}

/// The complete tenant configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct TenantConfig {
    metadata: TenantMetadata,
    settings: EngineSettings,
    roles: BTreeMap<String, RoleConfig>,
    coverage: Vec<CoverageTarget>,
}

impl TenantConfig {
    /// Creates a new TenantConfig from its component parts.
    pub fn new(
        metadata: TenantMetadata,
        settings: EngineSettings,
        roles: BTreeMap<String, RoleConfig>,
        coverage: Vec<CoverageTarget>,
    ) -> Self {
        Self {
            metadata,
            settings,
            roles,
            coverage,
        }
    }

    /// Returns the tenant metadata.
    pub fn tenant(&self) -> &TenantMetadata {
        &self.metadata
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the role catalogue.
    pub fn roles(&self) -> &BTreeMap<String, RoleConfig> {
        &self.roles
    }

    /// Returns the coverage targets.
    pub fn coverage_targets(&self) -> &[CoverageTarget] {
        &self.coverage
    }

    /// Returns the role defaults as role-scoped payment rules, ordered by role code.
    pub fn role_default_rules(&self) -> Vec<PaymentRule> {
        self.roles
            .iter()
            .filter_map(|(code, role)| {
                role.default_rule.as_ref().map(|rule| PaymentRule {
                    id: format!("role_default:{}", code),
                    scope: RuleScope::Role(code.clone()),
                    kind: rule.kind,
                    amount: rule.amount,
                    effective_from: None,
                })
            })
            .collect()
    }
}
