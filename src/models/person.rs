//! Person model and related types.
//!
//! This module defines the [`Person`] struct and [`EmploymentType`] enum
//! for representing the people on a tenant's roster.

use serde::{Deserialize, Serialize};

/// Represents how a person is engaged, which decides what is payable day by day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Salaried staff: the base amount is covered by payroll, only extras are paid daily.
    Salaried,
    /// Contractors and daily workers: the full day total is paid out.
    Contractor,
}

/// Represents a person on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier for the person.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The role code (e.g., "nurse", "cook"), used for role default rules.
    pub role_id: String,
    /// The unit (site, ward, store) the person belongs to, if any.
    #[serde(default)]
    pub unit_id: Option<String>,
    /// The type of engagement.
    pub employment_type: EmploymentType,
    /// The PIX key payouts are sent to.
    #[serde(default)]
    pub pix_key: Option<String>,
    /// Inactive people are never included in a day's computation.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Person {
    /// Returns true if the person has a non-blank PIX key.
    pub fn has_pix_key(&self) -> bool {
        self.pix_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}
