//! Application state for the Daily Payment Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::ledger::DayLedger;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded tenant configuration and the day ledger.
#[derive(Clone)]
pub struct AppState {
    /// The loaded tenant configuration.
    config: Arc<ConfigLoader>,
    /// The day ledger.
    ledger: Arc<RwLock<DayLedger>>,
    /// Where the ledger is written after each mutation, if anywhere.
    state_path: Option<Arc<PathBuf>>,
}

impl AppState {
    /// Creates a new application state with an empty in-memory ledger.
    pub fn new(config: ConfigLoader) -> Self {
        let ledger = DayLedger::new(config.tenant().id.clone());
        Self::with_ledger(config, ledger, None)
    }

    /// Creates a new application state around an existing ledger.
    ///
    /// When `state_path` is set, the ledger is saved there after every
    /// successful mutation.
    pub fn with_ledger(config: ConfigLoader, ledger: DayLedger, state_path: Option<PathBuf>) -> Self {
        Self {
            config: Arc::new(config),
            ledger: Arc::new(RwLock::new(ledger)),
            state_path: state_path.map(Arc::new),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the shared ledger.
    pub fn ledger(&self) -> &RwLock<DayLedger> {
        &self.ledger
    }

    /// Applies a mutation under the write lock and persists the ledger.
    ///
    /// The mutation runs on a copy that replaces the shared ledger only once
    /// it is saved, so a failed mutation or save leaves memory and disk as
    /// they were.
    pub async fn mutate<T, F>(&self, mutation: F) -> EngineResult<T>
    where
        F: FnOnce(&mut DayLedger, &ConfigLoader) -> EngineResult<T>,
    {
        let mut ledger = self.ledger.write().await;
        let mut draft = ledger.clone();
        let value = mutation(&mut draft, self.config.as_ref())?;
        if let Some(path) = &self.state_path {
            draft.save_to(path.as_path())?;
        }
        *ledger = draft;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmploymentType, Person};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn test_config() -> ConfigLoader {
        ConfigLoader::load("./config/demo").expect("Failed to load config")
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn create_test_person() -> Person {
        Person {
            id: "p_001".to_string(),
            name: "Ana Souza".to_string(),
            role_id: "nurse".to_string(),
            unit_id: None,
            employment_type: EmploymentType::Contractor,
            pix_key: None,
            active: true,
        }
    }

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_new_state_has_tenant_ledger() {
        let state = AppState::new(test_config());
        assert_eq!(state.ledger().read().await.tenant_id(), "demo");
    }

    #[tokio::test]
    async fn test_mutate_persists_to_state_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");
        let state = AppState::with_ledger(test_config(), DayLedger::new("demo"), Some(path.clone()));

        state
            .mutate(|ledger, _| ledger.upsert_person(create_test_person(), "admin"))
            .await
            .unwrap();

        let saved = DayLedger::load_from(&path).unwrap();
        assert_eq!(saved.people().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_mutate_does_not_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");
        let state = AppState::with_ledger(test_config(), DayLedger::new("demo"), Some(path.clone()));

        let result = state
            .mutate(|ledger, _| {
                ledger.upsert_person(create_test_person(), "admin")?;
                ledger.remove_adjustment(test_date(), "adj_missing", "admin")
            })
            .await;
        assert!(result.is_err());
        assert!(!path.exists());

        let ledger = state.ledger().read().await;
        assert!(ledger.people().is_empty());
        assert!(ledger.audit_log().is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_rolls_back_memory() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("ledger.json");
        let state = AppState::with_ledger(test_config(), DayLedger::new("demo"), Some(path.clone()));

        let result = state
            .mutate(|ledger, _| ledger.upsert_person(create_test_person(), "admin"))
            .await;
        assert!(result.is_err());
        assert!(!path.exists());

        let ledger = state.ledger().read().await;
        assert!(ledger.people().is_empty());
        assert!(ledger.audit_log().is_empty());
    }
}
