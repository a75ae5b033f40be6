//! JSON persistence for the day ledger.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::DayLedger;

fn state_error(path: &Path, message: impl ToString) -> EngineError {
    EngineError::StateIo {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Writes `data` to `path` through a tempfile in the same directory, so a
/// crash never leaves a partial state file behind.
fn atomic_write(path: &Path, data: &[u8]) -> EngineResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| state_error(path, e))?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| state_error(path, e))?;
    tmp.write_all(data).map_err(|e| state_error(path, e))?;
    tmp.persist(path).map_err(|e| state_error(path, e.error))?;
    Ok(())
}

impl DayLedger {
    /// Saves the ledger, audit log included, as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `StateIo` if the file cannot be written.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> EngineResult<()> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self).map_err(|e| state_error(path, e))?;
        atomic_write(path, data.as_bytes())?;
        info!(
            path = %path.display(),
            events = self.audit_log().len(),
            "Ledger saved"
        );
        Ok(())
    }

    /// Loads a ledger written by [`DayLedger::save_to`].
    ///
    /// # Errors
    ///
    /// Returns `StateIo` if the file cannot be read or is not a valid ledger.
    pub fn load_from<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| state_error(path, e))?;
        let ledger: DayLedger = serde_json::from_str(&data).map_err(|e| state_error(path, e))?;
        info!(
            path = %path.display(),
            tenant_id = %ledger.tenant_id(),
            events = ledger.audit_log().len(),
            "Ledger loaded"
        );
        Ok(ledger)
    }
}
