use crate::ledger::ledger::Ledger;

use log::debug;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Whole-file snapshot persistence for the ledger.
///
/// The entire ledger is one pretty-printed JSON object, read fully before
/// any operation and overwritten fully after each successful mutation.
/// There is no file locking here: the [`Bank`](crate::bank::Bank) serializes
/// complete load→compute→save cycles, and the file is only ever written
/// after a computation has fully succeeded, so no partial snapshot can
/// exist on disk.
///
/// Constructed once at process start and handed to the service — no ambient
/// globals.
pub struct BalanceStore {
    path: PathBuf,
}

#[derive(Debug, PartialEq)]
pub enum StoreError {
    /// The snapshot file can't be read or written. Fatal for the current
    /// command; never retried.
    Io(String),

    /// The snapshot file exists but doesn't parse as a ledger.
    Malformed(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "snapshot unavailable: {}", msg),
            Self::Malformed(msg) => write!(f, "snapshot corrupted: {}", msg),
        }
    }
}

impl BalanceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the full ledger from the snapshot.
    ///
    /// A missing file is not an error: an empty snapshot is written out and
    /// an empty ledger returned, so the file exists from first contact on.
    pub fn load(&self) -> Result<Ledger, StoreError> {
        if !self.path.exists() {
            let empty = Ledger::new();
            self.save(&empty)?;
            debug!("initialized empty snapshot at {}", self.path.display());
            return Ok(empty);
        }

        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Overwrite the snapshot with the full ledger.
    pub fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(ledger)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
