//! In-memory completion record with optimistic concurrency, shared across threads.

use std::fmt;
use std::sync::Mutex;

use oncely_core::arbiter::CompletionStore;
use oncely_core::retry::{ErrorCatalog, Failure};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Record changed since it was fetched.
    Conflict { expected: u64, found: u64 },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Conflict { expected, found } => {
                write!(f, "version conflict: expected {expected}, found {found}")
            }
        }
    }
}

impl Failure for StoreError {
    fn kind(&self) -> &str {
        match self {
            StoreError::Conflict { .. } => "conflict",
        }
    }
}

pub fn catalog() -> ErrorCatalog {
    ErrorCatalog::new()
        .declare("store", None)
        .declare("conflict", Some("store"))
        .declare("invalid", None)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub version: u64,
    pub done: bool,
}

#[derive(Debug, Default)]
pub struct VersionedStore {
    record: Mutex<(u64, bool)>,
}

impl VersionedStore {
    pub fn snapshot(&self) -> Record {
        let (version, done) = *self.record.lock().unwrap();
        Record { version, done }
    }
}

impl CompletionStore<StoreError> for &VersionedStore {
    type Status = Record;

    fn fetch_status(&mut self) -> Result<Record, StoreError> {
        Ok(self.snapshot())
    }

    fn is_done(&self, status: &Record) -> bool {
        status.done
    }

    fn mark_intent(&mut self, status: &Record) -> Result<(), StoreError> {
        let mut record = self.record.lock().unwrap();
        if record.0 != status.version {
            return Err(StoreError::Conflict {
                expected: status.version,
                found: record.0,
            });
        }
        *record = (record.0 + 1, true);
        Ok(())
    }
}
