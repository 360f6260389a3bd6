//! JSON state file used as the completion store for `oncely once`.
//!
//! The file holds `{ "version": n, "done": bool }`. Marking intent re-reads
//! the file and refuses to write if the version moved since the caller's fetch,
//! then replaces the file atomically (temp file + rename). Two processes can
//! still interleave between that re-read and the rename; the file is not locked.

use oncely_core::arbiter::CompletionStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::error::CliError;

/// Contents of the state file. A missing file reads as the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    pub version: u64,
    pub done: bool,
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read(&self) -> Result<TaskState, CliError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(TaskState::default()),
            Err(e) => return Err(self.io_error(e)),
        };
        serde_json::from_str(&data).map_err(|source| CliError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, state: &TaskState) -> Result<(), CliError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        let json = serde_json::to_vec_pretty(state).map_err(|source| CliError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        tmp.write_all(&json).map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> CliError {
        CliError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CompletionStore<CliError> for JsonFileStore {
    type Status = TaskState;

    fn fetch_status(&mut self) -> Result<TaskState, CliError> {
        self.read()
    }

    fn is_done(&self, status: &TaskState) -> bool {
        status.done
    }

    fn mark_intent(&mut self, status: &TaskState) -> Result<(), CliError> {
        let current = self.read()?;
        if current.version != status.version {
            return Err(CliError::Conflict {
                expected: status.version,
                found: current.version,
            });
        }
        let next = TaskState {
            version: current.version + 1,
            done: true,
        };
        tracing::debug!(path = %self.path.display(), version = next.version, "marking task done");
        self.write(&next)
    }
}
