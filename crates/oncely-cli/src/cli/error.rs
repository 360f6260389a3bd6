//! Errors raised by CLI actions, classified by the retry policy.

use oncely_core::retry::Failure;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Injected failure from `oncely simulate`.
    #[error("simulated {kind} failure on attempt {attempt}")]
    Simulated { kind: String, attempt: u32 },
    /// State file changed between read and write.
    #[error("state file changed (expected version {expected}, found {found})")]
    Conflict { expected: u64, found: u64 },
    #[error("state file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("state file {} is not valid: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Failure for CliError {
    fn kind(&self) -> &str {
        match self {
            CliError::Simulated { kind, .. } => kind,
            CliError::Conflict { .. } => "conflict",
            CliError::Io { .. } => "io",
            CliError::Corrupt { .. } => "illegal_argument",
        }
    }
}
