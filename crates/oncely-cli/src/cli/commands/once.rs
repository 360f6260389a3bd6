//! `oncely once` – print a message at most once, tracked by a state file.

use anyhow::{Context, Result};
use oncely_core::arbiter;
use oncely_core::config::OncelyConfig;
use oncely_core::retry::RetryExecutor;
use std::path::Path;

use crate::cli::{catalog, CliError, JsonFileStore};

pub fn run_once(cfg: &OncelyConfig, state: &Path, name: Option<&str>, message: &str) -> Result<()> {
    let exec = RetryExecutor::from_config(&cfg.retry, &catalog())?;
    let spec = match name {
        Some(name) => exec.named(name),
        None => exec.anonymous(),
    };

    let outcome = arbiter::call(spec, JsonFileStore::new(state), || {
        println!("{message}");
        Ok::<_, CliError>(())
    })
    .with_context(|| format!("running task tracked by {}", state.display()))?;

    if outcome.executed() {
        tracing::info!(state = %state.display(), "task executed");
    } else {
        println!(
            "already done (state version {}); task not run",
            outcome.status.version
        );
    }
    Ok(())
}
