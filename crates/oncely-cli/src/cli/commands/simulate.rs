//! `oncely simulate` – exercise the retry policy with an injected failure sequence.

use anyhow::Result;
use oncely_core::config::OncelyConfig;
use oncely_core::retry::{RetryEvent, RetryExecutor};
use std::cell::Cell;

use crate::cli::{catalog, CliError};

pub fn run_simulate(
    cfg: &OncelyConfig,
    name: Option<&str>,
    failures: u32,
    kind: &str,
    fallback: Option<&str>,
) -> Result<()> {
    let exec = RetryExecutor::from_config(&cfg.retry, &catalog())?.with_listener(
        |event: &RetryEvent| {
            tracing::info!("{event}");
            println!("{event}");
        },
    );
    let spec = match name {
        Some(name) => exec.named(name),
        None => exec.anonymous(),
    };

    let invocations = Cell::new(0u32);
    let action = || {
        let attempt = invocations.get() + 1;
        invocations.set(attempt);
        if attempt <= failures {
            Err(CliError::Simulated {
                kind: kind.to_owned(),
                attempt,
            })
        } else {
            Ok(format!("succeeded on attempt {attempt}"))
        }
    };

    let outcome = match fallback {
        Some(value) => spec
            .call(action)
            .fallback(|err: CliError| format!("fallback {value} after: {err}")),
        None => spec.call(action).execute()?,
    };
    println!("{outcome}");
    println!("invocations: {}", invocations.get());
    Ok(())
}
