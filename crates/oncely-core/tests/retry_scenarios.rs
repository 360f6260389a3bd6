//! Integration test: retry behavior configured from TOML, observed through events.

use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use oncely_core::config::OncelyConfig;
use oncely_core::retry::{
    AttemptOutcome, ConfigError, ErrorCatalog, Failure, RetryEvent, RetryExecutor,
    TerminationReason,
};

#[derive(Debug)]
enum ServiceError {
    Runtime(&'static str),
    IllegalArgument(&'static str),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Runtime(m) => write!(f, "RuntimeException: {m}"),
            ServiceError::IllegalArgument(m) => write!(f, "IllegalArgumentException: {m}"),
        }
    }
}

impl Failure for ServiceError {
    fn kind(&self) -> &str {
        match self {
            ServiceError::Runtime(_) => "runtime",
            ServiceError::IllegalArgument(_) => "illegal_argument",
        }
    }
}

const CONFIG: &str = r#"
[retry]
maxAttempts = 3
initialInterval = 50
multiplier = 2
maxInterval = 1000
jitter = 10
retryableExceptions = ["runtime"]
nonRetryableExceptions = ["illegal_argument"]
"#;

fn catalog() -> ErrorCatalog {
    ErrorCatalog::new()
        .declare("runtime", None)
        .declare("illegal_argument", Some("runtime"))
}

struct Harness {
    exec: RetryExecutor,
    events: Arc<Mutex<Vec<RetryEvent>>>,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

fn harness() -> Harness {
    let cfg: OncelyConfig = toml::from_str(CONFIG).unwrap();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sleeps = Arc::new(Mutex::new(Vec::new()));
    let (ev, sl) = (events.clone(), sleeps.clone());
    let exec = RetryExecutor::new(cfg.retry.policy(&catalog()).unwrap())
        .with_seed(17)
        .with_listener(move |e: &RetryEvent| ev.lock().unwrap().push(e.clone()))
        .with_sleeper(move |d| sl.lock().unwrap().push(d));
    Harness {
        exec,
        events,
        sleeps,
    }
}

#[test]
fn no_errors_invokes_once_per_call() {
    let h = harness();
    let calls = Cell::new(0);
    let service = || -> Result<&'static str, ServiceError> {
        calls.set(calls.get() + 1);
        Ok("No errors")
    };
    assert_eq!(h.exec.anonymous().call(service).execute().unwrap(), "No errors");
    assert_eq!(
        h.exec.anonymous().call(service).fallback(|_| "Fallback"),
        "No errors"
    );
    assert_eq!(calls.get(), 2);
}

#[test]
fn retryable_exception_consumes_all_attempts_in_both_calls() {
    let h = harness();
    let calls = Cell::new(0);
    let service = || -> Result<&'static str, ServiceError> {
        calls.set(calls.get() + 1);
        Err(ServiceError::Runtime("Test exception"))
    };

    let err = h.exec.anonymous().call(service).execute().unwrap_err();
    assert!(matches!(err, ServiceError::Runtime(_)));
    assert_eq!(
        h.exec.anonymous().call(service).fallback(|_| "Fallback"),
        "Fallback"
    );
    assert_eq!(calls.get(), 6);

    let events = h.events.lock().unwrap();
    let exhausted = events
        .iter()
        .filter(|e| matches!(e, RetryEvent::Termination(t) if t.reason == TerminationReason::Exhausted))
        .count();
    assert_eq!(exhausted, 2);
    assert_eq!(h.sleeps.lock().unwrap().len(), 4);
}

#[test]
fn non_retryable_exception_invokes_once_per_call() {
    let h = harness();
    let calls = Cell::new(0);
    let service = || -> Result<(), ServiceError> {
        calls.set(calls.get() + 1);
        Err(ServiceError::IllegalArgument("Test exception"))
    };

    assert!(h.exec.anonymous().run(service).execute().is_err());
    h.exec.anonymous().run(service).fallback(|_| {});
    assert_eq!(calls.get(), 2);
    assert!(h.sleeps.lock().unwrap().is_empty());

    let events = h.events.lock().unwrap();
    let last = events.last().unwrap().to_string();
    assert!(last.starts_with("Retry policy terminated after 1/3 attempts failed."));
}

#[test]
fn retry_then_success_reports_failed_then_succeeded() {
    let h = harness();
    let calls = Cell::new(0);
    let out = h
        .exec
        .named("retry-once")
        .call(|| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Err(ServiceError::Runtime("Test exception"))
            } else {
                Ok("Retry once, then succeed")
            }
        })
        .execute()
        .unwrap();
    assert_eq!(out, "Retry once, then succeed");

    let events = h.events.lock().unwrap();
    let outcomes: Vec<AttemptOutcome> = events
        .iter()
        .map(|e| match e {
            RetryEvent::Attempt(a) => a.outcome,
            RetryEvent::Termination(_) => panic!("no termination expected"),
        })
        .collect();
    assert_eq!(outcomes, vec![AttemptOutcome::Failed, AttemptOutcome::Succeeded]);
    assert!(events.iter().all(|e| e.to_string().ends_with("-- retry-once")));

    let sleeps = h.sleeps.lock().unwrap();
    assert_eq!(sleeps.len(), 1);
    assert!(sleeps[0] >= Duration::from_millis(50) && sleeps[0] <= Duration::from_millis(60));
}

#[test]
fn unknown_kind_in_config_fails_fast() {
    let cfg: OncelyConfig =
        toml::from_str("[retry]\nretryableExceptions = [\"no_such_kind\"]\n").unwrap();
    let err = RetryExecutor::from_config(&cfg.retry, &catalog()).err().unwrap();
    assert_eq!(err, ConfigError::UnknownKind("no_such_kind".into()));
}
