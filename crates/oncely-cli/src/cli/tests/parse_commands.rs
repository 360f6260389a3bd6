//! Tests for simulate, once and config subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_simulate_defaults() {
    match parse(&["oncely", "simulate"]).command {
        CliCommand::Simulate {
            name,
            failures,
            kind,
            fallback,
        } => {
            assert!(name.is_none());
            assert_eq!(failures, 0);
            assert_eq!(kind, "runtime");
            assert!(fallback.is_none());
        }
        _ => panic!("expected Simulate"),
    }
}

#[test]
fn cli_parse_simulate_all_flags() {
    match parse(&[
        "oncely",
        "simulate",
        "--name",
        "charge-card",
        "--failures",
        "2",
        "--kind",
        "illegal_argument",
        "--fallback",
        "cached",
    ])
    .command
    {
        CliCommand::Simulate {
            name,
            failures,
            kind,
            fallback,
        } => {
            assert_eq!(name.as_deref(), Some("charge-card"));
            assert_eq!(failures, 2);
            assert_eq!(kind, "illegal_argument");
            assert_eq!(fallback.as_deref(), Some("cached"));
        }
        _ => panic!("expected Simulate with flags"),
    }
}

#[test]
fn cli_parse_once() {
    match parse(&["oncely", "once", "--state", "/tmp/job.json"]).command {
        CliCommand::Once {
            state,
            name,
            message,
        } => {
            assert_eq!(state, Path::new("/tmp/job.json"));
            assert!(name.is_none());
            assert_eq!(message, "task executed");
        }
        _ => panic!("expected Once"),
    }
}

#[test]
fn cli_parse_once_requires_state() {
    assert!(Cli::try_parse_from(["oncely", "once"]).is_err());
}

#[test]
fn cli_parse_config_with_global_path() {
    let cli = parse(&["oncely", "config", "--config", "/etc/oncely.toml"]);
    assert!(matches!(cli.command, CliCommand::Config));
    assert_eq!(cli.config.as_deref(), Some(Path::new("/etc/oncely.toml")));
}

#[test]
fn cli_parse_rejects_non_numeric_failures() {
    assert!(Cli::try_parse_from(["oncely", "simulate", "--failures", "many"]).is_err());
}
