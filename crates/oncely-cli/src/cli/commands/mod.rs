//! CLI command handlers, one per file.

mod once;
mod show_config;
mod simulate;

pub use once::run_once;
pub use show_config::run_show_config;
pub use simulate::run_simulate;
