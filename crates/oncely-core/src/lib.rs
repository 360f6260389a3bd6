pub mod config;
pub mod logging;

pub mod arbiter;
pub mod retry;
