//! `oncely config` – show where the config lives and what is in effect.

use anyhow::Result;
use oncely_core::config::OncelyConfig;
use std::path::Path;

pub fn run_show_config(cfg: &OncelyConfig, path: &Path) -> Result<()> {
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
