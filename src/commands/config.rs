use std::path::Path;

use anyhow::Result;
use calgrid_core::config::BuilderConfig;
use owo_colors::OwoColorize;

pub fn run(config: &BuilderConfig, source: &Path) -> Result<()> {
    let origin = if source.exists() {
        source.display().to_string()
    } else {
        format!("defaults ({} not found)", source.display())
    };

    println!("{}", format!("# {}", origin).dimmed());
    print!("{}", config.to_toml()?);

    Ok(())
}
