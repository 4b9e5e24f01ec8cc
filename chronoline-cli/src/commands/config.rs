use anyhow::Result;
use chronoline_core::config::ChronolineConfig;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config_path = ChronolineConfig::config_path()?;
    let config = ChronolineConfig::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!();
    println!("{}", "Effective configuration".bold());
    for line in config.to_toml()?.lines() {
        println!("  {line}");
    }

    Ok(())
}
