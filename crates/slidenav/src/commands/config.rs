use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    let settings = config.navigation_settings();

    println!("{} {}", "Config file:".bold(), path.display());
    println!();
    println!("{}", "defaults".bold());
    println!(
        "  theme:                {}",
        display_or_default(config.theme(), "dark")
    );
    println!(
        "  start_slide:          {}",
        display_or_default(
            config.start_slide().map(|n| n.to_string()).as_deref(),
            "1"
        )
    );
    println!("{}", "navigation".bold());
    println!(
        "  settle_ms:            {}",
        settings.settle.as_millis().to_string().cyan()
    );
    println!(
        "  visibility_threshold: {}",
        settings.visibility_threshold.to_string().cyan()
    );
    Ok(())
}

fn display_or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) => v.cyan().to_string(),
        None => format!("{} {}", default, "(default)".dimmed()),
    }
}

fn set(key: &str, value: &str) -> Result<()> {
    let path = Config::path()?;
    set_at(&path, key, value)?;
    println!(
        "{} {} = {} ({})",
        "Saved".green(),
        key.bold(),
        value.cyan(),
        path.display()
    );
    Ok(())
}

/// Update one key in the file at `path`. A broken file is reported rather than
/// replaced by one holding only `key`.
fn set_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_existing(path)?;
    config.set(key, value)?;
    config.save_to(path)
}
