//! Initialize a hive project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<String>, force: bool) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing hive in {}...", "→".blue(), base_path.display());
    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let config_path = base_path.join(CONFIG_FILE);
    if config_path.exists() && !force {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    } else {
        Config::default().save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    }

    println!();
    println!("{} Hive initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} hive run --ticks 200", "1.".blue());
    println!("  {} hive run --events | jq .event", "2.".blue());
    println!("  {} hive decide work", "3.".blue());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_writes_a_loadable_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("apiary");
        run(Some(target.display().to_string()), false).unwrap();

        let path = target.join(CONFIG_FILE);
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.swarm.max_bees, 1000);

        std::fs::write(&path, "[run]\nticks = 5\n").unwrap();
        run(Some(target.display().to_string()), false).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().run.ticks, 5);
    }
}
