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
    let config = if path.exists() {
        Config::load_from(&path)?
    } else {
        println!(
            "{}",
            format!("No config file at {}; showing defaults.", path.display()).yellow()
        );
        Config::default()
    };

    println!("{}", path.display().to_string().dimmed());
    for (key, value) in resolved_values(&config) {
        println!("  {:<30} {}", key.bold(), value);
    }
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let path = Config::path()?;
    set_at(&path, key, value)?;
    println!("{} {} = {}", "Saved".green().bold(), key, value.cyan());
    println!("{}", path.display().to_string().dimmed());
    Ok(())
}

/// Apply one key to the config file at `path`. An unreadable existing file
/// is left untouched.
fn set_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_existing(path)?;
    config.set(key, value)?;
    config.save_to(path)
}

fn resolved_values(config: &Config) -> Vec<(&'static str, String)> {
    vec![
        ("defaults.volume", config.volume().to_string()),
        ("defaults.autostart", config.autostart().to_string()),
        ("defaults.typewriter", config.typewriter().to_string()),
        (
            "navigation.swipe_threshold",
            config.swipe_threshold().to_string(),
        ),
        (
            "navigation.wheel_cooldown_ms",
            config.wheel_cooldown().as_millis().to_string(),
        ),
        ("effects.particles", config.particles().to_string()),
        ("effects.parallax", config.parallax().to_string()),
        ("effects.bars", config.bars().to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VALID_KEYS;

    #[test]
    fn test_show_lists_every_settable_key() {
        let keys: Vec<&str> = resolved_values(&Config::default())
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, VALID_KEYS);
    }

    #[test]
    fn test_resolved_values_reflect_overrides() {
        let mut config = Config::default();
        config.set("navigation.wheel_cooldown_ms", "750").unwrap();
        let values = resolved_values(&config);
        assert!(values.contains(&("navigation.wheel_cooldown_ms", "750".to_string())));
    }

    #[test]
    fn test_set_keeps_existing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "navigation:\n  wheel_cooldown_ms: 300\n").unwrap();
        set_at(&path, "defaults.volume", "0.5").unwrap();
        let config = Config::load_existing(&path).unwrap();
        assert_eq!(config.volume(), 0.5);
        assert_eq!(config.wheel_cooldown().as_millis(), 300);
    }

    #[test]
    fn test_set_refuses_to_overwrite_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let original = "navigation:\n  wheel_cooldown_ms: 300\neffects:\n  particles: lots\n";
        std::fs::write(&path, original).unwrap();
        assert!(set_at(&path, "defaults.volume", "0.5").is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_set_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("freqdeck").join("config.yaml");
        set_at(&path, "effects.bars", "16").unwrap();
        assert_eq!(Config::load_existing(&path).unwrap().bars(), 16);
    }

    #[test]
    fn test_invalid_value_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        assert!(set_at(&path, "defaults.volume", "2").is_err());
        assert!(!path.exists());
    }
}
