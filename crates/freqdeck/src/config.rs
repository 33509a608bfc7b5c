use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::effects::parallax::DEFAULT_PARALLAX_STRENGTH;
use crate::effects::particles::DEFAULT_PARTICLE_COUNT;
use crate::navigation::{DEFAULT_SWIPE_THRESHOLD, DEFAULT_WHEEL_COOLDOWN};
use crate::visualizer::DEFAULT_BAR_COUNT;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "freqdeck";

pub const VALID_KEYS: &[&str] = &[
    "defaults.volume",
    "defaults.autostart",
    "defaults.typewriter",
    "navigation.swipe_threshold",
    "navigation.wheel_cooldown_ms",
    "effects.particles",
    "effects.parallax",
    "effects.bars",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<EffectsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autostart: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typewriter: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swipe_threshold: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheel_cooldown_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectsConfig {
    /// Number of floating particles on the title slide
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub particles: Option<usize>,

    /// Maximum parallax offset in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallax: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bars: Option<usize>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `freqdeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    /// Load the config at `path`, or the defaults when no file exists yet.
    /// A file that exists but does not parse is an error.
    pub fn load_existing(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
                .map_err(|e| anyhow::anyhow!("Invalid config at {}: {e}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_or_default() -> Self {
        let path = match Self::path() {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("using default config: {e}");
                return Self::default();
            }
        };
        match Self::load_existing(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("ignoring config, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# freqdeck configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.volume" => {
                let volume: f32 = value
                    .parse()
                    .ok()
                    .filter(|v: &f32| (0.0..=1.0).contains(v))
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid volume: {value}. Must be between 0.0 and 1.0.")
                    })?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .volume = Some(volume);
            }
            "defaults.autostart" => {
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .autostart = Some(parse_bool(key, value)?);
            }
            "defaults.typewriter" => {
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .typewriter = Some(parse_bool(key, value)?);
            }
            "navigation.swipe_threshold" => {
                let threshold: f32 = value
                    .parse()
                    .ok()
                    .filter(|v: &f32| v.is_finite() && *v > 0.0)
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid swipe_threshold: {value}. Must be a positive number of pixels."
                        )
                    })?;
                self.navigation
                    .get_or_insert_with(NavigationConfig::default)
                    .swipe_threshold = Some(threshold);
            }
            "navigation.wheel_cooldown_ms" => {
                let ms: u64 = value.parse().map_err(|_| {
                    anyhow::anyhow!(
                        "Invalid wheel_cooldown_ms: {value}. Must be a whole number of milliseconds."
                    )
                })?;
                self.navigation
                    .get_or_insert_with(NavigationConfig::default)
                    .wheel_cooldown_ms = Some(ms);
            }
            "effects.particles" => {
                let count: usize = value.parse().map_err(|_| {
                    anyhow::anyhow!("Invalid particles: {value}. Must be a whole number.")
                })?;
                self.effects
                    .get_or_insert_with(EffectsConfig::default)
                    .particles = Some(count);
            }
            "effects.parallax" => {
                let strength: f32 = value
                    .parse()
                    .ok()
                    .filter(|v: &f32| v.is_finite() && *v >= 0.0)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid parallax: {value}. Must be a number >= 0.")
                    })?;
                self.effects
                    .get_or_insert_with(EffectsConfig::default)
                    .parallax = Some(strength);
            }
            "effects.bars" => {
                let bars: usize = value
                    .parse()
                    .ok()
                    .filter(|v| *v > 0)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid bars: {value}. Must be a positive whole number.")
                    })?;
                self.effects.get_or_insert_with(EffectsConfig::default).bars = Some(bars);
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: {}",
                VALID_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    pub fn volume(&self) -> f32 {
        self.defaults
            .as_ref()
            .and_then(|d| d.volume)
            .unwrap_or(1.0)
    }

    pub fn autostart(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.autostart)
            .unwrap_or(false)
    }

    pub fn typewriter(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.typewriter)
            .unwrap_or(false)
    }

    pub fn swipe_threshold(&self) -> f32 {
        self.navigation
            .as_ref()
            .and_then(|n| n.swipe_threshold)
            .unwrap_or(DEFAULT_SWIPE_THRESHOLD)
    }

    pub fn wheel_cooldown(&self) -> Duration {
        self.navigation
            .as_ref()
            .and_then(|n| n.wheel_cooldown_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_WHEEL_COOLDOWN)
    }

    pub fn particles(&self) -> usize {
        self.effects
            .as_ref()
            .and_then(|e| e.particles)
            .unwrap_or(DEFAULT_PARTICLE_COUNT)
    }

    pub fn parallax(&self) -> f32 {
        self.effects
            .as_ref()
            .and_then(|e| e.parallax)
            .unwrap_or(DEFAULT_PARALLAX_STRENGTH)
    }

    pub fn bars(&self) -> usize {
        self.effects
            .as_ref()
            .and_then(|e| e.bars)
            .unwrap_or(DEFAULT_BAR_COUNT)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("Invalid {key}: {value}. Must be 'true' or 'false'."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::default();
        assert_eq!(config.volume(), 1.0);
        assert!(!config.autostart());
        assert!(!config.typewriter());
        assert_eq!(config.swipe_threshold(), 50.0);
        assert_eq!(config.wheel_cooldown(), Duration::from_millis(500));
        assert_eq!(config.particles(), 50);
        assert_eq!(config.parallax(), 20.0);
        assert_eq!(config.bars(), 24);
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = "navigation:\n  wheel_cooldown_ms: 250\neffects:\n  particles: 0\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.wheel_cooldown(), Duration::from_millis(250));
        assert_eq!(config.particles(), 0);
        assert_eq!(config.swipe_threshold(), 50.0);
    }

    #[test]
    fn test_set_valid_keys() {
        let mut config = Config::default();
        config.set("defaults.volume", "0.4").unwrap();
        config.set("defaults.autostart", "yes").unwrap();
        config.set("navigation.swipe_threshold", "80").unwrap();
        config.set("effects.bars", "32").unwrap();
        assert_eq!(config.volume(), 0.4);
        assert!(config.autostart());
        assert_eq!(config.swipe_threshold(), 80.0);
        assert_eq!(config.bars(), 32);
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.volume", "1.5").is_err());
        assert!(config.set("defaults.typewriter", "maybe").is_err());
        assert!(config.set("navigation.swipe_threshold", "0").is_err());
        assert!(config.set("navigation.wheel_cooldown_ms", "-1").is_err());
        assert!(config.set("effects.bars", "0").is_err());
        assert!(config.defaults.is_none());
        assert!(config.navigation.is_none());
    }

    #[test]
    fn test_set_unknown_key_lists_valid_keys() {
        let mut config = Config::default();
        let err = config.set("defaults.theme", "dark").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Unknown config key"));
        assert!(msg.contains("navigation.wheel_cooldown_ms"));
    }

    #[test]
    fn test_load_existing_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_existing(&dir.path().join(FILENAME)).unwrap();
        assert!(config.defaults.is_none());
        assert_eq!(config.volume(), 1.0);
    }

    #[test]
    fn test_load_existing_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILENAME);
        std::fs::write(&path, "effects:\n  particles: lots\n").unwrap();
        let err = Config::load_existing(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_save_to_then_load_keeps_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(APP_DIR).join(FILENAME);
        let mut config = Config::default();
        config.set("navigation.wheel_cooldown_ms", "300").unwrap();
        config.save_to(&path).unwrap();
        let loaded = Config::load_existing(&path).unwrap();
        assert_eq!(loaded.wheel_cooldown(), Duration::from_millis(300));
    }

    #[test]
    fn test_serialization_skips_unset_sections() {
        let mut config = Config::default();
        config.set("effects.parallax", "10").unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("parallax"));
        assert!(!yaml.contains("defaults"));
        assert!(!yaml.contains("navigation"));
    }
}
