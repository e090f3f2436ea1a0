use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::nav::{DEFAULT_SETTLE, DEFAULT_VISIBILITY_THRESHOLD};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "slidenav";

pub const VALID_KEYS: &str = "defaults.theme, defaults.start_slide, navigation.settle_ms, navigation.visibility_threshold";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// 1-indexed slide to open on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_slide: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// How long visibility tracking stays muted after a programmatic scroll.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_threshold: Option<f32>,
}

/// Navigation tuning with defaults filled in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationSettings {
    pub settle: Duration,
    pub visibility_threshold: f32,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            settle: DEFAULT_SETTLE,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {e}", path.display()))?;
        let config: Config = serde_yaml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Read `path`, treating a missing file as the defaults. Unreadable or invalid
    /// files are still errors.
    pub fn load_existing(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    pub fn load_or_default() -> Self {
        let loaded = Self::path().and_then(|path| Self::load_existing(&path));
        match loaded {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("ignoring configuration: {err:#}");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# slidenav configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn theme(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.theme.as_deref())
    }

    pub fn start_slide(&self) -> Option<usize> {
        self.defaults.as_ref().and_then(|d| d.start_slide)
    }

    pub fn navigation_settings(&self) -> NavigationSettings {
        let mut settings = NavigationSettings::default();
        if let Some(nav) = &self.navigation {
            match nav.settle_ms {
                Some(ms) if valid_settle_ms(ms) => settings.settle = Duration::from_millis(ms),
                Some(ms) => {
                    tracing::warn!(settle_ms = ms, "settle_ms must be positive, using default")
                }
                None => {}
            }
            match nav.visibility_threshold {
                Some(t) if valid_threshold(t) => settings.visibility_threshold = t,
                Some(t) => tracing::warn!(
                    visibility_threshold = t,
                    "visibility_threshold must be in (0, 1], using default"
                ),
                None => {}
            }
        }
        settings
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.start_slide" => {
                let slide = match value.parse::<usize>() {
                    Ok(n) if n >= 1 => n,
                    _ => anyhow::bail!(
                        "Invalid start_slide: {value}. Must be a slide number starting at 1."
                    ),
                };
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .start_slide = Some(slide);
            }
            "navigation.settle_ms" => {
                let ms = match value.parse::<u64>() {
                    Ok(n) if valid_settle_ms(n) => n,
                    _ => anyhow::bail!(
                        "Invalid settle_ms: {value}. Must be a positive number of milliseconds."
                    ),
                };
                self.navigation
                    .get_or_insert_with(NavigationConfig::default)
                    .settle_ms = Some(ms);
            }
            "navigation.visibility_threshold" => {
                let threshold = match value.parse::<f32>() {
                    Ok(t) if valid_threshold(t) => t,
                    _ => anyhow::bail!(
                        "Invalid visibility_threshold: {value}. Must be greater than 0 and at most 1."
                    ),
                };
                self.navigation
                    .get_or_insert_with(NavigationConfig::default)
                    .visibility_threshold = Some(threshold);
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {VALID_KEYS}"),
        }
        Ok(())
    }
}

fn valid_settle_ms(ms: u64) -> bool {
    ms > 0
}

fn valid_threshold(threshold: f32) -> bool {
    threshold > 0.0 && threshold <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.navigation_settings(), NavigationSettings::default());
        assert_eq!(
            config.navigation_settings().settle,
            Duration::from_millis(800)
        );
        assert_eq!(config.theme(), None);
        assert_eq!(config.start_slide(), None);
    }

    #[test]
    fn test_set_valid_keys() {
        let mut config = Config::default();
        config.set("defaults.theme", "dark").unwrap();
        config.set("defaults.start_slide", "3").unwrap();
        config.set("navigation.settle_ms", "650").unwrap();
        config.set("navigation.visibility_threshold", "0.6").unwrap();

        assert_eq!(config.theme(), Some("dark"));
        assert_eq!(config.start_slide(), Some(3));
        let settings = config.navigation_settings();
        assert_eq!(settings.settle, Duration::from_millis(650));
        assert_eq!(settings.visibility_threshold, 0.6);
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.theme", "blue").is_err());
        assert!(config.set("defaults.start_slide", "0").is_err());
        assert!(config.set("navigation.settle_ms", "0").is_err());
        assert!(config.set("navigation.settle_ms", "soon").is_err());
        assert!(config.set("navigation.visibility_threshold", "1.5").is_err());
        assert!(config.set("navigation.visibility_threshold", "0").is_err());
        assert!(config.set("defaults.aspect", "16:9").is_err());
        assert!(config.defaults.is_none());
        assert!(config.navigation.is_none());
    }

    #[test]
    fn test_yaml_round_trip_on_disk() {
        let dir = std::env::temp_dir().join(format!("slidenav-config-{}", std::process::id()));
        let path = dir.join(FILENAME);
        let mut config = Config::default();
        config.set("navigation.settle_ms", "1200").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(
            loaded.navigation_settings().settle,
            Duration::from_millis(1200)
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let config = Config::load_existing(Path::new("/nonexistent/slidenav/config.yaml")).unwrap();
        assert!(config.defaults.is_none());
        assert!(config.navigation.is_none());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = std::env::temp_dir().join(format!("slidenav-bad-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(FILENAME);
        std::fs::write(&path, "navigation: [not, a, map\n").unwrap();

        let err = Config::load_existing(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_hand_edited_out_of_range_values_fall_back() {
        let config: Config = serde_yaml::from_str(
            "navigation:\n  settle_ms: 0\n  visibility_threshold: 1.5\n",
        )
        .unwrap();
        assert_eq!(config.navigation_settings(), NavigationSettings::default());

        let config: Config =
            serde_yaml::from_str("navigation:\n  visibility_threshold: 0.0\n").unwrap();
        assert_eq!(
            config.navigation_settings().visibility_threshold,
            DEFAULT_VISIBILITY_THRESHOLD
        );

        let config: Config = serde_yaml::from_str(
            "navigation:\n  settle_ms: 300\n  visibility_threshold: 0.7\n",
        )
        .unwrap();
        let settings = config.navigation_settings();
        assert_eq!(settings.settle, Duration::from_millis(300));
        assert_eq!(settings.visibility_threshold, 0.7);
    }
}
