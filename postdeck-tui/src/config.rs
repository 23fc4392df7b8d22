use anyhow::{Context, Result};
use postdeck_types::ColorScheme;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::DEFAULT_POSTS_ENDPOINT;

/// Request timeout used when nothing else is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User preferences stored locally
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub color_scheme: Option<ColorScheme>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Values given on the command line (or via environment, through clap)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub color_scheme: Option<ColorScheme>,
    pub timeout_secs: Option<u64>,
}

/// Effective runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub color_scheme: ColorScheme,
    pub request_timeout: Duration,
}

impl Settings {
    /// Resolve each setting by priority:
    /// 1. CLI argument (highest priority, includes POSTDECK_ENDPOINT)
    /// 2. Saved preferences file
    /// 3. Built-in default
    pub fn resolve(cli: CliOverrides, prefs: Option<&UserPreferences>) -> Self {
        let endpoint = cli
            .endpoint
            .or_else(|| prefs.and_then(|p| p.endpoint.clone()))
            .unwrap_or_else(|| DEFAULT_POSTS_ENDPOINT.to_string());

        let color_scheme = cli
            .color_scheme
            .or_else(|| prefs.and_then(|p| p.color_scheme))
            .unwrap_or_default();

        let timeout_secs = cli
            .timeout_secs
            .or_else(|| prefs.and_then(|p| p.request_timeout_secs))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            endpoint,
            color_scheme,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Convert to the preferences format for saving
    pub fn to_preferences(&self) -> UserPreferences {
        UserPreferences {
            endpoint: Some(self.endpoint.clone()),
            color_scheme: Some(self.color_scheme),
            request_timeout_secs: Some(self.request_timeout.as_secs()),
        }
    }

    /// Whether the post endpoint differs from the built-in one
    pub fn has_custom_endpoint(&self) -> bool {
        self.endpoint != DEFAULT_POSTS_ENDPOINT
    }
}

/// Configuration manager for the .postdeck directory
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a config manager rooted at ~/.postdeck
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Could not determine home directory")?;
        Self::with_dir(home_dir.join(".postdeck"))
    }

    /// Create a config manager rooted at an explicit directory
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create .postdeck directory")?;
        }

        Ok(Self { config_dir })
    }

    fn preferences_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    /// Save user preferences
    pub fn save_preferences(&self, prefs: &UserPreferences) -> Result<()> {
        let json = serde_json::to_string_pretty(prefs).context("Failed to serialize preferences")?;

        fs::write(self.preferences_file(), json).context("Failed to write preferences file")?;

        Ok(())
    }

    /// Load user preferences
    pub fn load_preferences(&self) -> Result<Option<UserPreferences>> {
        let prefs_file = self.preferences_file();

        if !prefs_file.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&prefs_file).context("Failed to read preferences file")?;

        let prefs: UserPreferences =
            serde_json::from_str(&json).context("Failed to parse preferences")?;

        Ok(Some(prefs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_cli_or_prefs() {
        let settings = Settings::resolve(CliOverrides::default(), None);

        assert_eq!(settings.endpoint, DEFAULT_POSTS_ENDPOINT);
        assert_eq!(settings.color_scheme, ColorScheme::Default);
        assert_eq!(settings.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(!settings.has_custom_endpoint());
    }

    #[test]
    fn test_cli_beats_preferences() {
        let prefs = UserPreferences {
            endpoint: Some("http://saved/posts".to_string()),
            color_scheme: Some(ColorScheme::Light),
            request_timeout_secs: Some(3),
        };
        let cli = CliOverrides {
            endpoint: Some("http://cli/posts".to_string()),
            color_scheme: None,
            timeout_secs: Some(30),
        };

        let settings = Settings::resolve(cli, Some(&prefs));

        assert_eq!(settings.endpoint, "http://cli/posts");
        assert_eq!(settings.color_scheme, ColorScheme::Light);
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert!(settings.has_custom_endpoint());
    }

    #[test]
    fn test_preferences_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_dir(dir.path().join("nested")).unwrap();

        assert_eq!(manager.load_preferences().unwrap(), None);

        let settings = Settings {
            endpoint: "http://saved/posts".to_string(),
            color_scheme: ColorScheme::Solarized,
            request_timeout: Duration::from_secs(7),
        };
        manager.save_preferences(&settings.to_preferences()).unwrap();

        let loaded = manager.load_preferences().unwrap().unwrap();
        assert_eq!(Settings::resolve(CliOverrides::default(), Some(&loaded)), settings);
    }

    #[test]
    fn test_partial_preferences_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_dir(dir.path()).unwrap();
        fs::write(dir.path().join("config.json"), r#"{ "color_scheme": "Dark" }"#).unwrap();

        let loaded = manager.load_preferences().unwrap().unwrap();

        assert_eq!(loaded.color_scheme, Some(ColorScheme::Dark));
        assert_eq!(loaded.endpoint, None);
    }

    #[test]
    fn test_corrupt_preferences_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_dir(dir.path()).unwrap();
        fs::write(dir.path().join("config.json"), "{ not json").unwrap();

        assert!(manager.load_preferences().is_err());
    }
}
