//! Optional user configuration
//!
//! Loaded from `~/.config/toolshed/config.toml`. Missing or unreadable
//! config never blocks startup; everything falls back to defaults.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::platform::PackageManager;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolshedConfig {
    /// Force a specific package manager instead of auto-detection
    /// ("apt", "dnf", "yum", "pacman", "brew").
    pub package_manager: Option<String>,
    /// Ask for confirmation before remove and purge.
    pub confirm_destructive: bool,
    /// Colorized output. Off also helps when piping.
    pub color: bool,
}

impl Default for ToolshedConfig {
    fn default() -> Self {
        Self {
            package_manager: None,
            confirm_destructive: true,
            color: true,
        }
    }
}

impl ToolshedConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("toolshed").join("config.toml"))
    }

    /// Load from the default location. A missing file is the default
    /// config; a malformed file is an error the caller may downgrade.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("invalid config at {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("no config directory on this platform")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))
    }

    /// The configured package-manager override, if it names one we know.
    pub fn package_manager_override(&self) -> Option<PackageManager> {
        self.package_manager
            .as_deref()
            .and_then(PackageManager::from_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ToolshedConfig::default();
        assert!(config.confirm_destructive);
        assert!(config.color);
        assert!(config.package_manager.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "package_manager = \"pacman\"\nconfirm_destructive = false\n",
        )
        .unwrap();

        let config = ToolshedConfig::load_from(&path).unwrap();
        assert_eq!(config.package_manager.as_deref(), Some("pacman"));
        assert!(!config.confirm_destructive);
        // Unspecified fields keep their defaults.
        assert!(config.color);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "confirm_destructive = \"maybe\"").unwrap();
        assert!(ToolshedConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_round_trip() {
        let config = ToolshedConfig {
            package_manager: Some("apt".to_string()),
            confirm_destructive: false,
            color: false,
        };
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: ToolshedConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_package_manager_override() {
        let config = ToolshedConfig {
            package_manager: Some("Homebrew".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.package_manager_override(),
            Some(PackageManager::Brew)
        );

        let unknown = ToolshedConfig {
            package_manager: Some("snap".to_string()),
            ..Default::default()
        };
        assert_eq!(unknown.package_manager_override(), None);
    }
}
