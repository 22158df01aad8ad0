//! Orrery configuration (window, scene tuning, scrolling). Loaded from orrery.ron at startup.

use input::ScrollSettings;
use scene::SceneSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "orrery.ron";

/// Persistent settings. Loaded from `orrery.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrreryConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_title")]
    pub title: String,
    /// Enable vsync (recommended to avoid tearing).
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Fixed RNG seed for a reproducible sky. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Write every synthesized texture here as PNG.
    #[serde(default)]
    pub texture_dump_dir: Option<PathBuf>,
    #[serde(default)]
    pub scene: SceneSettings,
    #[serde(default)]
    pub scroll: ScrollSettings,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_title() -> String {
    "Orrery".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            title: default_title(),
            vsync: default_true(),
            seed: None,
            texture_dump_dir: None,
            scene: SceneSettings::default(),
            scroll: ScrollSettings::default(),
        }
    }
}

impl OrreryConfig {
    /// Load config from `orrery.ron`. If the file is missing or invalid, returns default config.
    /// A missing file is created with the defaults so there is something to edit.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            log::info!("No config at {:?}, writing defaults", path);
            let config = Self::default();
            config.save_to(&path);
            return config;
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Save config to `path`. Logs on error.
    pub fn save_to(&self, path: &Path) {
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialize config: {}", e),
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = OrreryConfig::load_from(&dir.path().join(CONFIG_FILE));
        assert_eq!(config.window_width, 1280);
        assert!(config.vsync);
        assert!(config.seed.is_none());
        assert!(config.scene.capabilities.textures);
        assert_eq!(config.scroll.duration, 1.2);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "(seed: Some(42), scene: (comet_count: 2, capabilities: (debris_field: false)))").unwrap();
        let config = OrreryConfig::load_from(&path);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.scene.comet_count, 2);
        assert!(!config.scene.capabilities.debris_field);
        assert!(config.scene.capabilities.patrol_craft);
        assert_eq!(config.window_height, 720);
    }

    #[test]
    fn invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "not ron at all {").unwrap();
        let config = OrreryConfig::load_from(&path);
        assert_eq!(config.title, "Orrery");
    }

    #[test]
    fn save_then_load_keeps_seed_and_dump_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let config = OrreryConfig {
            seed: Some(7),
            texture_dump_dir: Some(PathBuf::from("textures")),
            ..Default::default()
        };
        config.save_to(&path);
        let loaded = OrreryConfig::load_from(&path);
        assert_eq!(loaded.seed, Some(7));
        assert_eq!(loaded.texture_dump_dir, Some(PathBuf::from("textures")));
    }
}
