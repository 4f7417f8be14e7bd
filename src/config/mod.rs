use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_BACKGROUND_SOURCE, DEFAULT_EXPORT_QUALITY};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Loaded on every mode change until an image is uploaded.
    /// `http(s)://` URLs are fetched, anything else is a file path.
    pub default_source: String,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            default_source: DEFAULT_BACKGROUND_SOURCE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Also write each export to the exports directory
    pub write_files: bool,
    /// JPEG quality from 0.0 to 1.0
    pub quality: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            write_files: false,
            quality: DEFAULT_EXPORT_QUALITY,
        }
    }
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfigData {
    #[serde(default)]
    pub background: BackgroundConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
        }
    }
}

/// Read config from `path`. Read and parse failures fall back to defaults.
pub fn load_config(path: &Path) -> AppConfigData {
    if !path.exists() {
        info!("No config file found, using defaults");
        return AppConfigData::default();
    }

    match std::fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str(&json) {
            Ok(data) => {
                info!("Loaded config from {:?}", path);
                data
            }
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                AppConfigData::default()
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            AppConfigData::default()
        }
    }
}

/// Write config to `path` as pretty JSON.
pub fn save_config(data: &AppConfigData, path: &Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(mut config: ResMut<AppConfig>) {
    let path = config.config_path.clone();
    config.data = load_config(&path);

    // First run: leave a file behind to edit
    if !path.exists() {
        match save_config(&config.data, &path) {
            Ok(()) => info!("Config saved to {:?}", path),
            Err(e) => error!("Failed to save config: {}", e),
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert_eq!(data.background.default_source, DEFAULT_BACKGROUND_SOURCE);
        assert!(data.background.default_source.starts_with("https://"));
        assert!(!data.export.write_files);
        assert_eq!(data.export.quality, 0.8);
    }

    #[test]
    fn test_app_config_data_serialization() {
        let data = AppConfigData {
            background: BackgroundConfig {
                default_source: "https://example.com/photo.jpeg".to_string(),
            },
            export: ExportConfig {
                write_files: true,
                quality: 0.5,
            },
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: AppConfigData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let parsed: AppConfigData =
            serde_json::from_str(r#"{ "export": { "write_files": true } }"#).unwrap();
        assert!(parsed.export.write_files);
        assert_eq!(parsed.export.quality, 0.8);
        assert_eq!(parsed.background, BackgroundConfig::default());
    }

    #[test]
    fn test_load_and_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut data = AppConfigData::default();
        data.background.default_source = "other.png".to_string();
        save_config(&data, &path).unwrap();

        assert_eq!(load_config(&path), data);
    }

    #[test]
    fn test_corrupted_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(load_config(&path), AppConfigData::default());
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            load_config(&dir.path().join("absent.json")),
            AppConfigData::default()
        );
    }
}
