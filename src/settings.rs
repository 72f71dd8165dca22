use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::feature::FeatureConfig;
use crate::feature::clock;
use crate::tui::ThemeVariant;

/// Environment variable that overrides the settings file location.
pub const SETTINGS_PATH_ENV: &str = "DESK_CLOCK_SETTINGS";

/// User preferences persisted between runs as a flat JSON object.
///
/// Keys this version does not know are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, alias = "enableMilitaryTime")]
    pub enable_24_hour: bool,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_editor_dimension")]
    pub editor_rows: usize,
    #[serde(default = "default_editor_dimension")]
    pub editor_cols: usize,
    /// `mocha` (dark) or `latte` (light)
    #[serde(default)]
    pub theme: ThemeVariant,
    /// Last applied main layout
    #[serde(default)]
    pub layout: Option<Vec<FeatureConfig>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_editor_dimension() -> usize {
    2
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_24_hour: false,
            tick_interval_ms: default_tick_interval_ms(),
            editor_rows: default_editor_dimension(),
            editor_cols: default_editor_dimension(),
            theme: ThemeVariant::default(),
            layout: None,
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Stored layout, or the two-clock default when none was saved or the
    /// saved one is empty.
    pub fn main_layout(&self) -> Vec<FeatureConfig> {
        or_default_layout(self.layout.clone().unwrap_or_default())
    }
}

/// An empty layout means "show the default clocks".
pub fn or_default_layout(layout: Vec<FeatureConfig>) -> Vec<FeatureConfig> {
    if layout.is_empty() {
        default_layout()
    } else {
        layout
    }
}

/// Local time on the right, three hours behind on the left.
pub fn default_layout() -> Vec<FeatureConfig> {
    vec![
        FeatureConfig::new(clock::TYPE_ID, 0, 1),
        FeatureConfig::new(clock::TYPE_ID, 0, 0).with_param("utcOffsetHours", -3),
    ]
}

/// Reads and writes [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$DESK_CLOCK_SETTINGS`, or `desk-clock/settings.json` under the user's
    /// config directory. The directory is created when missing.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .context("Failed to get config directory")?
            .join("desk-clock");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("settings.json"))
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// unreadable.
    pub fn load(&self) -> Settings {
        debug!("Loading settings from: {:?}", self.path);

        if !self.path.exists() {
            info!("Settings file not found, loading default settings");
            return Settings::default();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read settings file {:?}: {}", self.path, e);
                return Settings::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to parse settings file {:?}: {}", self.path, e);
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        debug!("Saving settings to: {:?}", self.path);

        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings file: {:?}", self.path))?;

        info!("Settings saved successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> SettingsStore {
        let path = std::env::temp_dir().join(format!("desk-clock-{}.json", uuid::Uuid::new_v4()));
        SettingsStore::new(path)
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let store = temp_store();
        let settings = store.load();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.tick_interval_ms, 100);
        assert_eq!(settings.main_layout(), default_layout());
    }

    #[test]
    fn test_empty_stored_layout_means_default() {
        let settings = Settings {
            layout: Some(Vec::new()),
            ..Settings::default()
        };
        assert_eq!(settings.main_layout(), default_layout());

        let custom = vec![FeatureConfig::new(clock::TYPE_ID, 1, 1)];
        assert_eq!(or_default_layout(custom.clone()), custom);
    }

    #[test]
    fn test_light_theme_is_read_from_settings() {
        let settings: Settings = serde_json::from_str(r#"{"theme": "latte"}"#).unwrap();
        assert_eq!(settings.theme, ThemeVariant::Latte);
        assert!(settings.extra.is_empty());
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let store = temp_store();
        fs::write(store.path(), "{ not json").unwrap();

        assert_eq!(store.load(), Settings::default());
        fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn test_save_then_load_keeps_unknown_keys() {
        let store = temp_store();
        fs::write(
            store.path(),
            r#"{"enableMilitaryTime": true, "brightness": 40}"#,
        )
        .unwrap();

        let mut settings = store.load();
        assert!(settings.enable_24_hour);
        assert_eq!(settings.theme, ThemeVariant::Mocha);
        assert_eq!(settings.extra.get("brightness"), Some(&Value::from(40)));

        settings.layout = Some(vec![FeatureConfig::new(clock::TYPE_ID, 1, 0)]);
        store.save(&settings).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(written["enable24Hour"], Value::Bool(true));
        assert_eq!(written["brightness"], Value::from(40));
        assert_eq!(written["layout"][0]["typeId"], Value::from("Clock"));

        let reloaded = store.load();
        assert_eq!(reloaded, settings);
        fs::remove_file(store.path()).unwrap();
    }
}
