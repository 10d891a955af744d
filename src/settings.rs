use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::config::AppConfig;
use crate::error::Result;

// Window chrome style applied by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMaterial {
    None,
    Tabbed,
    Auto,
    Mica,
    #[default]
    Acrylic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

// App settings, stored as one JSON object. Missing keys take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub language: String,
    pub gemini_api: String,
    pub background_material: BackgroundMaterial,
    #[serde(alias = "fullscreenShortcut")]
    pub zen_mode_shortcut: String,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            gemini_api: String::new(),
            background_material: BackgroundMaterial::default(),
            zen_mode_shortcut: "F11".to_string(),
            theme: Theme::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub success: bool,
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            path: config.settings_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the default record if no settings file exists yet.
    /// Returns whether a file was created.
    pub async fn ensure_exists(&self) -> Result<bool> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if fs::try_exists(&self.path).await? {
            return Ok(false);
        }

        self.write(&Settings::default()).await?;
        info!("{:?} created with default settings", self.path);
        Ok(true)
    }

    pub async fn read(&self) -> Result<Settings> {
        let content = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replaces the whole file; callers pass the complete record.
    pub async fn write(&self, settings: &Settings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }

    pub async fn get(&self) -> Result<Settings> {
        self.ensure_exists().await?;
        self.read().await
    }

    pub async fn save(&self, settings: &Settings) -> Result<SaveOutcome> {
        self.write(settings).await?;
        Ok(SaveOutcome { success: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_file() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "language": "en",
                "geminiApi": "",
                "backgroundMaterial": "acrylic",
                "zenModeShortcut": "F11",
                "theme": "dark"
            })
        );
    }

    #[test]
    fn partial_record_fills_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{ "theme": "light" }"#).unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.language, "en");
        assert_eq!(settings.background_material, BackgroundMaterial::Acrylic);
    }

    #[test]
    fn legacy_fullscreen_key_is_accepted() {
        let settings: Settings =
            serde_json::from_str(r#"{ "fullscreenShortcut": "CommandOrControl+Shift+F" }"#).unwrap();
        assert_eq!(settings.zen_mode_shortcut, "CommandOrControl+Shift+F");
    }

    #[test]
    fn unknown_material_is_rejected() {
        let result = serde_json::from_str::<Settings>(r#"{ "backgroundMaterial": "glass" }"#);
        assert!(result.is_err());
    }
}
