use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const APP_DIRECTORY_NAME: &str = "MarkDoom";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const WELCOME_NOTE_FILE_NAME: &str = "Welcome.md";

const DEFAULT_AUTOSAVE_MS: u64 = 3000;
const ROOT_ENV: &str = "MARKDOOM_ROOT";
const AUTOSAVE_ENV: &str = "MARKDOOM_AUTOSAVE_MS";

// Process-level configuration, fixed for the lifetime of the app
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub root_dir: PathBuf,
    pub autosave_interval: Duration,
    pub seed_welcome_note: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            root_dir: home.join(APP_DIRECTORY_NAME),
            autosave_interval: Duration::from_millis(DEFAULT_AUTOSAVE_MS),
            seed_welcome_note: true,
        }
    }
}

impl AppConfig {
    pub fn with_root(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `MARKDOOM_ROOT` and `MARKDOOM_AUTOSAVE_MS`.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(root) = get(ROOT_ENV).filter(|v| !v.trim().is_empty()) {
            config.root_dir = PathBuf::from(root);
        }

        if let Some(raw) = get(AUTOSAVE_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.autosave_interval = Duration::from_millis(ms),
                _ => warn!("ignoring {}={:?}, expected a positive number of milliseconds", AUTOSAVE_ENV, raw),
            }
        }

        config
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root_dir.join(SETTINGS_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_live_under_home() {
        let config = AppConfig::default();
        assert!(config.root_dir.ends_with(APP_DIRECTORY_NAME));
        assert_eq!(config.autosave_interval, Duration::from_millis(3000));
        assert!(config.seed_welcome_note);
        assert!(config.settings_path().ends_with("MarkDoom/settings.json"));
    }

    #[test]
    fn env_overrides_apply() {
        let config = AppConfig::from_vars(vars(&[
            (ROOT_ENV, "/tmp/notes"),
            (AUTOSAVE_ENV, "750"),
        ]));
        assert_eq!(config.root_dir, PathBuf::from("/tmp/notes"));
        assert_eq!(config.autosave_interval, Duration::from_millis(750));
    }

    #[test]
    fn bad_interval_falls_back_to_default() {
        for raw in ["soon", "0", "-5"] {
            let config = AppConfig::from_vars(vars(&[(AUTOSAVE_ENV, raw)]));
            assert_eq!(config.autosave_interval, Duration::from_millis(DEFAULT_AUTOSAVE_MS));
        }
    }
}
