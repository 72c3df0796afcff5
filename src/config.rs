use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

use crate::theme::Theme;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const PREFS_FILE: &str = "prefs.json";
pub const LOG_FILE: &str = "opencore-console.log";

/// Per-user directory holding preferences and the log file.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("opencore")
}

/// Settings that survive a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Option<String>,
}

impl Preferences {
    /// Load from `path`. A missing or unreadable file gives defaults.
    pub fn load(path: &Path) -> Self {
        let Ok(data) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&data) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring malformed preferences: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        Theme::from_id_or_default(self.theme.as_deref())
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = Some(theme.id().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(&dir.path().join("nope.json"));
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.theme(), Theme::Cyberpunk);
    }

    #[test]
    fn save_then_load_keeps_theme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(PREFS_FILE);
        let mut prefs = Preferences::default();
        prefs.set_theme(Theme::Forest);
        prefs.save(&path).unwrap();
        assert_eq!(Preferences::load(&path).theme(), Theme::Forest);
    }

    #[test]
    fn unknown_theme_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFS_FILE);
        fs::write(&path, r#"{"theme":"vaporwave"}"#).unwrap();
        assert_eq!(Preferences::load(&path).theme(), Theme::Cyberpunk);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFS_FILE);
        fs::write(&path, "{not json").unwrap();
        assert_eq!(Preferences::load(&path), Preferences::default());
    }
}
