//! Persisted user preferences. Only the colour theme is stored.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("Failed to access preferences: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse preferences: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

impl Preferences {
    /// Reads preferences; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, PrefsError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PrefsError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string(self)?)?;
        tracing::debug!(path = %path.display(), theme = self.theme.as_str(), "Preferences saved");
        Ok(())
    }

    /// Flips the theme and persists it
    pub fn toggle_theme(path: &Path) -> Result<Theme, PrefsError> {
        let mut prefs = Self::load(path)?;
        prefs.theme = prefs.theme.toggled();
        prefs.save(path)?;
        Ok(prefs.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_defaults_to_light() {
        let temp_dir = TempDir::new().unwrap();
        let prefs = Preferences::load(&temp_dir.path().join("prefs.toml")).unwrap();
        assert_eq!(prefs.theme, Theme::Light);
    }

    #[test]
    fn toggle_persists_theme() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/prefs.toml");

        assert_eq!(Preferences::toggle_theme(&path).unwrap(), Theme::Dark);
        assert_eq!(Preferences::load(&path).unwrap().theme, Theme::Dark);

        assert_eq!(Preferences::toggle_theme(&path).unwrap(), Theme::Light);
        assert_eq!(Preferences::load(&path).unwrap().theme, Theme::Light);
    }

    #[test]
    fn reads_hand_written_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.toml");
        fs::write(&path, "theme = \"dark\"\n").unwrap();

        assert_eq!(Preferences::load(&path).unwrap().theme, Theme::Dark);
    }

    #[test]
    fn rejects_unknown_theme() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.toml");
        fs::write(&path, "theme = \"sepia\"\n").unwrap();

        assert!(matches!(Preferences::load(&path), Err(PrefsError::Parse(_))));
    }
}
