//! Persisted player preferences: colour theme and the onboarding flag.
//!
//! Stored as `key=value` lines. Unknown keys and malformed values are
//! ignored so an old or hand-edited file never blocks startup.

use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "repeat-wordle";
const PREFERENCES_FILE: &str = "preferences";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub onboarding_hidden: bool,
}

impl Preferences {
    #[must_use]
    pub fn parse(data: &str) -> Self {
        let mut prefs = Self::default();
        for line in data.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match (key.trim(), value.trim()) {
                ("theme", value) => {
                    if let Some(theme) = Theme::parse(value) {
                        prefs.theme = theme;
                    }
                }
                ("onboarding_hidden", value) => {
                    if let Ok(hidden) = value.parse() {
                        prefs.onboarding_hidden = hidden;
                    }
                }
                (key, _) => debug!("Ignoring unknown preference '{key}'"),
            }
        }
        prefs
    }

    #[must_use]
    pub fn serialize(&self) -> String {
        format!(
            "theme={}\nonboarding_hidden={}\n",
            self.theme.as_str(),
            self.onboarding_hidden
        )
    }

    /// Loads preferences, falling back to defaults if the file is missing
    /// or unreadable.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(data) => Self::parse(&data),
            Err(e) => {
                debug!("No preferences at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.serialize())
    }

    /// Saves preferences, logging failures instead of returning them.
    pub fn save_or_log(&self, path: Option<&PathBuf>) {
        let Some(path) = path else {
            return;
        };
        if let Err(e) = self.save(path) {
            warn!("Failed to save preferences to {}: {e}", path.display());
        }
    }
}

/// Default location of the preferences file, if the platform has a config
/// directory.
#[must_use]
pub fn default_preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(PREFERENCES_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.theme, Theme::Light);
        assert!(!prefs.onboarding_hidden);
    }

    #[test]
    fn test_parse_values() {
        let prefs = Preferences::parse("theme=dark\nonboarding_hidden=true\n");
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(prefs.onboarding_hidden);
    }

    #[test]
    fn test_parse_ignores_garbage() {
        let prefs = Preferences::parse("theme=purple\nnot a line\nvolume=11\nonboarding_hidden=maybe\n");
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_serialize_parse_agree() {
        let prefs = Preferences {
            theme: Theme::Dark,
            onboarding_hidden: true,
        };
        assert_eq!(Preferences::parse(&prefs.serialize()), prefs);
    }

    #[test]
    fn test_toggle_theme() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir()
            .join("repeat_wordle_prefs_test")
            .join(PREFERENCES_FILE);
        let _ = fs::remove_file(&path);

        assert_eq!(Preferences::load(&path), Preferences::default());

        let prefs = Preferences {
            theme: Theme::Dark,
            onboarding_hidden: false,
        };
        prefs.save(&path).unwrap();
        assert_eq!(Preferences::load(&path), prefs);

        let _ = fs::remove_file(&path);
    }
}
