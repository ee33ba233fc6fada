use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};

use super::store::KeyValueStore;

pub const THEME_KEY: &str = "theme";

/// Colour scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Theme> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Stored theme, or Light when missing or unreadable
pub fn load_theme(store: &dyn KeyValueStore) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(value)) => Theme::parse(&value).unwrap_or_else(|| {
            warn!("ignoring unknown theme {value:?}");
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(err) => {
            warn!("failed to load theme: {err:#}");
            Theme::default()
        }
    }
}

pub fn save_theme(store: &mut dyn KeyValueStore, theme: Theme) -> Result<()> {
    store.set(THEME_KEY, theme.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{JsonFileStore, MemoryStore};
    use tempfile::TempDir;

    #[test]
    fn test_theme_defaults_to_light() {
        let store = MemoryStore::new();
        assert_eq!(load_theme(&store), Theme::Light);
    }

    #[test]
    fn test_theme_round_trip() {
        let mut store = MemoryStore::new();
        save_theme(&mut store, Theme::Dark).unwrap();
        assert_eq!(load_theme(&store), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_unknown_theme_ignored() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "solarized".to_string()).unwrap();
        assert_eq!(load_theme(&store), Theme::Light);
    }

    #[test]
    fn test_unreadable_store_falls_back_to_light() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, "{\"theme\": ").unwrap();
        let mut store = JsonFileStore::new(&path);

        assert!(store.get(THEME_KEY).is_err());
        assert_eq!(load_theme(&store), Theme::Light);

        save_theme(&mut store, Theme::Dark).unwrap();
        assert_eq!(load_theme(&store), Theme::Dark);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }
}
