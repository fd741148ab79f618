use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::session::INITIAL_FOCUS_SESSION_LENGTH;

/// User preferences, the only state that survives a process restart.
/// Serialized with the wire protocol's camelCase names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub music_url: String,
    pub theme: String,
    pub stop_music_on_pause: bool,
    pub default_focus_time: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            music_url: String::new(),
            theme: "auto".to_string(),
            stop_music_on_pause: false,
            default_focus_time: INITIAL_FOCUS_SESSION_LENGTH,
        }
    }
}

pub trait PrefsStore {
    fn load(&self) -> Preferences;
    fn save(&self, prefs: &Preferences) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FilePrefsStore {
    path: PathBuf,
}

impl FilePrefsStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::prefs_path().unwrap_or_else(|| PathBuf::from("mindful_prefs.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    /// Write defaults on first run so a settings surface always finds a
    /// seeded file. Returns whether seeding happened.
    pub fn seed_if_missing(&self) -> std::io::Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&Preferences::default())?;
        Ok(true)
    }
}

impl Default for FilePrefsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefsStore for FilePrefsStore {
    fn load(&self) -> Preferences {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(prefs) = serde_json::from_slice::<Preferences>(&bytes) {
                return prefs;
            }
        }
        Preferences::default()
    }

    fn save(&self, prefs: &Preferences) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(prefs).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_prefs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = FilePrefsStore::with_path(&path);
        let prefs = Preferences::default();
        store.save(&prefs).unwrap();
        let loaded = store.load();
        assert_eq!(prefs, loaded);
    }

    #[test]
    fn save_and_load_custom_prefs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = FilePrefsStore::with_path(&path);
        let prefs = Preferences {
            music_url: "https://example.com/rain".into(),
            theme: "dark".into(),
            stop_music_on_pause: true,
            default_focus_time: 600,
        };
        store.save(&prefs).unwrap();
        let loaded = store.load();
        assert_eq!(prefs, loaded);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FilePrefsStore::with_path(dir.path().join("nope.json"));
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, b"{not json").unwrap();
        let store = FilePrefsStore::with_path(&path);
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn seed_writes_defaults_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = FilePrefsStore::with_path(&path);

        assert!(store.seed_if_missing().unwrap());
        assert!(!store.seed_if_missing().unwrap());

        let loaded = store.load();
        assert_eq!(loaded.theme, "auto");
        assert_eq!(loaded.default_focus_time, INITIAL_FOCUS_SESSION_LENGTH);
    }

    #[test]
    fn prefs_use_wire_field_names() {
        let json = serde_json::to_value(Preferences::default()).unwrap();
        assert!(json.get("musicUrl").is_some());
        assert!(json.get("stopMusicOnPause").is_some());
        assert!(json.get("defaultFocusTime").is_some());
    }
}
