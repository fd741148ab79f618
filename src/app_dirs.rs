use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn prefs_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mindful")
            .map(|proj_dirs| proj_dirs.config_dir().join("prefs.json"))
    }
}
