use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Progress file under $HOME/.local/state/typedrill, with a
    /// platform-specific fallback when HOME is unset.
    pub fn progress_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("typedrill");
            Some(state_dir.join("progress.json"))
        } else {
            ProjectDirs::from("", "", "typedrill")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("progress.json"))
        }
    }
}
