use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where the log file goes: `$HOME/.local/state/ondot/ondot.log`, or the
    /// platform data dir when `HOME` is unset.
    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("ondot.log"))
    }

    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join("ondot"))
        } else {
            ProjectDirs::from("", "", "ondot").map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }
}
