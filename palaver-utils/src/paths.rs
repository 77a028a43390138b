//! Path utilities for palaver
//!
//! Handles XDG Base Directory specification compliance for config
//! and state directories.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Application identifier for XDG directories
const APP_NAME: &str = "palaver";

/// Get project directories
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Get the configuration directory
///
/// Location: `$XDG_CONFIG_HOME/palaver` or `~/.config/palaver`
pub fn config_dir() -> PathBuf {
    project_dirs()
        .map(|p| p.config_dir().to_path_buf())
        .unwrap_or_else(fallback_config_dir)
}

/// Get the main configuration file path
///
/// Location: `$XDG_CONFIG_HOME/palaver/config.toml`
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Get the state directory
///
/// Location: `$XDG_STATE_HOME/palaver` or `~/.local/state/palaver`
pub fn state_dir() -> PathBuf {
    project_dirs()
        .and_then(|p| p.state_dir().map(|d| d.to_path_buf()))
        .unwrap_or_else(fallback_state_dir)
}

/// Get the log directory
///
/// Location: `$XDG_STATE_HOME/palaver/logs`
pub fn log_dir() -> PathBuf {
    state_dir().join("logs")
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn fallback_config_dir() -> PathBuf {
    home_dir().join(".config").join(APP_NAME)
}

fn fallback_state_dir() -> PathBuf {
    home_dir().join(".local").join("state").join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_ends_with_app_name() {
        let dir = config_dir();
        assert!(dir.to_string_lossy().contains(APP_NAME));
    }

    #[test]
    fn test_config_file_is_toml() {
        let file = config_file();
        assert_eq!(file.file_name().unwrap(), "config.toml");
        assert!(file.starts_with(config_dir()));
    }

    #[test]
    fn test_state_dir_ends_with_app_name() {
        let dir = state_dir();
        assert!(dir.to_string_lossy().contains(APP_NAME));
    }

    #[test]
    fn test_log_dir_under_state_dir() {
        let dir = log_dir();
        assert!(dir.starts_with(state_dir()));
        assert_eq!(dir.file_name().unwrap(), "logs");
    }

    #[test]
    fn test_fallback_config_dir() {
        let dir = fallback_config_dir();
        assert!(dir.to_string_lossy().contains(".config"));
        assert!(dir.to_string_lossy().contains(APP_NAME));
    }

    #[test]
    fn test_fallback_state_dir() {
        let dir = fallback_state_dir();
        assert!(dir.to_string_lossy().contains("state"));
        assert!(dir.to_string_lossy().contains(APP_NAME));
    }
}
