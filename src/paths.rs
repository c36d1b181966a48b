//! Centralized path resolution for taip
//!
//! # Environment Variables
//!
//! - `TAIP_CONFIG` - Registry file to read (highest priority after `--config`)
//! - `TAIP_CONFIG_DIR` - Override config directory
//! - `TAIP_USER_DIR` - Override the user-data root that repositories are cloned under
//!
//! # Path Resolution Priority
//!
//! For registry_file():
//! 1. `--config` flag
//! 2. `TAIP_CONFIG` environment variable
//! 3. `<config_dir>/taip.toml`, or `<config_dir>/taip.json` if only that exists
//!
//! For config_dir():
//! 1. `TAIP_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/taip` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\taip`
//!    - macOS/Linux: `~/.config/taip`
//!
//! For user_dir():
//! 1. `TAIP_USER_DIR` environment variable
//! 2. `settings.user_dir` from the registry file
//! 3. Platform default:
//!    - Windows: `%APPDATA%\talon\user`
//!    - macOS/Linux: `~/.talon/user`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for the registry file
pub const ENV_CONFIG: &str = "TAIP_CONFIG";

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "TAIP_CONFIG_DIR";

/// Environment variable for the user-data root override
pub const ENV_USER_DIR: &str = "TAIP_USER_DIR";

/// Get the taip config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("taip");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            let path = app_data.join("taip");
            log::debug!("Using Windows config dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("taip");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Get the registry file path
///
/// `explicit` is the `--config` flag value, if given.
pub fn registry_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(file) = std::env::var(ENV_CONFIG) {
        let path = expand(&file);
        log::debug!("Using registry from {}: {}", ENV_CONFIG, path.display());
        return Ok(path);
    }

    let dir = config_dir()?;
    let toml_path = dir.join("taip.toml");
    let json_path = dir.join("taip.json");
    if !toml_path.exists() && json_path.exists() {
        return Ok(json_path);
    }
    Ok(toml_path)
}

/// Get the user-data root that clone destinations are relative to
///
/// `configured` is `settings.user_dir` from the registry file, if set.
pub fn user_dir(configured: Option<&str>) -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_USER_DIR) {
        let path = expand(&dir);
        log::debug!("Using user dir from {}: {}", ENV_USER_DIR, path.display());
        return Ok(path);
    }

    if let Some(dir) = configured {
        let path = expand(dir);
        log::debug!("Using user dir from registry: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            return Ok(app_data.join("talon").join("user"));
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".talon").join("user"))
}

/// Directory holding VS Code's user `settings.json`
///
/// Only resolved on Windows; elsewhere the settings workaround does not apply.
pub fn vscode_settings_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        dirs::config_dir().map(|app_data| app_data.join("Code").join("User"))
    } else {
        None
    }
}

/// Expand ~ and environment variables in a path string.
///
/// Unknown variables are left as written.
pub fn expand(path: &str) -> PathBuf {
    PathBuf::from(reconcile::expand_vars(path))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Helper to run a test with temporary env var
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = env_lock();
        let original = env::var(key).ok();
        // SAFETY: env mutation is serialized by ENV_LOCK
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: as above
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    /// Helper to run a test with env var removed
    fn without_env_var<F, R>(key: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = env_lock();
        let original = env::var(key).ok();
        // SAFETY: env mutation is serialized by ENV_LOCK
        unsafe { env::remove_var(key) };
        let result = f();
        if let Some(v) = original {
            // SAFETY: as above
            unsafe { env::set_var(key, v) };
        }
        result
    }

    #[test]
    fn test_config_dir_env_override() {
        with_env_var(ENV_CONFIG_DIR, "/custom/taip/config", || {
            assert_eq!(config_dir().unwrap(), PathBuf::from("/custom/taip/config"));
        });
    }

    #[test]
    fn test_registry_file_explicit_wins() {
        with_env_var(ENV_CONFIG, "/from/env/taip.toml", || {
            let result = registry_file(Some(Path::new("/from/flag/taip.toml"))).unwrap();
            assert_eq!(result, PathBuf::from("/from/flag/taip.toml"));
        });
    }

    #[test]
    fn test_registry_file_env_override() {
        with_env_var(ENV_CONFIG, "/from/env/registry.json", || {
            assert_eq!(
                registry_file(None).unwrap(),
                PathBuf::from("/from/env/registry.json")
            );
        });
    }

    #[test]
    fn test_user_dir_env_beats_configured() {
        with_env_var(ENV_USER_DIR, "/env/user", || {
            assert_eq!(
                user_dir(Some("/configured/user")).unwrap(),
                PathBuf::from("/env/user")
            );
        });
    }

    #[test]
    fn test_user_dir_configured() {
        without_env_var(ENV_USER_DIR, || {
            assert_eq!(
                user_dir(Some("/configured/user")).unwrap(),
                PathBuf::from("/configured/user")
            );
        });
    }

    #[cfg(unix)]
    #[test]
    fn test_user_dir_default_unix() {
        without_env_var(ENV_USER_DIR, || {
            let home = dirs::home_dir().unwrap();
            assert_eq!(user_dir(None).unwrap(), home.join(".talon").join("user"));
        });
    }

    #[cfg(not(windows))]
    #[test]
    fn test_vscode_settings_dir_only_on_windows() {
        assert_eq!(vscode_settings_dir(), None);
    }

    #[test]
    fn test_expand_with_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand("~/test/path"), home.join("test").join("path"));
    }

    #[test]
    fn test_expand_with_env_var() {
        with_env_var("TAIP_TEST_VAR", "test_value", || {
            assert_eq!(
                expand("/path/$TAIP_TEST_VAR/file"),
                PathBuf::from("/path/test_value/file")
            );
        });
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        assert_eq!(
            expand("/path/$NONEXISTENT_TAIP_VAR_12345/file"),
            PathBuf::from("/path/$NONEXISTENT_TAIP_VAR_12345/file")
        );
    }

    #[test]
    fn test_expand_mixes_set_and_unknown_vars() {
        with_env_var("TAIP_TEST_ROOT", "/srv/talon", || {
            assert_eq!(
                expand("$TAIP_TEST_ROOT/$NONEXISTENT_TAIP_VAR_12345/user"),
                PathBuf::from("/srv/talon/$NONEXISTENT_TAIP_VAR_12345/user")
            );
        });
    }
}
