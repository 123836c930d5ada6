//! Platform-aware path resolution for SmartGlance.
//!
//! On **Linux**, follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/smartglance` or `~/.config/smartglance`
//! - Data: `$XDG_DATA_HOME/smartglance` or `~/.local/share/smartglance`
//!
//! On **macOS**, uses Apple conventions with XDG env var overrides:
//! - Config: `$XDG_CONFIG_HOME/smartglance` or `~/Library/Application Support/smartglance`
//! - Data: `$XDG_DATA_HOME/smartglance` or `~/Library/Application Support/smartglance`

use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "smartglance";

/// Returns the configuration directory for SmartGlance.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/smartglance` (if env var set, any platform)
/// 2. Platform default:
///    - Linux: `~/.config/smartglance`
///    - macOS: `~/Library/Application Support/smartglance`
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join(APP_NAME);
    }
    platform_config_dir().join(APP_NAME)
}

/// Platform-native config base directory (without XDG override).
fn platform_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support
        dirs::config_dir().expect("could not determine config directory")
    }
    #[cfg(not(target_os = "macos"))]
    {
        // ~/.config (XDG default on Linux)
        dirs::home_dir()
            .expect("could not determine home directory")
            .join(".config")
    }
}

/// Returns the path to the main configuration file.
///
/// Resolves to `config_dir()/config.toml`.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns the data directory where the file backend stores dashboards.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/smartglance` (if env var set, any platform)
/// 2. Platform default:
///    - Linux: `~/.local/share/smartglance`
///    - macOS: `~/Library/Application Support/smartglance`
pub fn data_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join(APP_NAME);
    }
    dirs::data_dir()
        .expect("could not determine data directory")
        .join(APP_NAME)
}

/// Expands a leading `~` in a path string to the user's home directory.
///
/// If the path does not start with `~`, it is returned as-is.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().expect("could not determine home directory");
        home.join(rest)
    } else if path == "~" {
        dirs::home_dir().expect("could not determine home directory")
    } else {
        PathBuf::from(path)
    }
}

/// Creates a directory and all parent directories with mode 0700.
///
/// Equivalent to `mkdir -p` with restricted permissions.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

/// Creates the configuration directory if it does not exist, returning its path.
pub fn ensure_config_dir() -> std::io::Result<PathBuf> {
    let dir = config_dir();
    ensure_dir(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper: run a closure with env vars temporarily set, then restore.
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let originals: Vec<_> = vars
            .iter()
            .map(|(k, _)| (*k, std::env::var(k).ok()))
            .collect();

        for (k, v) in vars {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        f();

        for (k, original) in &originals {
            match original {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_path_with_xdg_override() {
        with_env(&[("XDG_CONFIG_HOME", Some("/custom/config"))], || {
            let path = config_path();
            assert_eq!(
                path,
                PathBuf::from("/custom/config/smartglance/config.toml")
            );
        });
    }

    #[test]
    #[serial]
    fn test_config_path_without_xdg_uses_platform_default() {
        with_env(&[("XDG_CONFIG_HOME", None)], || {
            let path = config_path();
            let expected = platform_config_dir().join("smartglance/config.toml");
            assert_eq!(path, expected);
        });
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    #[serial]
    fn test_linux_config_default_is_dot_config() {
        with_env(&[("XDG_CONFIG_HOME", None)], || {
            let dir = config_dir();
            let home = dirs::home_dir().expect("could not determine home directory");
            assert_eq!(dir, home.join(".config/smartglance"));
        });
    }

    #[test]
    #[serial]
    fn test_data_dir_with_xdg_override() {
        with_env(&[("XDG_DATA_HOME", Some("/custom/data"))], || {
            assert_eq!(data_dir(), PathBuf::from("/custom/data/smartglance"));
        });
    }

    #[test]
    fn test_expand_tilde_with_home_prefix() {
        let home = dirs::home_dir().expect("could not determine home directory");
        let result = expand_tilde("~/foo");
        assert_eq!(result, home.join("foo"));
    }

    #[test]
    fn test_expand_tilde_absolute_path_unchanged() {
        let result = expand_tilde("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_tilde_bare_tilde() {
        let home = dirs::home_dir().expect("could not determine home directory");
        assert_eq!(expand_tilde("~"), home);
    }

    #[test]
    fn test_ensure_dir_creates_directory() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let nested = tmp.path().join("a/b/c");
        ensure_dir(&nested).expect("ensure_dir failed");
        assert!(nested.is_dir());
    }

    #[test]
    fn test_ensure_dir_sets_permissions() {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let tmp = tempfile::tempdir().expect("failed to create temp dir");
            let dir = tmp.path().join("secure");
            ensure_dir(&dir).expect("ensure_dir failed");
            let mode = fs::metadata(&dir)
                .expect("failed to read metadata")
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o700);
        }
    }

    #[test]
    #[serial]
    fn test_ensure_config_dir_creates_at_xdg_path() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        with_env(
            &[(
                "XDG_CONFIG_HOME",
                Some(tmp.path().to_str().expect("non-utf8 tmpdir")),
            )],
            || {
                let result = ensure_config_dir().expect("ensure_config_dir failed");
                assert_eq!(result, tmp.path().join("smartglance"));
                assert!(result.is_dir());
            },
        );
    }
}
