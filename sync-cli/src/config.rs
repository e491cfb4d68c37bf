//! Config file resolution for the CLI.

use anyhow::{Context, Result};
use autorec_sync_client::ClientConfig;
use std::path::{Path, PathBuf};

/// File name looked up in the user config directory.
const CONFIG_FILE: &str = "autorec.toml";

/// Load the client config.
///
/// An explicit path must exist. Without one, the default location is used
/// if present and built-in defaults otherwise. `base_url` overrides
/// whatever the file says.
pub fn load(explicit: Option<&Path>, base_url: Option<&str>) -> Result<ClientConfig> {
    let config = match explicit {
        Some(path) => read(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => read(&path)?,
            _ => ClientConfig::default(),
        },
    };

    Ok(match base_url {
        Some(url) => config.with_base_url(url),
        None => config,
    })
}

fn read(path: &Path) -> Result<ClientConfig> {
    ClientConfig::from_file(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Get the default config path for autorec.
fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "autorec", "autorec")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn explicit_file_is_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("autorec.toml");
        std::fs::write(
            &path,
            "base_url = \"http://pi.local:3000\"\nreconnect_delay_ms = 250\n",
        )
        .unwrap();

        let config = load(Some(&path), None).unwrap();

        assert_eq!(config.base_url, "http://pi.local:3000");
        assert_eq!(config.reconnect_delay(), Duration::from_millis(250));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = load(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn base_url_flag_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("autorec.toml");
        std::fs::write(&path, "base_url = \"http://pi.local:3000\"\n").unwrap();

        let config = load(Some(&path), Some("http://10.0.0.5:8080")).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:8080");
    }
}
