//! Configuration loading (TOML).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_NAME: &str = "admindeck";

#[derive(Debug, Clone)]
pub struct Config {
    pub config_path: PathBuf,
    /// Base URL of the admin API, without a trailing slash.
    pub api_base: String,
    /// Where the persistent session token lives.
    pub token_path: PathBuf,
    /// Where a non-remembered session token lives.
    pub session_token_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    api_base: String,
    token_path: Option<PathBuf>,
}

/// Default location: `$XDG_CONFIG_HOME/admindeck/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let base = BaseDirs::new().context("could not determine home directory")?;
    Ok(base.config_dir().join(APP_NAME).join(CONFIG_FILE_NAME))
}

/// Expand ~ to home directory in paths
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = home::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

pub fn load(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    let raw = fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config file: {}", config_path.display()))?;
    let parsed: RawConfig = toml::from_str(&raw)
        .with_context(|| format!("invalid config file: {}", config_path.display()))?;

    let api_base = parsed.api_base.trim_end_matches('/').to_string();
    if api_base.is_empty() {
        bail!("api_base must not be empty in {}", config_path.display());
    }

    let token_path = match parsed.token_path {
        Some(p) => expand_tilde(&p),
        None => config_path
            .parent()
            .map(|dir| dir.join("token"))
            .unwrap_or_else(|| PathBuf::from("token")),
    };
    let session_token_path = std::env::temp_dir().join(format!("{APP_NAME}-session-token"));

    Ok(Config {
        config_path,
        api_base,
        token_path,
        session_token_path,
    })
}

/// Write a starter config file. Refuses to overwrite an existing one.
pub fn init(path: Option<&Path>, api_base: &str) -> Result<PathBuf> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if config_path.exists() {
        bail!("config file already exists: {}", config_path.display());
    }
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    let template = format!(
        "# admindeck configuration\n\
         \n\
         # Base URL of the admin API.\n\
         api_base = \"{}\"\n\
         \n\
         # Where the session token is stored after `admindeck login`.\n\
         # Defaults to a `token` file next to this config.\n\
         #token_path = \"~/.config/admindeck/token\"\n",
        api_base.trim_end_matches('/')
    );
    fs::write(&config_path, template)
        .with_context(|| format!("failed to write config file: {}", config_path.display()))?;

    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_base = \"https://api.example.com/\"\n").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.api_base, "https://api.example.com");
        assert_eq!(config.token_path, dir.path().join("token"));
    }

    #[test]
    fn test_explicit_token_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "api_base = \"https://api.example.com\"\ntoken_path = \"/tmp/t\"\n",
        )
        .unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.token_path, PathBuf::from("/tmp/t"));
    }

    #[test]
    fn test_missing_api_base_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "token_path = \"/tmp/t\"\n").unwrap();
        assert!(load(Some(&path)).is_err());
    }

    #[test]
    fn test_init_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        init(Some(&path), "https://api.example.com/").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.api_base, "https://api.example.com");
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        init(Some(&path), "https://api.example.com").unwrap();
        assert!(init(Some(&path), "https://other.example.com").is_err());
    }
}
