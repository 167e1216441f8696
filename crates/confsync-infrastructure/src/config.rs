//! Application configuration loaded from `config.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.

use crate::paths::ConfSyncPaths;
use confsync_core::error::{ConfSyncError, ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFENGINE_BASE_URL: &str = "https://confengine.com/api/v3";
pub const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_CREDENTIALS_PATH: &str = ".credentials.json";
pub const DEFAULT_TOKEN_PATH: &str = ".token.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub confengine: ConfEngineConfig,
    pub youtube: YouTubeConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfEngineConfig {
    pub base_url: String,
}

impl Default for ConfEngineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CONFENGINE_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    pub api_base_url: String,
    /// OAuth client secrets downloaded from Google Cloud Console.
    pub credentials_path: PathBuf,
    pub token_path: PathBuf,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_YOUTUBE_API_BASE_URL.to_string(),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("confsync/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Loads the config from `path`, or from the default location when
    /// `path` is `None`.
    ///
    /// A missing file yields defaults. An explicitly given path that does
    /// not exist is an error.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match ConfSyncPaths::config_file() {
                Ok(path) => (path, false),
                Err(e) => {
                    tracing::debug!("[Config] {}; using defaults", e);
                    return Ok(Self::default());
                }
            },
        };

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Self::parse(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
                tracing::debug!("[Config] {} not found; using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ConfSyncError::from(ConfigError::Invalid(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            )))),
        }
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            ConfSyncError::from(ConfigError::Invalid(format!(
                "Invalid config file {}: {}",
                path.display(),
                e
            )))
        })?;
        tracing::debug!("[Config] Loaded {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let content = r#"
[youtube]
token_path = "/secrets/token.json"

[http]
timeout_secs = 5
"#;
        let config = AppConfig::parse(content, Path::new("config.toml")).unwrap();

        assert_eq!(config.youtube.token_path, PathBuf::from("/secrets/token.json"));
        assert_eq!(
            config.youtube.credentials_path,
            PathBuf::from(DEFAULT_CREDENTIALS_PATH)
        );
        assert_eq!(config.youtube.api_base_url, DEFAULT_YOUTUBE_API_BASE_URL);
        assert_eq!(config.confengine.base_url, DEFAULT_CONFENGINE_BASE_URL);
        assert_eq!(config.http.timeout_secs, 5);
        assert!(config.http.user_agent.starts_with("confsync/"));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let result = AppConfig::parse("[http\ntimeout_secs = ", Path::new("config.toml"));
        assert!(result.unwrap_err().is_config());
    }

    #[tokio::test]
    async fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[confengine]\nbase_url = \"http://localhost:8080\"").unwrap();

        let config = AppConfig::load(Some(file.path())).await.unwrap();

        assert_eq!(config.confengine.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("nope.toml"))).await;

        assert!(result.unwrap_err().is_config());
    }
}
