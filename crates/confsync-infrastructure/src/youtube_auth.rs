//! OAuth access tokens for the YouTube Data API.
//!
//! # Files
//!
//! - `credentials.json`: OAuth client secrets from Google Cloud Console
//!   (`installed` or `web` application type)
//! - token file: authorized-user JSON holding the refresh token and, after
//!   the first refresh, the cached access token and its expiry
//!
//! Without a usable token (no file, no refresh token, or a revoked one)
//! and with a consent prompt configured, the loopback consent flow in
//! [`crate::oauth_consent`] obtains a new one.

use crate::oauth_consent::LoopbackConsent;
use chrono::{DateTime, Duration, Utc};
use confsync_core::error::{ConfSyncError, ConfigError, RemoteError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube.force-ssl";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// Tokens this close to expiry are refreshed anyway.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, Deserialize)]
struct ClientSecretsFile {
    installed: Option<OAuthClient>,
    web: Option<OAuthClient>,
}

/// OAuth client registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

/// Authorized-user token file.
///
/// Fields this tool does not use are kept as-is when the file is rewritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    #[serde(default, alias = "access_token", skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StoredToken {
    /// Empty token bound to `oauth_client`, so later refreshes need no
    /// credentials file.
    pub fn for_client(oauth_client: &OAuthClient) -> Self {
        let mut extra = serde_json::Map::new();
        extra.insert("scopes".to_string(), serde_json::json!([YOUTUBE_SCOPE]));
        Self {
            client_id: Some(oauth_client.client_id.clone()),
            client_secret: Some(oauth_client.client_secret.clone()),
            token_uri: Some(oauth_client.token_uri.clone()),
            extra,
            ..Default::default()
        }
    }

    /// Cached access token, if it is still valid at `now`.
    pub fn valid_access_token(&self, now: DateTime<Utc>) -> Option<&str> {
        let token = self.token.as_deref().filter(|t| !t.is_empty())?;
        match self.expiry {
            Some(expiry) if expiry > now + Duration::seconds(EXPIRY_MARGIN_SECS) => Some(token),
            _ => None,
        }
    }

    /// Client registration embedded in the token file, if complete.
    fn embedded_client(&self) -> Option<OAuthClient> {
        Some(OAuthClient {
            client_id: self.client_id.clone()?,
            client_secret: self.client_secret.clone()?,
            token_uri: self.token_uri.clone().unwrap_or_else(default_token_uri),
            auth_uri: default_auth_uri(),
        })
    }

    pub(crate) fn apply_refresh(&mut self, response: TokenResponse, now: DateTime<Utc>) {
        self.token = Some(response.access_token);
        self.expiry = Some(now + Duration::seconds(response.expires_in));
        if let Some(refresh_token) = response.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    #[serde(default = "default_expires_in")]
    pub(crate) expires_in: i64,
    #[serde(default)]
    pub(crate) refresh_token: Option<String>,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Reads and writes the OAuth files.
#[derive(Debug, Clone)]
pub struct TokenStorage {
    credentials_path: PathBuf,
    token_path: PathBuf,
}

impl TokenStorage {
    pub fn new(credentials_path: impl Into<PathBuf>, token_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            token_path: token_path.into(),
        }
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// Reads the token file; `None` when it does not exist yet.
    pub async fn load_token(&self) -> Result<Option<StoredToken>> {
        let content = match tokio::fs::read_to_string(&self.token_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfSyncError::io(format!(
                    "Failed to read {}: {}",
                    self.token_path.display(),
                    e
                )));
            }
        };

        let token = serde_json::from_str(&content).map_err(|e| {
            ConfigError::Invalid(format!(
                "Invalid token file {}: {}",
                self.token_path.display(),
                e
            ))
        })?;
        Ok(Some(token))
    }

    pub async fn load_client(&self) -> Result<OAuthClient> {
        let content = tokio::fs::read_to_string(&self.credentials_path)
            .await
            .map_err(|e| {
                ConfigError::Invalid(format!(
                    "Cannot read OAuth credentials {}: {}",
                    self.credentials_path.display(),
                    e
                ))
            })?;
        parse_client_secrets(&content, &self.credentials_path)
    }

    /// Writes the token file readable by the owner only.
    pub async fn save_token(&self, token: &StoredToken) -> Result<()> {
        if let Some(parent) = self.token_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(token)?;
        tokio::fs::write(&self.token_path, content).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.token_path, std::fs::Permissions::from_mode(0o600))
                .await?;
        }

        tracing::debug!("[YouTubeAuth] Saved token to {}", self.token_path.display());
        Ok(())
    }
}

fn parse_client_secrets(content: &str, path: &Path) -> Result<OAuthClient> {
    let file: ClientSecretsFile = serde_json::from_str(content).map_err(|e| {
        ConfigError::Invalid(format!("Invalid OAuth credentials {}: {}", path.display(), e))
    })?;

    file.installed.or(file.web).ok_or_else(|| {
        ConfigError::Invalid(format!(
            "OAuth credentials {} contain neither an 'installed' nor a 'web' client",
            path.display()
        ))
        .into()
    })
}

/// Callback that shows the consent URL to the user.
pub type ConsentPrompt = Box<dyn Fn(&str) + Send + Sync>;

/// Provides a valid access token, refreshing and persisting it when needed.
pub struct YouTubeAuth {
    client: Client,
    storage: TokenStorage,
    consent_prompt: Option<ConsentPrompt>,
}

impl YouTubeAuth {
    pub fn new(client: Client, storage: TokenStorage) -> Self {
        Self {
            client,
            storage,
            consent_prompt: None,
        }
    }

    /// Enables the browser consent flow when no usable token exists.
    pub fn with_consent_prompt(mut self, prompt: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.consent_prompt = Some(Box::new(prompt));
        self
    }

    pub async fn access_token(&self) -> Result<String> {
        let Some(mut token) = self.storage.load_token().await? else {
            let reason = format!("Token file {} not found", self.storage.token_path().display());
            return self.authorize(&reason).await;
        };

        if let Some(access_token) = token.valid_access_token(Utc::now()) {
            tracing::debug!("[YouTubeAuth] Using cached access token");
            return Ok(access_token.to_string());
        }

        let Some(refresh_token) = token.refresh_token.clone() else {
            let reason = format!(
                "Token file {} has no refresh_token and its access token has expired",
                self.storage.token_path().display()
            );
            return self.authorize(&reason).await;
        };

        let oauth_client = match token.embedded_client() {
            Some(client) => client,
            None => self.storage.load_client().await?,
        };

        tracing::info!("[YouTubeAuth] Refreshing access token");
        let response = match self.refresh(&oauth_client, &refresh_token).await {
            Ok(response) => response,
            Err(e) if e.is_auth() && self.consent_prompt.is_some() => {
                tracing::warn!("[YouTubeAuth] Token refresh rejected, falling back to consent flow");
                return self.authorize("Stored refresh token was rejected").await;
            }
            Err(e) => return Err(e),
        };
        token.apply_refresh(response, Utc::now());
        self.storage.save_token(&token).await?;

        token
            .token
            .ok_or_else(|| ConfSyncError::internal("access token missing after refresh"))
    }

    async fn authorize(&self, reason: &str) -> Result<String> {
        let Some(prompt) = &self.consent_prompt else {
            return Err(ConfigError::Invalid(format!(
                "{reason}. Run interactively to authorize scope {YOUTUBE_SCOPE}."
            ))
            .into());
        };

        tracing::info!("[YouTubeAuth] {}; starting consent flow", reason);
        let oauth_client = self.storage.load_client().await?;
        let token = LoopbackConsent::new(self.client.clone())
            .authorize(&oauth_client, &**prompt)
            .await?;
        self.storage.save_token(&token).await?;

        token
            .token
            .ok_or_else(|| ConfSyncError::internal("access token missing after consent"))
    }

    async fn refresh(&self, oauth_client: &OAuthClient, refresh_token: &str) -> Result<TokenResponse> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", oauth_client.client_id.as_str()),
            ("client_secret", oauth_client.client_secret.as_str()),
        ];
        post_token_form(&self.client, &oauth_client.token_uri, &params).await
    }
}

/// Posts a form to the token endpoint and parses the token response.
pub(crate) async fn post_token_form(
    client: &Client,
    token_uri: &str,
    params: &[(&str, &str)],
) -> Result<TokenResponse> {
    let response = client
        .post(token_uri)
        .form(params)
        .send()
        .await
        .map_err(|e| RemoteError::Transport(format!("Token request failed: {e}")))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| RemoteError::Transport(format!("Token request failed: {e}")))?;

    if !status.is_success() {
        return Err(map_token_error(status, &body).into());
    }

    serde_json::from_str(&body)
        .map_err(|e| RemoteError::InvalidResponse(format!("token response: {e}")).into())
}

/// `invalid_grant` and friends mean the refresh token is no longer usable.
fn map_token_error(status: StatusCode, body: &str) -> RemoteError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
            if let Ok(error) = serde_json::from_str::<TokenErrorResponse>(body) {
                tracing::warn!(
                    "[YouTubeAuth] Token request rejected: {} {}",
                    error.error,
                    error.error_description.unwrap_or_default()
                );
            }
            RemoteError::Unauthorized
        }
        _ => RemoteError::Http {
            status: status.as_u16(),
            message: body.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-07T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_parse_installed_and_web_clients() {
        let installed = json!({
            "installed": {"client_id": "id", "client_secret": "secret", "token_uri": "https://t/token"}
        })
        .to_string();
        let client = parse_client_secrets(&installed, Path::new("c.json")).unwrap();
        assert_eq!(client.token_uri, "https://t/token");

        let web = json!({"web": {"client_id": "id", "client_secret": "secret"}}).to_string();
        let client = parse_client_secrets(&web, Path::new("c.json")).unwrap();
        assert_eq!(client.client_id, "id");
        assert_eq!(client.token_uri, DEFAULT_TOKEN_URI);
        assert_eq!(client.auth_uri, DEFAULT_AUTH_URI);

        let neither = json!({"other": {}}).to_string();
        assert!(
            parse_client_secrets(&neither, Path::new("c.json"))
                .unwrap_err()
                .is_config()
        );
    }

    #[test]
    fn test_valid_access_token_respects_expiry() {
        let mut token = StoredToken {
            token: Some("abc".to_string()),
            expiry: Some(now() + Duration::minutes(30)),
            ..Default::default()
        };
        assert_eq!(token.valid_access_token(now()), Some("abc"));

        token.expiry = Some(now() + Duration::seconds(30));
        assert_eq!(token.valid_access_token(now()), None);

        token.expiry = None;
        assert_eq!(token.valid_access_token(now()), None);
    }

    #[test]
    fn test_token_file_aliases_and_extra_fields() {
        let content = json!({
            "access_token": "abc",
            "refresh_token": "r1",
            "expiry": "2026-01-07T11:00:00.123456Z",
            "scopes": [YOUTUBE_SCOPE],
            "universe_domain": "googleapis.com"
        })
        .to_string();
        let token: StoredToken = serde_json::from_str(&content).unwrap();

        assert_eq!(token.token.as_deref(), Some("abc"));
        assert_eq!(token.refresh_token.as_deref(), Some("r1"));
        assert!(token.valid_access_token(now()).is_some());

        let written = serde_json::to_value(&token).unwrap();
        assert_eq!(written["token"], "abc");
        assert_eq!(written["scopes"], json!([YOUTUBE_SCOPE]));
        assert_eq!(written["universe_domain"], "googleapis.com");
    }

    #[test]
    fn test_apply_refresh_keeps_refresh_token_unless_rotated() {
        let mut token = StoredToken {
            refresh_token: Some("r1".to_string()),
            ..Default::default()
        };
        token.apply_refresh(
            TokenResponse {
                access_token: "new".to_string(),
                expires_in: 3599,
                refresh_token: None,
            },
            now(),
        );

        assert_eq!(token.token.as_deref(), Some("new"));
        assert_eq!(token.refresh_token.as_deref(), Some("r1"));
        assert_eq!(token.expiry, Some(now() + Duration::seconds(3599)));

        token.apply_refresh(
            TokenResponse {
                access_token: "newer".to_string(),
                expires_in: 3600,
                refresh_token: Some("r2".to_string()),
            },
            now(),
        );
        assert_eq!(token.refresh_token.as_deref(), Some("r2"));
    }

    #[test]
    fn test_embedded_client_requires_id_and_secret() {
        let mut token = StoredToken {
            client_id: Some("id".to_string()),
            ..Default::default()
        };
        assert!(token.embedded_client().is_none());

        token.client_secret = Some("secret".to_string());
        let client = token.embedded_client().unwrap();
        assert_eq!(client.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_map_token_error() {
        let body = json!({"error": "invalid_grant", "error_description": "Token has been expired or revoked."})
            .to_string();
        assert_eq!(
            map_token_error(StatusCode::BAD_REQUEST, &body),
            RemoteError::Unauthorized
        );
        assert_eq!(
            map_token_error(StatusCode::SERVICE_UNAVAILABLE, "down"),
            RemoteError::Http {
                status: 503,
                message: "down".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_token_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TokenStorage::new(dir.path().join("c.json"), dir.path().join("t.json"));

        assert!(storage.load_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_token_without_prompt_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TokenStorage::new(dir.path().join("c.json"), dir.path().join("t.json"));

        let auth = YouTubeAuth::new(Client::new(), storage);
        let err = auth.access_token().await.unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains(YOUTUBE_SCOPE));
    }

    #[tokio::test]
    async fn test_save_and_reload_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("token.json");
        let storage = TokenStorage::new(dir.path().join("c.json"), &path);
        let token = StoredToken {
            token: Some("abc".to_string()),
            refresh_token: Some("r1".to_string()),
            expiry: Some(now()),
            ..Default::default()
        };

        storage.save_token(&token).await.unwrap();
        let reloaded = storage.load_token().await.unwrap();
        assert_eq!(reloaded, Some(token));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[tokio::test]
    async fn test_cached_token_needs_no_network() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TokenStorage::new(dir.path().join("c.json"), dir.path().join("t.json"));
        storage
            .save_token(&StoredToken {
                token: Some("cached".to_string()),
                expiry: Some(Utc::now() + Duration::hours(1)),
                ..Default::default()
            })
            .await
            .unwrap();

        let auth = YouTubeAuth::new(Client::new(), storage);
        assert_eq!(auth.access_token().await.unwrap(), "cached");
    }

    #[tokio::test]
    async fn test_expired_without_refresh_token_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TokenStorage::new(dir.path().join("c.json"), dir.path().join("t.json"));
        storage
            .save_token(&StoredToken {
                token: Some("stale".to_string()),
                expiry: Some(Utc::now() - Duration::hours(1)),
                ..Default::default()
            })
            .await
            .unwrap();

        let auth = YouTubeAuth::new(Client::new(), storage);
        assert!(auth.access_token().await.unwrap_err().is_config());
    }
}
