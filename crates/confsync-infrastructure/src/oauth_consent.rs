//! Installed-app OAuth consent over a loopback redirect.
//!
//! # Flow
//!
//! 1. Bind `127.0.0.1:0` and use it as the redirect URI
//! 2. Show the authorization URL for [`YOUTUBE_SCOPE`] to the user
//! 3. Wait for the browser to hit the redirect with `code` and `state`
//! 4. Exchange the code at the client's `token_uri`

use crate::youtube_auth::{OAuthClient, StoredToken, YOUTUBE_SCOPE, post_token_form};
use chrono::{DateTime, Utc};
use confsync_core::error::{ConfigError, Result};
use reqwest::{Client, Url};
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use uuid::Uuid;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

const SUCCESS_PAGE: &str =
    "<html><body><p>confsync is authorized. You can close this window.</p></body></html>";
const DENIED_PAGE: &str =
    "<html><body><p>Authorization was not granted. You can close this window.</p></body></html>";

/// Receives the user's consent through the local browser.
pub struct LoopbackConsent {
    client: Client,
    timeout: Duration,
}

impl LoopbackConsent {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Runs the full flow and returns a token ready to be saved.
    ///
    /// `show_url` receives the authorization URL the user has to open.
    pub async fn authorize(
        &self,
        oauth_client: &OAuthClient,
        show_url: &(dyn Fn(&str) + Send + Sync),
    ) -> Result<StoredToken> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let redirect_uri = format!("http://127.0.0.1:{}/", listener.local_addr()?.port());
        let state = Uuid::new_v4().simple().to_string();

        let url = authorization_url(oauth_client, &redirect_uri, &state)?;
        tracing::info!("[OAuthConsent] Waiting for consent on {}", redirect_uri);
        show_url(url.as_str());

        let code = tokio::time::timeout(self.timeout, wait_for_code(&listener, &state))
            .await
            .map_err(|_| {
                ConfigError::Invalid(format!(
                    "Timed out after {}s waiting for browser authorization",
                    self.timeout.as_secs()
                ))
            })??;

        exchange_code(&self.client, oauth_client, &code, &redirect_uri, Utc::now()).await
    }
}

/// Authorization endpoint URL requesting offline access to [`YOUTUBE_SCOPE`].
pub fn authorization_url(oauth_client: &OAuthClient, redirect_uri: &str, state: &str) -> Result<Url> {
    Url::parse_with_params(
        &oauth_client.auth_uri,
        &[
            ("client_id", oauth_client.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", YOUTUBE_SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state),
        ],
    )
    .map_err(|e| {
        ConfigError::Invalid(format!("Invalid auth_uri '{}': {}", oauth_client.auth_uri, e)).into()
    })
}

#[derive(Debug, PartialEq, Eq)]
enum Callback {
    Code(String),
    Denied(String),
    Ignored,
}

/// Interprets the request target of a redirect hit.
///
/// Requests without our `state` (favicon, stray tabs) are ignored.
fn parse_callback(target: &str, state: &str) -> Callback {
    let Ok(url) = Url::parse(&format!("http://127.0.0.1{target}")) else {
        return Callback::Ignored;
    };
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    if params.get("state").map(String::as_str) != Some(state) {
        return Callback::Ignored;
    }
    if let Some(error) = params.get("error") {
        return Callback::Denied(error.clone());
    }
    match params.get("code") {
        Some(code) if !code.is_empty() => Callback::Code(code.clone()),
        _ => Callback::Ignored,
    }
}

/// Accepts redirect requests until one carries the authorization code.
async fn wait_for_code(listener: &TcpListener, state: &str) -> Result<String> {
    loop {
        let (mut stream, _) = listener.accept().await?;
        let target = read_request_target(&mut stream).await?;

        match parse_callback(&target, state) {
            Callback::Code(code) => {
                respond(&mut stream, "200 OK", SUCCESS_PAGE).await;
                return Ok(code);
            }
            Callback::Denied(error) => {
                respond(&mut stream, "400 Bad Request", DENIED_PAGE).await;
                return Err(ConfigError::Invalid(format!("Authorization was denied: {error}")).into());
            }
            Callback::Ignored => {
                tracing::debug!("[OAuthConsent] Ignoring request for {}", target);
                respond(&mut stream, "404 Not Found", "").await;
            }
        }
    }
}

/// Reads the request head and returns the request target.
async fn read_request_target(stream: &mut TcpStream) -> Result<String> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    let mut header = String::new();
    loop {
        header.clear();
        let read = reader.read_line(&mut header).await?;
        if read == 0 || header.trim().is_empty() {
            break;
        }
    }

    Ok(request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string())
}

async fn respond(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let written = async {
        stream.write_all(response.as_bytes()).await?;
        stream.shutdown().await
    }
    .await;
    if let Err(e) = written {
        tracing::debug!("[OAuthConsent] Failed to answer browser: {}", e);
    }
}

/// Trades an authorization code for tokens.
pub async fn exchange_code(
    client: &Client,
    oauth_client: &OAuthClient,
    code: &str,
    redirect_uri: &str,
    now: DateTime<Utc>,
) -> Result<StoredToken> {
    let params = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri),
        ("client_id", oauth_client.client_id.as_str()),
        ("client_secret", oauth_client.client_secret.as_str()),
    ];
    let response = post_token_form(client, &oauth_client.token_uri, &params).await?;

    if response.refresh_token.is_none() {
        tracing::warn!("[OAuthConsent] No refresh token granted; the next run will ask again");
    }

    let mut token = StoredToken::for_client(oauth_client);
    token.apply_refresh(response, now);
    Ok(token)
}
