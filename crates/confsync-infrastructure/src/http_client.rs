//! Shared HTTP client construction.

use crate::config::HttpConfig;
use confsync_core::error::{ConfSyncError, RemoteError, Result};
use reqwest::Client;
use std::time::Duration;

/// Builds the `reqwest` client used by every adapter.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| ConfSyncError::internal(format!("Failed to build HTTP client: {e}")))
}

/// Maps a transport-level failure (DNS, TLS, timeout, body read).
pub(crate) fn transport_error(context: &str, err: reqwest::Error) -> RemoteError {
    RemoteError::Transport(format!("{context}: {err}"))
}
