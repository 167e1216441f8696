//! Error types for confsync.

use thiserror::Error;

/// Failures while turning a session into YouTube title/description text.
///
/// These are recoverable per session: the caller records the error and
/// moves on to the next session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("Title is required")]
    TitleEmpty,

    #[error("Title must be {max_length} characters or less (current: {length})")]
    TitleTooLong { length: usize, max_length: usize },

    #[error("Description must be {max_length} characters or less (current: {length})")]
    DescriptionTooLong { length: usize, max_length: usize },

    /// Speaker line, separators, URL, hashtags and footer alone leave no
    /// room for the abstract. This is a mapping configuration problem.
    #[error("Frame content alone exceeds character limit (length: {frame_length})")]
    FrameOverflow { frame_length: usize },
}

/// Failures reported by the remote video platform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("YouTube API authentication failed. Please re-authenticate.")]
    Unauthorized,

    #[error("YouTube API access forbidden. Check quota or permissions.")]
    Forbidden,

    #[error("YouTube API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("YouTube API error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    pub fn video_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "Video",
            id: id.into(),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Forbidden)
    }
}

/// Configuration problems detected before any remote mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Duplicate slot detected: {0}")]
    DuplicateSlot(String),

    #[error("Duplicate mapping for slot: {0}")]
    DuplicateMapping(String),

    #[error("Session title is empty: {0}")]
    EmptyTitle(String),

    #[error("Conference ID mismatch: expected '{expected}', mapping file has '{actual}'")]
    ConfIdMismatch { expected: String, actual: String },

    #[error("Invalid mapping file {path}: {message}")]
    MappingFile { path: String, message: String },

    #[error("{0}")]
    Invalid(String),
}

/// The shared error type for confsync.
#[derive(Error, Debug, Clone)]
pub enum ConfSyncError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConfSyncError {
    /// Creates a Config error from a free-form message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(ConfigError::Invalid(message.into()))
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    pub fn is_content(&self) -> bool {
        matches!(self, Self::Content(_))
    }

    /// Credentials were rejected; re-authorizing may help.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Remote(e) if e.is_auth())
    }
}

impl From<std::io::Error> for ConfSyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ConfSyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ConfSyncError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            format: "YAML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConfSyncError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error, used at adapter boundaries
impl From<anyhow::Error> for ConfSyncError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, ConfSyncError>`.
pub type Result<T> = std::result::Result<T, ConfSyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_kinds_are_distinguishable() {
        assert!(RemoteError::Unauthorized.is_auth());
        assert!(RemoteError::Forbidden.is_auth());
        assert!(!RemoteError::RateLimited.is_auth());
        assert!(ConfSyncError::from(RemoteError::Unauthorized).is_auth());
        assert!(!ConfSyncError::config("bad").is_auth());
        assert!(!RemoteError::Http {
            status: 500,
            message: "boom".into()
        }
        .is_auth());
    }

    #[test]
    fn test_conversions_keep_family() {
        let err: ConfSyncError = ContentError::FrameOverflow { frame_length: 5001 }.into();
        assert!(err.is_content());
        assert_eq!(
            err.to_string(),
            "Frame content alone exceeds character limit (length: 5001)"
        );

        let err: ConfSyncError = ConfigError::DuplicateSlot("x".into()).into();
        assert!(err.is_config());

        let err: ConfSyncError = RemoteError::RateLimited.into();
        assert!(err.is_remote());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ConfSyncError = io.into();
        assert!(matches!(err, ConfSyncError::Io { .. }));
    }
}
