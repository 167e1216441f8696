//! Remote video platform service traits.
//!
//! Both traits report [`RemoteError`] rather than the crate-wide error so
//! callers can tell not-found, auth, quota and transport failures apart.

use async_trait::async_trait;

use super::{PlaylistSnapshot, VideoInfo, VideoUpdateRequest};
use crate::error::RemoteError;

/// Reads and writes per-video metadata.
#[async_trait]
pub trait VideoService: Send + Sync {
    /// Fetches the current title, description and category of a video.
    async fn get_info(&self, video_id: &str) -> Result<VideoInfo, RemoteError>;

    /// Overwrites the video's title and description.
    async fn update(&self, request: &VideoUpdateRequest) -> Result<(), RemoteError>;
}

/// Reads and reorders playlist entries.
#[async_trait]
pub trait PlaylistService: Send + Sync {
    /// Lists every item of the playlist, following pagination.
    async fn list_items(&self, playlist_id: &str) -> Result<PlaylistSnapshot, RemoteError>;

    /// Inserts a video at `position`, shifting later items down.
    async fn add_item(
        &self,
        playlist_id: &str,
        video_id: &str,
        position: u32,
    ) -> Result<(), RemoteError>;

    /// Moves an existing playlist item to `position`.
    async fn move_item(
        &self,
        item_id: &str,
        playlist_id: &str,
        video_id: &str,
        position: u32,
    ) -> Result<(), RemoteError>;
}
