//! Playlist reconciliation.
//!
//! Diffs the desired video order against the remote playlist and, when
//! mutating, applies one change at a time. Positions reported by the
//! platform are only valid for the state they were read from, so every
//! successful mutation is followed by a fresh listing before the next
//! decision.

use confsync_core::error::RemoteError;
use confsync_core::playlist::{DesiredVideo, OperationKind, PlaylistCounts, PlaylistOperation};
use confsync_core::youtube::{PlaylistItem, PlaylistService, PlaylistSnapshot};
use std::collections::HashSet;
use std::sync::Arc;

/// Operations in the order they were decided, plus totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub operations: Vec<PlaylistOperation>,
    pub counts: PlaylistCounts,
}

pub struct PlaylistReconciler {
    playlist_service: Arc<dyn PlaylistService>,
}

impl PlaylistReconciler {
    pub fn new(playlist_service: Arc<dyn PlaylistService>) -> Self {
        Self { playlist_service }
    }

    /// Brings the playlist into `desired` order, unmapped entries last.
    ///
    /// Target position of each desired video is its index in `desired`.
    /// Entries not in `desired` keep their relative order and are assigned
    /// the trailing positions.
    ///
    /// With `mutate == false` nothing is written and every decision is made
    /// against `snapshot` as given; the plan can therefore differ from what
    /// a real run would do once positions start shifting.
    ///
    /// # Errors
    ///
    /// The first remote failure aborts reconciliation. Mutations already
    /// applied are not rolled back.
    pub async fn reconcile(
        &self,
        playlist_id: &str,
        desired: &[DesiredVideo],
        snapshot: PlaylistSnapshot,
        mutate: bool,
    ) -> Result<ReconcileOutcome, RemoteError> {
        let mut snapshot = snapshot;
        let mut operations = Vec::with_capacity(desired.len() + snapshot.len());

        for (index, video) in desired.iter().enumerate() {
            let target = to_position(index);

            let kind = match snapshot.get(&video.video_id).cloned() {
                None => {
                    if mutate {
                        self.playlist_service
                            .add_item(playlist_id, &video.video_id, target)
                            .await?;
                        tracing::info!(
                            "[Reconciler] Added to playlist: {} ({}) at position {}",
                            video.title,
                            video.video_id,
                            target
                        );
                        snapshot = self.refresh(playlist_id).await?;
                    }
                    OperationKind::Add
                }
                Some(item) if item.position != target => {
                    if mutate {
                        self.move_to(playlist_id, &item, target).await?;
                        tracing::info!(
                            "[Reconciler] Reordered in playlist: {} ({}) to position {}",
                            video.title,
                            video.video_id,
                            target
                        );
                        snapshot = self.refresh(playlist_id).await?;
                    }
                    OperationKind::Reorder
                }
                Some(_) => OperationKind::Unchanged,
            };

            operations.push(PlaylistOperation::for_desired(kind, video, target));
        }

        let desired_ids: HashSet<&str> = desired.iter().map(|v| v.video_id.as_str()).collect();
        let unmapped: Vec<String> = snapshot
            .items_by_position()
            .into_iter()
            .filter(|item| !desired_ids.contains(item.video_id.as_str()))
            .map(|item| item.video_id.clone())
            .collect();

        for (offset, video_id) in unmapped.iter().enumerate() {
            let target = to_position(desired.len() + offset);

            let Some(item) = snapshot.get(video_id).cloned() else {
                tracing::warn!(
                    "[Reconciler] Unmapped video {} disappeared from playlist {}",
                    video_id,
                    playlist_id
                );
                continue;
            };

            let kind = if item.position == target {
                OperationKind::Unchanged
            } else {
                if mutate {
                    self.move_to(playlist_id, &item, target).await?;
                    tracing::info!("[Reconciler] Moved to end: {} at position {}", video_id, target);
                    snapshot = self.refresh(playlist_id).await?;
                }
                OperationKind::MoveToEnd
            };

            operations.push(PlaylistOperation::for_unmapped(kind, video_id, target));
        }

        let counts = PlaylistCounts::from_operations(&operations);
        Ok(ReconcileOutcome { operations, counts })
    }

    async fn move_to(
        &self,
        playlist_id: &str,
        item: &PlaylistItem,
        target: u32,
    ) -> Result<(), RemoteError> {
        self.playlist_service
            .move_item(&item.item_id, playlist_id, &item.video_id, target)
            .await
    }

    async fn refresh(&self, playlist_id: &str) -> Result<PlaylistSnapshot, RemoteError> {
        let snapshot = self.playlist_service.list_items(playlist_id).await?;
        tracing::debug!(
            "[Reconciler] Refreshed playlist {} ({} items)",
            playlist_id,
            snapshot.len()
        );
        Ok(snapshot)
    }
}

fn to_position(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
