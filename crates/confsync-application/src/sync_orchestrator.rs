//! End-to-end sync run.
//!
//! Loads the mapping, fetches the schedule, runs the content phase for
//! every session and then reconciles the playlist. The two phases fail
//! independently: a playlist failure never discards content results.

use crate::dto::{
    PlaylistPhase, PlaylistSyncResult, RunResult, SessionReport, SessionStatus, UnusedMapping,
};
use crate::playlist_reconciler::PlaylistReconciler;
use crate::video_update::VideoUpdateUseCase;
use anyhow::{Context, Result};
use confsync_core::error::{ConfSyncError, ConfigError, RemoteError};
use confsync_core::mapping::{MappingConfig, MappingSource};
use confsync_core::playlist::DesiredVideo;
use confsync_core::schedule::{ConferenceSchedule, ScheduleSlot, ScheduleSource};
use confsync_core::youtube::{PlaylistService, VideoService};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub dry_run: bool,
    pub skip_playlist: bool,
}

pub struct SyncOrchestrator {
    schedule_source: Arc<dyn ScheduleSource>,
    mapping_source: Arc<dyn MappingSource>,
    video_update: VideoUpdateUseCase,
    playlist_service: Arc<dyn PlaylistService>,
}

impl SyncOrchestrator {
    pub fn new(
        schedule_source: Arc<dyn ScheduleSource>,
        mapping_source: Arc<dyn MappingSource>,
        video_service: Arc<dyn VideoService>,
        playlist_service: Arc<dyn PlaylistService>,
    ) -> Self {
        Self {
            schedule_source,
            mapping_source,
            video_update: VideoUpdateUseCase::new(video_service),
            playlist_service,
        }
    }

    /// Runs both phases.
    ///
    /// `conf_id` defaults to the mapping file's `conf_id`; when given it must
    /// agree with the file.
    ///
    /// # Errors
    ///
    /// Only fatal problems are returned as errors: an unreadable mapping, a
    /// conference id mismatch, or a schedule that cannot be fetched. Those
    /// happen before any remote write.
    pub async fn run(
        &self,
        conf_id: Option<&str>,
        mapping_path: &Path,
        options: RunOptions,
    ) -> Result<RunResult> {
        let mapping = self
            .mapping_source
            .load(mapping_path)
            .await
            .with_context(|| format!("Failed to load mapping file {}", mapping_path.display()))?;

        match conf_id {
            Some(expected) if expected != mapping.conf_id() => {
                return Err(ConfSyncError::from(ConfigError::ConfIdMismatch {
                    expected: expected.to_string(),
                    actual: mapping.conf_id().to_string(),
                })
                .into());
            }
            _ => {}
        }

        let schedule = self
            .schedule_source
            .fetch(mapping.conf_id())
            .await
            .with_context(|| format!("Failed to fetch schedule for {}", mapping.conf_id()))?;

        tracing::info!(
            "[Orchestrator] {} sessions in {} ({}), {} mappings",
            schedule.sessions().len(),
            schedule.conf_id(),
            schedule.timezone(),
            mapping.mappings().len()
        );

        let (sessions, used_slots) = self
            .update_content(&schedule, &mapping, options.dry_run)
            .await;
        let unused_mappings = report_unused(&mapping, &used_slots);

        let playlist = if options.skip_playlist {
            PlaylistPhase::Skipped("playlist sync disabled".to_string())
        } else if mapping.playlist_id().is_empty() {
            PlaylistPhase::Skipped("no playlist_id in mapping".to_string())
        } else {
            match self.sync_playlist(&schedule, &mapping, options.dry_run).await {
                Ok(result) => PlaylistPhase::Synced(result),
                Err(e) => {
                    tracing::error!(
                        "[Orchestrator] Playlist sync failed for {}: {}",
                        mapping.playlist_id(),
                        e
                    );
                    PlaylistPhase::Failed(e.to_string())
                }
            }
        };

        Ok(RunResult {
            conf_id: mapping.conf_id().to_string(),
            is_dry_run: options.dry_run,
            sessions,
            unused_mappings,
            playlist,
        })
    }

    async fn update_content(
        &self,
        schedule: &ConferenceSchedule,
        mapping: &MappingConfig,
        dry_run: bool,
    ) -> (Vec<SessionReport>, HashSet<ScheduleSlot>) {
        let mut reports = Vec::with_capacity(schedule.sessions().len());
        let mut used_slots = HashSet::new();

        for session in schedule.sessions() {
            let Some(video_mapping) = mapping.find_mapping(session.slot()) else {
                reports.push(SessionReport {
                    slot: session.slot().clone(),
                    title: session.title().to_string(),
                    video_id: None,
                    status: SessionStatus::SkippedNoMapping,
                    preview: None,
                });
                continue;
            };

            used_slots.insert(session.slot().clone());

            let session = match &video_mapping.session_override {
                Some(session_override) => session.apply_override(session_override),
                None => session.clone(),
            };

            let report = self
                .video_update
                .process(
                    &session,
                    video_mapping,
                    mapping.hashtags(),
                    mapping.footer(),
                    dry_run,
                )
                .await;
            reports.push(report);
        }

        (reports, used_slots)
    }

    async fn sync_playlist(
        &self,
        schedule: &ConferenceSchedule,
        mapping: &MappingConfig,
        dry_run: bool,
    ) -> std::result::Result<PlaylistSyncResult, RemoteError> {
        let playlist_id = mapping.playlist_id();
        let desired = desired_order(schedule, mapping);
        let snapshot = self.playlist_service.list_items(playlist_id).await?;

        tracing::info!(
            "[Orchestrator] Reconciling playlist {}: {} desired, {} present",
            playlist_id,
            desired.len(),
            snapshot.len()
        );

        let reconciler = PlaylistReconciler::new(self.playlist_service.clone());
        let outcome = reconciler
            .reconcile(playlist_id, &desired, snapshot, !dry_run)
            .await?;

        Ok(PlaylistSyncResult {
            is_dry_run: dry_run,
            playlist_id: playlist_id.to_string(),
            operations: outcome.operations,
            counts: outcome.counts,
        })
    }
}

/// Video ids of mapped sessions in schedule order.
///
/// A video mapped to more than one slot keeps its first position only.
pub fn desired_order(schedule: &ConferenceSchedule, mapping: &MappingConfig) -> Vec<DesiredVideo> {
    let mut seen = HashSet::new();
    let mut desired = Vec::new();

    for session in schedule.sessions() {
        let Some(video_mapping) = mapping.find_mapping(session.slot()) else {
            continue;
        };

        if !seen.insert(video_mapping.video_id.as_str()) {
            tracing::warn!(
                "[Orchestrator] Video {} is mapped to more than one slot; ignoring {} for playlist order",
                video_mapping.video_id,
                session.slot()
            );
            continue;
        }

        desired.push(DesiredVideo::new(
            video_mapping.video_id.clone(),
            session.title(),
            session.slot().clone(),
        ));
    }

    desired
}

fn report_unused(mapping: &MappingConfig, used_slots: &HashSet<ScheduleSlot>) -> Vec<UnusedMapping> {
    mapping
        .find_unused(used_slots)
        .into_iter()
        .map(|unused| {
            tracing::warn!(
                "[Orchestrator] Unused mapping {} ({})",
                unused.slot,
                unused.video_id
            );
            UnusedMapping {
                slot: unused.slot.clone(),
                video_id: unused.video_id.clone(),
            }
        })
        .collect()
}
