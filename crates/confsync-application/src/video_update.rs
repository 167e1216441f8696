//! Per-video content update.

use crate::dto::{SessionReport, SessionStatus, UpdatePreview};
use confsync_core::content::{DescriptionGenerator, TitleGenerator};
use confsync_core::error::ContentError;
use confsync_core::mapping::VideoMapping;
use confsync_core::schedule::Session;
use confsync_core::youtube::{VideoInfo, VideoService, VideoUpdateRequest};
use std::sync::Arc;

/// Generates title/description for one mapped session and writes them to
/// the video when they differ from what is there.
///
/// Every failure is confined to the session being processed and comes
/// back as [`SessionStatus::Error`].
pub struct VideoUpdateUseCase {
    video_service: Arc<dyn VideoService>,
    title_generator: TitleGenerator,
    description_generator: DescriptionGenerator,
}

impl VideoUpdateUseCase {
    pub fn new(video_service: Arc<dyn VideoService>) -> Self {
        Self {
            video_service,
            title_generator: TitleGenerator::new(),
            description_generator: DescriptionGenerator::new(),
        }
    }

    /// `session` must already have the mapping's override applied.
    pub async fn process(
        &self,
        session: &Session,
        mapping: &VideoMapping,
        hashtags: &[String],
        footer: &str,
        dry_run: bool,
    ) -> SessionReport {
        let mut report = SessionReport {
            slot: session.slot().clone(),
            title: session.title().to_string(),
            video_id: Some(mapping.video_id.clone()),
            status: SessionStatus::SkippedNoContent,
            preview: None,
        };

        if !session.has_content() {
            tracing::debug!("[VideoUpdate] No abstract for {}, skipping", session.slot());
            return report;
        }

        let current = match self.video_service.get_info(&mapping.video_id).await {
            Ok(info) => info,
            Err(e) => {
                tracing::error!(
                    "[VideoUpdate] Failed to fetch video {} for {}: {}",
                    mapping.video_id,
                    session.slot(),
                    e
                );
                report.status = SessionStatus::Error(e.to_string());
                return report;
            }
        };

        let (new_title, new_description) =
            match self.generate(session, mapping, hashtags, footer, &current) {
                Ok(content) => content,
                Err(e) => {
                    tracing::error!(
                        "[VideoUpdate] Content generation failed for {}: {}",
                        session.slot(),
                        e
                    );
                    report.status = SessionStatus::Error(e.to_string());
                    return report;
                }
            };

        let preview = UpdatePreview {
            session_key: session.slot().to_string(),
            video_id: mapping.video_id.clone(),
            current_title: current.title.clone(),
            current_description: current.description.clone(),
            new_title,
            new_description,
        };

        report.status = if !preview.title_changed() && !preview.description_changed() {
            SessionStatus::Unchanged
        } else if dry_run {
            SessionStatus::Updated
        } else {
            let request = VideoUpdateRequest {
                video_id: mapping.video_id.clone(),
                title: preview.new_title.clone(),
                description: preview.new_description.clone(),
                category_id: current.category_id,
            };
            match self.video_service.update(&request).await {
                Ok(()) => {
                    tracing::info!(
                        "[VideoUpdate] Updated: {} ({})",
                        session.title(),
                        mapping.video_id
                    );
                    SessionStatus::Updated
                }
                Err(e) => {
                    tracing::error!(
                        "[VideoUpdate] Failed to update video {}: {}",
                        mapping.video_id,
                        e
                    );
                    SessionStatus::Error(e.to_string())
                }
            }
        };
        report.preview = Some(preview);
        report
    }

    /// Fields disabled on the mapping keep the video's current value.
    fn generate(
        &self,
        session: &Session,
        mapping: &VideoMapping,
        hashtags: &[String],
        footer: &str,
        current: &VideoInfo,
    ) -> Result<(String, String), ContentError> {
        let title = if mapping.update_title {
            self.title_generator.build(session)?.into_string()
        } else {
            current.title.clone()
        };

        let description = if mapping.update_description {
            self.description_generator
                .build(session, hashtags, footer)?
                .into_string()
        } else {
            current.description.clone()
        };

        Ok((title, description))
    }
}
