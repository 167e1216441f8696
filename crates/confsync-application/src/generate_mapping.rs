//! Mapping template generation.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use confsync_core::mapping::MappingTemplateWriter;
use confsync_core::schedule::ScheduleSource;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMapping {
    pub conf_id: String,
    pub content: String,
    pub session_count: usize,
}

/// Fetches a schedule and renders an unfilled mapping file for it.
pub struct GenerateMappingUseCase {
    schedule_source: Arc<dyn ScheduleSource>,
    template_writer: Arc<dyn MappingTemplateWriter>,
}

impl GenerateMappingUseCase {
    pub fn new(
        schedule_source: Arc<dyn ScheduleSource>,
        template_writer: Arc<dyn MappingTemplateWriter>,
    ) -> Self {
        Self {
            schedule_source,
            template_writer,
        }
    }

    /// `generated_at` is written into the template header.
    pub async fn execute(
        &self,
        conf_id: &str,
        generated_at: DateTime<FixedOffset>,
    ) -> Result<GeneratedMapping> {
        let schedule = self
            .schedule_source
            .fetch(conf_id)
            .await
            .with_context(|| format!("Failed to fetch schedule for {conf_id}"))?;

        let content = self
            .template_writer
            .render(&schedule, generated_at)
            .context("Failed to render mapping template")?;

        tracing::info!(
            "[GenerateMapping] Rendered template for {} ({} sessions)",
            conf_id,
            schedule.sessions().len()
        );

        Ok(GeneratedMapping {
            conf_id: conf_id.to_string(),
            content,
            session_count: schedule.sessions().len(),
        })
    }
}
