//! Mapping persistence traits.

use super::MappingConfig;
use crate::error::Result;
use crate::schedule::ConferenceSchedule;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::path::Path;

/// Loads a [`MappingConfig`] from its on-disk representation.
#[async_trait]
pub trait MappingSource: Send + Sync {
    /// Reads and validates the mapping file at `path`.
    ///
    /// # Returns
    ///
    /// - `Ok(MappingConfig)`: Parsed mapping, slots unique
    /// - `Err(_)`: Missing file, malformed content, or duplicate slot
    async fn load(&self, path: &Path) -> Result<MappingConfig>;
}

/// Renders an empty mapping template for a schedule.
pub trait MappingTemplateWriter: Send + Sync {
    fn render(&self, schedule: &ConferenceSchedule, generated_at: DateTime<FixedOffset>)
    -> Result<String>;
}
