//! Schedule source trait.

use super::ConferenceSchedule;
use crate::error::Result;
use async_trait::async_trait;

/// Fetches a conference schedule from wherever it is published.
///
/// Implementations must hand back sessions whose abstracts are already
/// converted to Markdown.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Fetches every session of the conference.
    ///
    /// # Returns
    ///
    /// - `Ok(ConferenceSchedule)`: Sessions sorted by slot, plus the timezone
    /// - `Err(_)`: Transport, parse, or duplicate-slot failure
    async fn fetch(&self, conf_id: &str) -> Result<ConferenceSchedule>;
}
