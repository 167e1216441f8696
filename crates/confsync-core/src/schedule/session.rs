use super::slot::ScheduleSlot;
use super::speaker::{self, Speaker};
use crate::error::ConfigError;
use crate::mapping::SessionOverride;

/// A conference session, normalized for content generation.
///
/// Fields are private; use [`Session::new`] so that every session has a
/// non-blank title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    slot: ScheduleSlot,
    title: String,
    track: String,
    speakers: Vec<Speaker>,
    abstract_md: String,
    url: String,
}

impl Session {
    /// Creates a session. `abstract_md` is the Markdown abstract (may be empty).
    pub fn new(
        slot: ScheduleSlot,
        title: impl Into<String>,
        track: impl Into<String>,
        speakers: Vec<Speaker>,
        abstract_md: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ConfigError::EmptyTitle(slot.to_string()));
        }

        Ok(Self {
            slot,
            title,
            track: track.into(),
            speakers,
            abstract_md: abstract_md.into(),
            url: url.into(),
        })
    }

    pub fn slot(&self) -> &ScheduleSlot {
        &self.slot
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn track(&self) -> &str {
        &self.track
    }

    pub fn speakers(&self) -> &[Speaker] {
        &self.speakers
    }

    pub fn abstract_md(&self) -> &str {
        &self.abstract_md
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn has_content(&self) -> bool {
        !self.abstract_md.is_empty()
    }

    pub fn speakers_full(&self) -> String {
        speaker::format_full(&self.speakers)
    }

    pub fn speakers_initials(&self) -> String {
        speaker::format_initials(&self.speakers)
    }

    pub fn speakers_last_names(&self) -> String {
        speaker::format_last_names(&self.speakers)
    }

    /// Returns a copy with the override's fields applied.
    ///
    /// Fields left as `None` in the override keep the schedule's value.
    pub fn apply_override(&self, session_override: &SessionOverride) -> Session {
        let mut session = self.clone();
        if let Some(speakers) = &session_override.speakers {
            session.speakers = speakers.clone();
        }
        if let Some(abstract_md) = &session_override.abstract_md {
            session.abstract_md = abstract_md.clone();
        }
        session
    }
}
