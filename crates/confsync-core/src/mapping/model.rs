use crate::error::ConfigError;
use crate::schedule::{ScheduleSlot, Speaker};
use std::collections::HashSet;

/// Per-slot replacement of schedule data. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOverride {
    pub speakers: Option<Vec<Speaker>>,
    pub abstract_md: Option<String>,
}

impl SessionOverride {
    pub fn is_empty(&self) -> bool {
        self.speakers.is_none() && self.abstract_md.is_none()
    }
}

/// Associates a schedule slot with a YouTube video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMapping {
    pub slot: ScheduleSlot,
    pub video_id: String,
    pub session_override: Option<SessionOverride>,
    pub update_title: bool,
    pub update_description: bool,
}

impl VideoMapping {
    pub fn new(slot: ScheduleSlot, video_id: impl Into<String>) -> Self {
        Self {
            slot,
            video_id: video_id.into(),
            session_override: None,
            update_title: true,
            update_description: true,
        }
    }

    pub fn with_override(mut self, session_override: SessionOverride) -> Self {
        self.session_override = (!session_override.is_empty()).then_some(session_override);
        self
    }

    pub fn with_update_flags(mut self, update_title: bool, update_description: bool) -> Self {
        self.update_title = update_title;
        self.update_description = update_description;
        self
    }
}

/// Everything the mapping file says about one conference.
///
/// Built once per run; read-only afterwards.
#[derive(Debug, Clone)]
pub struct MappingConfig {
    conf_id: String,
    playlist_id: String,
    mappings: Vec<VideoMapping>,
    hashtags: Vec<String>,
    footer: String,
}

impl MappingConfig {
    /// Fails when two mappings share a slot, since the video to update
    /// would be ambiguous.
    pub fn new(
        conf_id: impl Into<String>,
        playlist_id: impl Into<String>,
        mut mappings: Vec<VideoMapping>,
        hashtags: Vec<String>,
        footer: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        {
            let mut seen: HashSet<&ScheduleSlot> = HashSet::with_capacity(mappings.len());
            for mapping in &mappings {
                if !seen.insert(&mapping.slot) {
                    return Err(ConfigError::DuplicateMapping(mapping.slot.to_string()));
                }
            }
        }

        mappings.sort_by(|a, b| a.slot.cmp(&b.slot));

        Ok(Self {
            conf_id: conf_id.into(),
            playlist_id: playlist_id.into(),
            mappings,
            hashtags,
            footer: footer.into(),
        })
    }

    pub fn conf_id(&self) -> &str {
        &self.conf_id
    }

    pub fn playlist_id(&self) -> &str {
        &self.playlist_id
    }

    pub fn mappings(&self) -> &[VideoMapping] {
        &self.mappings
    }

    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }

    pub fn footer(&self) -> &str {
        &self.footer
    }

    /// Exact match on `(timeslot, room)`.
    // Linear scan: a conference has at most a few hundred sessions.
    pub fn find_mapping(&self, slot: &ScheduleSlot) -> Option<&VideoMapping> {
        self.mappings.iter().find(|m| &m.slot == slot)
    }

    /// Mappings whose slot was never matched during a run, in slot order.
    pub fn find_unused(&self, used_slots: &HashSet<ScheduleSlot>) -> Vec<&VideoMapping> {
        self.mappings
            .iter()
            .filter(|m| !used_slots.contains(&m.slot))
            .collect()
    }
}
