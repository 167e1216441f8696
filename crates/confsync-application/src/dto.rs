//! Result types returned by the use cases.

use confsync_core::playlist::{PlaylistCounts, PlaylistOperation};
use confsync_core::schedule::ScheduleSlot;

/// Outcome of the content phase for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Updated,
    Unchanged,
    SkippedNoContent,
    SkippedNoMapping,
    Error(String),
}

impl SessionStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Before/after view of a video's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePreview {
    pub session_key: String,
    pub video_id: String,
    pub current_title: String,
    pub current_description: String,
    pub new_title: String,
    pub new_description: String,
}

impl UpdatePreview {
    pub fn title_changed(&self) -> bool {
        self.current_title != self.new_title
    }

    pub fn description_changed(&self) -> bool {
        self.current_description != self.new_description
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub slot: ScheduleSlot,
    pub title: String,
    /// `None` when the session had no mapping.
    pub video_id: Option<String>,
    pub status: SessionStatus,
    /// Present whenever new content was generated.
    pub preview: Option<UpdatePreview>,
}

impl SessionReport {
    pub fn session_key(&self) -> String {
        self.slot.to_string()
    }
}

/// A mapping whose slot matched no session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedMapping {
    pub slot: ScheduleSlot,
    pub video_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSyncResult {
    pub is_dry_run: bool,
    pub playlist_id: String,
    pub operations: Vec<PlaylistOperation>,
    pub counts: PlaylistCounts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistPhase {
    Synced(PlaylistSyncResult),
    /// Not attempted; carries the reason.
    Skipped(String),
    /// Aborted by a remote failure. Content results are still valid.
    Failed(String),
}

impl PlaylistPhase {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Tallies of [`SessionStatus`] over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub updated: usize,
    pub unchanged: usize,
    pub skipped_no_content: usize,
    pub skipped_no_mapping: usize,
    pub errors: usize,
    pub unused_mappings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub conf_id: String,
    pub is_dry_run: bool,
    pub sessions: Vec<SessionReport>,
    pub unused_mappings: Vec<UnusedMapping>,
    pub playlist: PlaylistPhase,
}

impl RunResult {
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            unused_mappings: self.unused_mappings.len(),
            ..RunSummary::default()
        };

        for report in &self.sessions {
            match report.status {
                SessionStatus::Updated => summary.updated += 1,
                SessionStatus::Unchanged => summary.unchanged += 1,
                SessionStatus::SkippedNoContent => summary.skipped_no_content += 1,
                SessionStatus::SkippedNoMapping => summary.skipped_no_mapping += 1,
                SessionStatus::Error(_) => summary.errors += 1,
            }
        }

        summary
    }

    /// True when any session errored or the playlist phase failed.
    pub fn has_errors(&self) -> bool {
        self.sessions.iter().any(|r| r.status.is_error()) || self.playlist.is_failed()
    }

    pub fn previews(&self) -> impl Iterator<Item = &UpdatePreview> {
        self.sessions.iter().filter_map(|r| r.preview.as_ref())
    }
}
