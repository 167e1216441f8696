use crate::schedule::ScheduleSlot;
use std::fmt;

/// What the reconciler decided for one playlist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Video is not in the playlist yet.
    Add,
    /// Video is in the playlist at the wrong position.
    Reorder,
    /// Already at the target position.
    Unchanged,
    /// Playlist entry with no mapped session, pushed behind the mapped ones.
    MoveToEnd,
}

impl OperationKind {
    pub fn is_mutation(self) -> bool {
        !matches!(self, Self::Unchanged)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Reorder => "REORDER",
            Self::Unchanged => "UNCHANGED",
            Self::MoveToEnd => "MOVE_TO_END",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A video in its desired playlist position, with display info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredVideo {
    pub video_id: String,
    pub title: String,
    pub slot: ScheduleSlot,
}

impl DesiredVideo {
    pub fn new(video_id: impl Into<String>, title: impl Into<String>, slot: ScheduleSlot) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            slot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistOperation {
    pub kind: OperationKind,
    pub video_id: String,
    /// Display title; unmapped entries use `(unmapped: <video_id>)`.
    pub title: String,
    pub target_position: u32,
    /// `None` for unmapped entries.
    pub slot: Option<ScheduleSlot>,
}

impl PlaylistOperation {
    pub fn for_desired(kind: OperationKind, video: &DesiredVideo, target_position: u32) -> Self {
        Self {
            kind,
            video_id: video.video_id.clone(),
            title: video.title.clone(),
            target_position,
            slot: Some(video.slot.clone()),
        }
    }

    pub fn for_unmapped(kind: OperationKind, video_id: &str, target_position: u32) -> Self {
        Self {
            kind,
            video_id: video_id.to_string(),
            title: format!("(unmapped: {video_id})"),
            target_position,
            slot: None,
        }
    }
}

/// Per-kind operation totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaylistCounts {
    pub added: usize,
    pub reordered: usize,
    pub moved_to_end: usize,
    pub unchanged: usize,
}

impl PlaylistCounts {
    pub fn from_operations(operations: &[PlaylistOperation]) -> Self {
        let mut counts = Self::default();
        for op in operations {
            counts.record(op.kind);
        }
        counts
    }

    pub fn record(&mut self, kind: OperationKind) {
        match kind {
            OperationKind::Add => self.added += 1,
            OperationKind::Reorder => self.reordered += 1,
            OperationKind::MoveToEnd => self.moved_to_end += 1,
            OperationKind::Unchanged => self.unchanged += 1,
        }
    }

    pub fn mutations(&self) -> usize {
        self.added + self.reordered + self.moved_to_end
    }

    pub fn total(&self) -> usize {
        self.mutations() + self.unchanged
    }
}
