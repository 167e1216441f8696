use std::collections::HashMap;

/// Current metadata of an uploaded video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub video_id: String,
    pub title: String,
    pub description: String,
    /// Must be sent back unchanged on update; the API rejects snippets
    /// without it.
    pub category_id: u32,
}

/// Snippet fields written back to a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUpdateRequest {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub category_id: u32,
}

/// One entry of a playlist as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistItem {
    /// Playlist item id, distinct from the video id.
    pub item_id: String,
    pub video_id: String,
    pub position: u32,
}

/// Remote playlist state keyed by video id.
///
/// Positions are only valid until the next successful mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistSnapshot {
    items: HashMap<String, PlaylistItem>,
}

impl PlaylistSnapshot {
    /// Builds a snapshot from listed items.
    ///
    /// If a video appears more than once in the playlist the first listed
    /// entry wins.
    pub fn from_items(items: impl IntoIterator<Item = PlaylistItem>) -> Self {
        let mut map = HashMap::new();
        for item in items {
            map.entry(item.video_id.clone()).or_insert(item);
        }
        Self { items: map }
    }

    pub fn get(&self, video_id: &str) -> Option<&PlaylistItem> {
        self.items.get(video_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items sorted by current position.
    pub fn items_by_position(&self) -> Vec<&PlaylistItem> {
        let mut items: Vec<_> = self.items.values().collect();
        items.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.video_id.cmp(&b.video_id))
        });
        items
    }
}
