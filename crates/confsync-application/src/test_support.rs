//! In-memory collaborators shared by the use case tests.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use confsync_core::error::{ConfigError, RemoteError, Result};
use confsync_core::mapping::{MappingConfig, MappingSource, MappingTemplateWriter};
use confsync_core::schedule::{ConferenceSchedule, ScheduleSlot, ScheduleSource, Session, Speaker};
use confsync_core::youtube::{
    PlaylistItem, PlaylistService, PlaylistSnapshot, VideoInfo, VideoService, VideoUpdateRequest,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

pub fn slot(hour: u32, room: &str) -> ScheduleSlot {
    let timeslot = NaiveDate::from_ymd_opt(2026, 1, 7)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap();
    ScheduleSlot::new(timeslot, room)
}

pub fn session(hour: u32, room: &str, title: &str, abstract_md: &str) -> Session {
    Session::new(
        slot(hour, room),
        title,
        "",
        vec![Speaker::new("John", "Doe")],
        abstract_md,
        "https://example.com/s",
    )
    .unwrap()
}

// Mock ScheduleSource for testing
pub struct MockScheduleSource {
    schedule: ConferenceSchedule,
}

impl MockScheduleSource {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self {
            schedule: ConferenceSchedule::new("conf", "Asia/Tokyo", sessions).unwrap(),
        }
    }
}

#[async_trait]
impl ScheduleSource for MockScheduleSource {
    async fn fetch(&self, _conf_id: &str) -> Result<ConferenceSchedule> {
        Ok(self.schedule.clone())
    }
}

// Mock MappingSource for testing
pub struct MockMappingSource {
    config: MappingConfig,
}

impl MockMappingSource {
    pub fn new(config: MappingConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MappingSource for MockMappingSource {
    async fn load(&self, path: &Path) -> Result<MappingConfig> {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::MappingFile {
                path: String::new(),
                message: "not found".to_string(),
            }
            .into());
        }
        Ok(self.config.clone())
    }
}

pub struct MockTemplateWriter;

impl MappingTemplateWriter for MockTemplateWriter {
    fn render(
        &self,
        schedule: &ConferenceSchedule,
        generated_at: DateTime<FixedOffset>,
    ) -> Result<String> {
        Ok(format!(
            "# {}\nconf_id: {}\nsessions: {}\n",
            generated_at.to_rfc3339(),
            schedule.conf_id(),
            schedule.sessions().len()
        ))
    }
}

// Mock VideoService for testing
#[derive(Default)]
pub struct MockVideoService {
    videos: Mutex<HashMap<String, VideoInfo>>,
    updates: Mutex<Vec<VideoUpdateRequest>>,
    failing_updates: Mutex<Vec<String>>,
}

impl MockVideoService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(self, video_id: &str, title: &str, description: &str) -> Self {
        self.videos.lock().unwrap().insert(
            video_id.to_string(),
            VideoInfo {
                video_id: video_id.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                category_id: 28,
            },
        );
        self
    }

    pub fn fail_update_for(self, video_id: &str) -> Self {
        self.failing_updates.lock().unwrap().push(video_id.to_string());
        self
    }

    pub fn updates(&self) -> Vec<VideoUpdateRequest> {
        self.updates.lock().unwrap().clone()
    }

    pub fn video(&self, video_id: &str) -> Option<VideoInfo> {
        self.videos.lock().unwrap().get(video_id).cloned()
    }
}

#[async_trait]
impl VideoService for MockVideoService {
    async fn get_info(&self, video_id: &str) -> std::result::Result<VideoInfo, RemoteError> {
        self.videos
            .lock()
            .unwrap()
            .get(video_id)
            .cloned()
            .ok_or_else(|| RemoteError::video_not_found(video_id))
    }

    async fn update(&self, request: &VideoUpdateRequest) -> std::result::Result<(), RemoteError> {
        if self.failing_updates.lock().unwrap().contains(&request.video_id) {
            return Err(RemoteError::Forbidden);
        }

        self.updates.lock().unwrap().push(request.clone());
        if let Some(video) = self.videos.lock().unwrap().get_mut(&request.video_id) {
            video.title = request.title.clone();
            video.description = request.description.clone();
        }
        Ok(())
    }
}

/// Playlist fake that shifts neighbouring positions on insert and move the
/// way the real platform does.
#[derive(Default)]
pub struct FakePlaylist {
    // (item_id, video_id) in playlist order.
    entries: Mutex<Vec<(String, String)>>,
    next_item: Mutex<u32>,
    list_calls: Mutex<usize>,
    mutations: Mutex<Vec<String>>,
    fail_mutations: bool,
}

impl FakePlaylist {
    pub fn with_order(video_ids: &[&str]) -> Self {
        let playlist = Self::default();
        {
            let mut entries = playlist.entries.lock().unwrap();
            for video_id in video_ids {
                entries.push((format!("item-{video_id}"), video_id.to_string()));
            }
        }
        playlist
    }

    pub fn failing(video_ids: &[&str]) -> Self {
        Self {
            fail_mutations: true,
            ..Self::with_order(video_ids)
        }
    }

    pub fn order(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, video_id)| video_id.clone())
            .collect()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    pub fn mutations(&self) -> Vec<String> {
        self.mutations.lock().unwrap().clone()
    }

    pub fn snapshot(&self) -> PlaylistSnapshot {
        let entries = self.entries.lock().unwrap();
        PlaylistSnapshot::from_items(entries.iter().enumerate().map(
            |(position, (item_id, video_id))| PlaylistItem {
                item_id: item_id.clone(),
                video_id: video_id.clone(),
                position: position as u32,
            },
        ))
    }

    fn check_failure(&self) -> std::result::Result<(), RemoteError> {
        if self.fail_mutations {
            return Err(RemoteError::Http {
                status: 500,
                message: "backend error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PlaylistService for FakePlaylist {
    async fn list_items(
        &self,
        _playlist_id: &str,
    ) -> std::result::Result<PlaylistSnapshot, RemoteError> {
        *self.list_calls.lock().unwrap() += 1;
        Ok(self.snapshot())
    }

    async fn add_item(
        &self,
        _playlist_id: &str,
        video_id: &str,
        position: u32,
    ) -> std::result::Result<(), RemoteError> {
        self.check_failure()?;

        let item_id = {
            let mut next = self.next_item.lock().unwrap();
            *next += 1;
            format!("new-{}", *next)
        };
        let mut entries = self.entries.lock().unwrap();
        let index = (position as usize).min(entries.len());
        entries.insert(index, (item_id, video_id.to_string()));
        self.mutations
            .lock()
            .unwrap()
            .push(format!("add {video_id}@{position}"));
        Ok(())
    }

    async fn move_item(
        &self,
        item_id: &str,
        _playlist_id: &str,
        video_id: &str,
        position: u32,
    ) -> std::result::Result<(), RemoteError> {
        self.check_failure()?;

        let mut entries = self.entries.lock().unwrap();
        let current = entries
            .iter()
            .position(|(id, _)| id == item_id)
            .ok_or_else(|| RemoteError::NotFound {
                resource: "Playlist item",
                id: item_id.to_string(),
            })?;
        let entry = entries.remove(current);
        let index = (position as usize).min(entries.len());
        entries.insert(index, entry);
        self.mutations
            .lock()
            .unwrap()
            .push(format!("move {video_id}@{position}"));
        Ok(())
    }
}
