//! YAML mapping file reader.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use confsync_core::error::{ConfigError, Result};
use confsync_core::mapping::{MappingConfig, MappingSource, SessionOverride, VideoMapping};
use confsync_core::schedule::{ScheduleSlot, Speaker};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MappingFileDto {
    conf_id: Option<String>,
    #[serde(default)]
    playlist_id: Option<String>,
    #[serde(default)]
    hashtags: Option<Vec<String>>,
    #[serde(default)]
    footer: Option<String>,
    /// date -> room -> time -> entry
    #[serde(default)]
    sessions: Option<BTreeMap<String, BTreeMap<String, BTreeMap<String, SessionEntryDto>>>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionEntryDto {
    #[serde(default)]
    video_id: Option<String>,
    #[serde(default)]
    update_title: Option<bool>,
    #[serde(default)]
    update_description: Option<bool>,
    #[serde(default)]
    speakers: Option<Vec<Speaker>>,
    #[serde(default, rename = "abstract")]
    abstract_md: Option<String>,
}

/// Reads mapping files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlMappingReader;

impl YamlMappingReader {
    pub fn new() -> Self {
        Self
    }

    /// Parses mapping file content. `path` is only used in error messages.
    pub fn parse(&self, content: &str, path: &Path) -> Result<MappingConfig> {
        let file_error = |message: String| ConfigError::MappingFile {
            path: path.display().to_string(),
            message,
        };

        let dto: MappingFileDto = serde_yaml::from_str(content)
            .map_err(|e| file_error(format!("invalid YAML: {e}")))?;

        let conf_id = dto
            .conf_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| file_error("conf_id is required".to_string()))?;

        let mut mappings = Vec::new();
        for (date_key, rooms) in dto.sessions.unwrap_or_default() {
            let date = NaiveDate::parse_from_str(date_key.trim(), "%Y-%m-%d")
                .map_err(|e| file_error(format!("invalid date '{date_key}': {e}")))?;

            for (room, times) in rooms {
                for (time_key, entry) in times {
                    let time = parse_time(&time_key)
                        .ok_or_else(|| file_error(format!("invalid time '{time_key}' in {date_key} {room}")))?;

                    let Some(video_id) = entry
                        .video_id
                        .as_deref()
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                    else {
                        continue;
                    };

                    let slot = ScheduleSlot::new(date.and_time(time), room.clone());
                    let mapping = VideoMapping::new(slot, video_id)
                        .with_override(SessionOverride {
                            speakers: entry.speakers,
                            abstract_md: entry.abstract_md,
                        })
                        .with_update_flags(
                            entry.update_title.unwrap_or(true),
                            entry.update_description.unwrap_or(true),
                        );
                    mappings.push(mapping);
                }
            }
        }

        let config = MappingConfig::new(
            conf_id,
            dto.playlist_id.unwrap_or_default().trim(),
            mappings,
            dto.hashtags.unwrap_or_default(),
            dto.footer.unwrap_or_default(),
        )?;

        tracing::debug!(
            "[MappingReader] {} mappings loaded from {}",
            config.mappings().len(),
            path.display()
        );
        Ok(config)
    }
}

#[async_trait]
impl MappingSource for YamlMappingReader {
    async fn load(&self, path: &Path) -> Result<MappingConfig> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::MappingFile {
                path: path.display().to_string(),
                message: format!("cannot read file: {e}"),
            })?;

        self.parse(&content, path)
    }
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}
