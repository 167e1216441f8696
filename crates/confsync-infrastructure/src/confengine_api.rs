//! ConfEngine schedule client.
//!
//! Fetches `GET {base_url}/conferences/{conf_id}/schedule` and turns the
//! nested day/slot structure into a [`ConferenceSchedule`].

use crate::http_client::transport_error;
use crate::markdown_converter::MarkdownConverter;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use confsync_core::error::{ConfSyncError, RemoteError, Result};
use confsync_core::schedule::{ConferenceSchedule, ScheduleSlot, ScheduleSource, Session, Speaker};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    conf_timezone: String,
    #[serde(default)]
    conf_schedule: Vec<DayData>,
}

#[derive(Debug, Deserialize)]
struct DayData {
    #[serde(default)]
    schedule_days: Vec<ScheduleDay>,
}

#[derive(Debug, Deserialize)]
struct ScheduleDay {
    /// Each entry maps a slot start key to the sessions running in parallel.
    #[serde(default)]
    sessions: Vec<HashMap<String, Vec<ApiSession>>>,
}

#[derive(Debug, Deserialize)]
struct ApiSession {
    timeslot: String,
    title: String,
    room: String,
    #[serde(default)]
    track: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "abstract")]
    abstract_html: Option<String>,
    #[serde(default)]
    speakers: Vec<ApiSpeaker>,
}

#[derive(Debug, Deserialize)]
struct ApiSpeaker {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

pub struct ConfEngineApi {
    client: Client,
    base_url: String,
    converter: MarkdownConverter,
}

impl ConfEngineApi {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            converter: MarkdownConverter::new(),
        }
    }

    fn schedule_url(&self, conf_id: &str) -> String {
        format!("{}/conferences/{}/schedule", self.base_url, conf_id)
    }

    /// Converts a raw schedule response body.
    pub fn parse_schedule(&self, conf_id: &str, body: &str) -> Result<ConferenceSchedule> {
        let response: ScheduleResponse = serde_json::from_str(body).map_err(|e| {
            ConfSyncError::from(RemoteError::InvalidResponse(format!(
                "ConfEngine schedule for {conf_id}: {e}"
            )))
        })?;

        let mut sessions = Vec::new();
        for day in response.conf_schedule {
            for schedule_day in day.schedule_days {
                for slot_sessions in schedule_day.sessions {
                    for api_session in slot_sessions.into_values().flatten() {
                        sessions.push(self.convert_session(api_session)?);
                    }
                }
            }
        }

        let schedule = ConferenceSchedule::new(conf_id, response.conf_timezone, sessions)?;
        Ok(schedule)
    }

    fn convert_session(&self, api_session: ApiSession) -> Result<Session> {
        let timeslot = parse_timeslot(&api_session.timeslot).ok_or_else(|| {
            ConfSyncError::from(RemoteError::InvalidResponse(format!(
                "Unrecognized timeslot '{}' for session '{}'",
                api_session.timeslot, api_session.title
            )))
        })?;

        let speakers = api_session
            .speakers
            .into_iter()
            .map(|s| Speaker::new(s.first_name.trim(), s.last_name.trim()))
            .collect();

        let abstract_md = self
            .converter
            .convert(api_session.abstract_html.as_deref().unwrap_or_default())?;

        let session = Session::new(
            ScheduleSlot::new(timeslot, api_session.room),
            api_session.title,
            api_session.track.unwrap_or_default(),
            speakers,
            abstract_md,
            api_session.url.unwrap_or_default(),
        )?;
        Ok(session)
    }
}

#[async_trait]
impl ScheduleSource for ConfEngineApi {
    async fn fetch(&self, conf_id: &str) -> Result<ConferenceSchedule> {
        let url = self.schedule_url(conf_id);
        tracing::debug!("[ConfEngine] GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error("ConfEngine request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = if status == reqwest::StatusCode::NOT_FOUND {
                RemoteError::NotFound {
                    resource: "Conference",
                    id: conf_id.to_string(),
                }
            } else {
                RemoteError::Http {
                    status: status.as_u16(),
                    message: body,
                }
            };
            return Err(error.into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error("Failed to read ConfEngine response", e))?;

        let schedule = self.parse_schedule(conf_id, &body)?;
        tracing::info!(
            "[ConfEngine] Fetched {} sessions for {}",
            schedule.sessions().len(),
            conf_id
        );
        Ok(schedule)
    }
}

/// Parses a slot start time as conference-local wall-clock time.
///
/// RFC 3339 values keep their local time; the offset is dropped.
fn parse_timeslot(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
}
