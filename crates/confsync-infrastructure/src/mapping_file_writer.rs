//! Commented YAML mapping template.
//!
//! `serde_yaml` cannot emit comments, so the template is written by hand.
//! Every string key is emitted as a JSON string literal, which is also a
//! valid YAML double-quoted scalar.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Timelike};
use confsync_core::content::{TITLE_SPEAKER_SEPARATOR, combine};
use confsync_core::error::{ConfSyncError, Result};
use confsync_core::mapping::MappingTemplateWriter;
use confsync_core::schedule::{ConferenceSchedule, Session};
use std::collections::BTreeMap;
use std::fmt::Write;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display columns available for a session comment
/// (80 columns minus 8 of indentation and the `# ` marker).
pub const COMMENT_WIDTH: usize = 70;

const COMMENT_INDENT: &str = "        ";

const PLAYLIST_HELP: &[&str] = &[
    "Playlist ID (create the playlist in YouTube Studio first)",
    "Example: PLxxxxxxxxxxxxxxxx",
];

const HASHTAGS_HELP: &[&str] = &[
    "Hashtags appended to every description",
    "Example:",
    "  hashtags:",
    "    - '#RSGT2026'",
    "    - '#Agile'",
];

const FOOTER_HELP: &[&str] = &[
    "Footer (use a literal block `|` for multiple lines)",
    "Example:",
    "  footer: |",
    "    First line",
    "    Second line",
];

const SESSIONS_HELP: &[&str] = &[
    "Sessions",
    "Fill in video_id for each recorded session; empty rows are ignored.",
    "Title and description updates can be turned off per session (default: true):",
    "Example:",
    "  sessions:",
    "    \"2026-01-07\":",
    "      \"Hall A\":",
    "        \"10:00\":",
    "          video_id: \"abc123\"",
    "          update_title: false",
    "          update_description: false",
];

type TemplateTree<'a> = BTreeMap<NaiveDate, BTreeMap<&'a str, Vec<(NaiveTime, String)>>>;

#[derive(Debug, Default, Clone, Copy)]
pub struct YamlMappingTemplateWriter;

impl YamlMappingTemplateWriter {
    pub fn new() -> Self {
        Self
    }

    fn write_template(
        &self,
        out: &mut String,
        schedule: &ConferenceSchedule,
        generated_at: DateTime<FixedOffset>,
    ) -> std::fmt::Result {
        writeln!(out, "# ConfEngine Mapping Template")?;
        writeln!(out, "# Generated: {}", generated_at.to_rfc3339())?;
        writeln!(out, "conf_id: {}", quote(schedule.conf_id()))?;

        write_help(out, PLAYLIST_HELP)?;
        writeln!(out, "playlist_id: ''")?;
        write_help(out, HASHTAGS_HELP)?;
        writeln!(out, "hashtags: []")?;
        write_help(out, FOOTER_HELP)?;
        writeln!(out, "footer: ''")?;
        write_help(out, SESSIONS_HELP)?;

        let tree = group_sessions(schedule.sessions());
        if tree.is_empty() {
            return writeln!(out, "sessions: {{}}");
        }

        writeln!(out, "sessions:")?;
        for (date, rooms) in tree {
            writeln!(out, "  {}:", quote(&date.format("%Y-%m-%d").to_string()))?;
            for (room, times) in rooms {
                writeln!(out, "    {}:", quote(room))?;
                for (time, comment) in times {
                    writeln!(out, "      {}:", quote(&format_time(time)))?;
                    for line in wrap_comment(&comment, COMMENT_WIDTH) {
                        writeln!(out, "{COMMENT_INDENT}# {line}")?;
                    }
                    writeln!(out, "{COMMENT_INDENT}video_id: ''")?;
                }
            }
        }
        Ok(())
    }
}

impl MappingTemplateWriter for YamlMappingTemplateWriter {
    fn render(
        &self,
        schedule: &ConferenceSchedule,
        generated_at: DateTime<FixedOffset>,
    ) -> Result<String> {
        let mut out = String::new();
        self.write_template(&mut out, schedule, generated_at)
            .map_err(|e| ConfSyncError::internal(format!("Failed to render template: {e}")))?;
        Ok(out)
    }
}

fn group_sessions(sessions: &[Session]) -> TemplateTree<'_> {
    let mut tree = TemplateTree::new();
    for session in sessions {
        let timeslot = session.slot().timeslot;
        tree.entry(timeslot.date())
            .or_default()
            .entry(session.slot().room.as_str())
            .or_default()
            .push((timeslot.time(), session_comment(session)));
    }
    tree
}

/// "Title - Full Names", or just the title when nobody is named.
fn session_comment(session: &Session) -> String {
    combine(session.title(), &session.speakers_full())
}

fn format_time(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("'{}'", value.replace('\'', "''")))
}

fn write_help(out: &mut String, lines: &[&str]) -> std::fmt::Result {
    for line in lines {
        writeln!(out, "# {line}")?;
    }
    Ok(())
}

/// Greedy line wrapping by display width.
///
/// Breaks at Unicode word boundaries, around the title/speaker separator
/// and between wide (CJK, emoji) segments. A single chunk wider than
/// `width` gets its own line.
pub fn wrap_comment(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for chunk in split_into_chunks(text) {
        let chunk_width = display_width(&chunk);
        if current_width + chunk_width > width {
            let line = current.trim_end();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
            current = chunk.trim_start().to_string();
            current_width = display_width(&current);
        } else {
            current.push_str(&chunk);
            current_width += chunk_width;
        }
    }

    let line = current.trim();
    if !line.is_empty() {
        lines.push(line.to_string());
    }
    lines
}

/// Splits into unbreakable chunks.
///
/// Adjacent narrow word segments stay together so punctuation is not
/// separated from its word; wide segments are breakable on both sides.
fn split_into_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    for (i, part) in text.split(TITLE_SPEAKER_SEPARATOR).enumerate() {
        if i > 0 {
            chunks.push(TITLE_SPEAKER_SEPARATOR.to_string());
        }

        let mut word = String::new();
        for segment in part.split_word_bounds() {
            let is_space = segment.chars().all(char::is_whitespace);
            if is_space || is_wide(segment) {
                if !word.is_empty() {
                    chunks.push(std::mem::take(&mut word));
                }
                chunks.push(if is_space { " ".to_string() } else { segment.to_string() });
            } else {
                word.push_str(segment);
            }
        }
        if !word.is_empty() {
            chunks.push(word);
        }
    }
    chunks
}

/// Terminal columns occupied by `text`.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn is_wide(segment: &str) -> bool {
    segment
        .chars()
        .next()
        .and_then(UnicodeWidthChar::width)
        .is_some_and(|w| w > 1)
}
