//! YouTube description value type and generator.

use super::{ELLIPSIS, char_len, truncate_chars};
use crate::error::ContentError;
use crate::schedule::Session;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

const HORIZONTAL_RULE: &str = "***";
const BLOCK_SEPARATOR: &str = "\n\n";
const ABSTRACT_PLACEHOLDER: &str = "X";

static AUTOLINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(https?://[^>]+)>").expect("autolink pattern is valid"));

/// A YouTube video description (at most 5000 characters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YouTubeDescription(String);

impl YouTubeDescription {
    pub const MAX_LENGTH: usize = 5000;

    pub fn new(value: impl Into<String>) -> Result<Self, ContentError> {
        let value = value.into();
        let length = char_len(&value);
        if length > Self::MAX_LENGTH {
            return Err(ContentError::DescriptionTooLong {
                length,
                max_length: Self::MAX_LENGTH,
            });
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for YouTubeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the description document under the 5000 character budget.
///
/// Layout, blocks separated by a blank line:
///
/// ```text
/// Speaker: <full names>
/// <abstract>
/// ***
/// <url>
/// <hashtags>
/// ***
/// <footer>
/// ```
///
/// Empty blocks are omitted. Only the abstract is ever shortened.
#[derive(Debug, Default, Clone, Copy)]
pub struct DescriptionGenerator;

impl DescriptionGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn build(
        &self,
        session: &Session,
        hashtags: &[String],
        footer: &str,
    ) -> Result<YouTubeDescription, ContentError> {
        let frame_length = Self::frame_length(session, hashtags, footer);
        let ellipsis_length = char_len(ELLIPSIS);

        let available = YouTubeDescription::MAX_LENGTH
            .checked_sub(frame_length)
            .filter(|available| *available >= ellipsis_length)
            .ok_or(ContentError::FrameOverflow { frame_length })?;

        let abstract_md = session.abstract_md();
        let abstract_md = if char_len(abstract_md) > available {
            format!(
                "{}{ELLIPSIS}",
                truncate_chars(abstract_md, available - ellipsis_length)
            )
        } else {
            abstract_md.to_string()
        };

        YouTubeDescription::new(render_description(session, &abstract_md, hashtags, footer))
    }

    /// Character cost of everything except the abstract body.
    ///
    /// Always rendered with a one-character placeholder in place of the
    /// abstract, so the separator around the abstract block counts even
    /// when the session has no abstract.
    pub fn frame_length(session: &Session, hashtags: &[String], footer: &str) -> usize {
        let rendered = render_description(session, ABSTRACT_PLACEHOLDER, hashtags, footer);
        char_len(&rendered) - char_len(ABSTRACT_PLACEHOLDER)
    }
}

/// Renders and sanitizes the description document for the given abstract.
pub fn render_description(
    session: &Session,
    abstract_md: &str,
    hashtags: &[String],
    footer: &str,
) -> String {
    let mut blocks: Vec<String> = Vec::with_capacity(7);

    let speakers = session.speakers_full();
    if !speakers.is_empty() {
        blocks.push(format!("Speaker: {speakers}"));
    }

    if !abstract_md.is_empty() {
        blocks.push(abstract_md.to_string());
    }

    blocks.push(HORIZONTAL_RULE.to_string());

    if !session.url().is_empty() {
        blocks.push(session.url().to_string());
    }

    if !hashtags.is_empty() {
        blocks.push(hashtags.join(" "));
    }

    blocks.push(HORIZONTAL_RULE.to_string());

    if !footer.is_empty() {
        blocks.push(footer.to_string());
    }

    sanitize_for_youtube(&blocks.join(BLOCK_SEPARATOR))
}

/// Removes characters YouTube rejects in descriptions.
///
/// `<https://...>` autolinks keep only the URL; any other `<` / `>` becomes
/// U+2039 / U+203A.
pub fn sanitize_for_youtube(text: &str) -> String {
    AUTOLINK
        .replace_all(text, "$1")
        .replace('<', "\u{2039}")
        .replace('>', "\u{203a}")
}
