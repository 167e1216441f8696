//! YouTube title value type and generator.

use super::{ELLIPSIS, TITLE_SPEAKER_SEPARATOR, char_len, truncate_chars, truncate_with_ellipsis};
use crate::error::ContentError;
use crate::schedule::Session;
use std::fmt;

/// A YouTube video title (at most 100 characters, never empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YouTubeTitle(String);

impl YouTubeTitle {
    pub const MAX_LENGTH: usize = 100;

    pub fn new(value: impl Into<String>) -> Result<Self, ContentError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ContentError::TitleEmpty);
        }

        let length = char_len(&value);
        if length > Self::MAX_LENGTH {
            return Err(ContentError::TitleTooLong {
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

impl fmt::Display for YouTubeTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type SpeakerTier = fn(&Session) -> String;

/// Full names, then initials, then last names only.
const SPEAKER_TIERS: [SpeakerTier; 3] = [
    Session::speakers_full,
    Session::speakers_initials,
    Session::speakers_last_names,
];

/// Builds `"<title> - <speakers>"` under the 100 character budget.
///
/// Speaker text is tried in decreasing verbosity; the first tier that fits
/// wins and later tiers are never computed. When nothing fits, the session
/// title is shortened and the last names are kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct TitleGenerator;

impl TitleGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, session: &Session) -> Result<YouTubeTitle, ContentError> {
        let max_length = YouTubeTitle::MAX_LENGTH;

        if session.speakers().is_empty() {
            return YouTubeTitle::new(truncate_with_ellipsis(session.title(), max_length));
        }

        for tier in SPEAKER_TIERS {
            let speaker_part = tier(session);
            if speaker_part.is_empty() {
                return YouTubeTitle::new(truncate_with_ellipsis(session.title(), max_length));
            }

            let candidate = combine(session.title(), &speaker_part);
            if char_len(&candidate) <= max_length {
                return YouTubeTitle::new(candidate);
            }
        }

        YouTubeTitle::new(truncate_title_keeping_speaker(
            session.title(),
            &session.speakers_last_names(),
        ))
    }
}

/// `"<title> - <speaker_part>"`, or just the title when there are no speakers.
pub fn combine(title: &str, speaker_part: &str) -> String {
    if speaker_part.is_empty() {
        return title.to_string();
    }

    format!("{title}{TITLE_SPEAKER_SEPARATOR}{speaker_part}")
}

fn truncate_title_keeping_speaker(title: &str, speaker_part: &str) -> String {
    let max_length = YouTubeTitle::MAX_LENGTH;
    let reserved =
        char_len(TITLE_SPEAKER_SEPARATOR) + char_len(speaker_part) + char_len(ELLIPSIS);

    if reserved >= max_length {
        return truncate_with_ellipsis(speaker_part, max_length);
    }

    let available = max_length - reserved;
    format!(
        "{}{ELLIPSIS}{TITLE_SPEAKER_SEPARATOR}{speaker_part}",
        truncate_chars(title, available)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{ScheduleSlot, Speaker};
    use chrono::NaiveDate;

    fn session(title: &str, speakers: Vec<Speaker>) -> Session {
        let timeslot = NaiveDate::from_ymd_opt(2026, 1, 7)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Session::new(
            ScheduleSlot::new(timeslot, "Hall A"),
            title,
            "",
            speakers,
            "abstract",
            "",
        )
        .unwrap()
    }

    fn build(title: &str, speakers: Vec<Speaker>) -> String {
        TitleGenerator::new()
            .build(&session(title, speakers))
            .unwrap()
            .into_string()
    }

    #[test]
    fn test_full_name_tier() {
        assert_eq!(
            build("Intro to X", vec![Speaker::new("John", "Doe")]),
            "Intro to X - John Doe"
        );
    }

    #[test]
    fn test_falls_back_to_initials() {
        let title = "X".repeat(90);
        let result = build(&title, vec![Speaker::new("John", "Doe")]);

        assert_eq!(result, format!("{title} - J. Doe"));
        assert_eq!(result.chars().count(), 99);
    }

    #[test]
    fn test_falls_back_to_last_names() {
        // full: 88 + 3 + 16 = 107, initials: 88 + 3 + 12 = 103, last: 88 + 3 + 3 = 94
        let title = "T".repeat(88);
        let result = build(&title, vec![Speaker::new("Mary Ann Lou", "Doe")]);
        assert_eq!(result, format!("{title} - Doe"));
    }

    #[test]
    fn test_full_name_fits_exactly() {
        let title = "T".repeat(89);
        let result = build(&title, vec![Speaker::new("John", "Doe")]);
        assert_eq!(result.chars().count(), 100);
        assert!(result.ends_with(" - John Doe"));
    }

    #[test]
    fn test_truncates_title_keeping_last_names() {
        let title = "T".repeat(120);
        let result = build(&title, vec![Speaker::new("John", "Doe")]);

        assert_eq!(result, format!("{}... - Doe", "T".repeat(91)));
        assert_eq!(result.chars().count(), 100);
    }

    #[test]
    fn test_no_speakers_truncates_title() {
        let title = "T".repeat(120);
        let result = build(&title, vec![]);

        assert_eq!(result, format!("{}...", "T".repeat(97)));
    }

    #[test]
    fn test_no_speakers_short_title_untouched() {
        assert_eq!(build("Keynote", vec![]), "Keynote");
    }

    #[test]
    fn test_nameless_speakers_give_plain_title() {
        assert_eq!(build("Keynote", vec![Speaker::new("", "")]), "Keynote");
    }

    #[test]
    fn test_first_name_only_speaker_abandons_tiers_when_too_long() {
        // Full and initials tiers are too long, last-name tier is empty.
        let title = "T".repeat(99);
        let result = build(&title, vec![Speaker::new("John", "")]);
        assert_eq!(result, title);
    }

    #[test]
    fn test_last_names_alone_exceed_budget() {
        let speakers: Vec<Speaker> = (0..12)
            .map(|i| Speaker::new("", format!("Lastname{i:02}")))
            .collect();
        let result = build("Panel", speakers);

        assert_eq!(result.chars().count(), 100);
        assert!(result.starts_with("Lastname00, Lastname01"));
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_multibyte_titles_count_characters() {
        let title = "あ".repeat(95);
        let result = build(&title, vec![Speaker::new("", "田中")]);
        assert_eq!(result, format!("{title} - 田中"));
        assert_eq!(result.chars().count(), 100);
    }

    #[test]
    fn test_never_exceeds_max_length() {
        for title_len in [1, 50, 90, 96, 97, 98, 100, 101, 200] {
            for speakers in [
                vec![],
                vec![Speaker::new("John", "Doe")],
                vec![Speaker::new("Mary Ann", "Smith-Jones"), Speaker::new("Li", "Wei")],
                vec![Speaker::new("", "L".repeat(120))],
            ] {
                let title = "T".repeat(title_len);
                let result = build(&title, speakers);
                assert!(result.chars().count() <= YouTubeTitle::MAX_LENGTH);
            }
        }
    }

    #[test]
    fn test_smart_constructor() {
        assert_eq!(YouTubeTitle::new(""), Err(ContentError::TitleEmpty));
        assert_eq!(
            YouTubeTitle::new("a".repeat(101)),
            Err(ContentError::TitleTooLong {
                length: 101,
                max_length: 100
            })
        );
        assert!(YouTubeTitle::new("a".repeat(100)).is_ok());
    }
}
