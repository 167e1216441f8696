//! YouTube content generation.
//!
//! Turns a [`Session`](crate::schedule::Session) plus formatting
//! configuration into a title and a description that always fit the
//! platform's character limits. Lengths are counted in Unicode scalar
//! values, not bytes.

mod description;
mod title;

pub use description::{DescriptionGenerator, YouTubeDescription, render_description, sanitize_for_youtube};
pub use title::{TitleGenerator, YouTubeTitle, combine};

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Separator between the session title and the speaker names.
pub const TITLE_SPEAKER_SEPARATOR: &str = " - ";

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Shortens `text` to `max_length` characters, ending in [`ELLIPSIS`] when cut.
pub(crate) fn truncate_with_ellipsis(text: &str, max_length: usize) -> String {
    if char_len(text) <= max_length {
        return text.to_string();
    }

    let keep = max_length.saturating_sub(char_len(ELLIPSIS));
    format!("{}{ELLIPSIS}", truncate_chars(text, keep))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_with_ellipsis("this is too long", 10), "this is...");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_with_ellipsis("日本語のタイトルです", 6), "日本語...");
    }
}
