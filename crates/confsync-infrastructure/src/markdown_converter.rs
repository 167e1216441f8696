//! HTML to Markdown conversion for session abstracts.
//!
//! The heavy lifting is done by `htmd`, which walks a real DOM so nested
//! and ordered lists survive. Output is normalized afterwards: trailing
//! spaces (hard breaks) are dropped, the text is trimmed and runs of blank
//! lines collapse to one.

use confsync_core::error::{RemoteError, Result};
use htmd::HtmlToMarkdown;
use htmd::options::{BulletListMarker, HeadingStyle, Options};
use regex::Regex;
use std::sync::LazyLock;

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline pattern"));

/// Converts ConfEngine abstract HTML to Markdown.
pub struct MarkdownConverter {
    inner: HtmlToMarkdown,
}

impl std::fmt::Debug for MarkdownConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownConverter").finish_non_exhaustive()
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownConverter {
    pub fn new() -> Self {
        let inner = HtmlToMarkdown::builder()
            .skip_tags(vec!["script", "style"])
            .options(Options {
                heading_style: HeadingStyle::Atx,
                bullet_list_marker: BulletListMarker::Dash,
                ..Default::default()
            })
            .build();
        Self { inner }
    }

    pub fn convert(&self, html: &str) -> Result<String> {
        if html.trim().is_empty() {
            return Ok(String::new());
        }

        let markdown = self.inner.convert(html).map_err(|e| {
            RemoteError::InvalidResponse(format!("Cannot convert abstract HTML: {e}"))
        })?;
        Ok(normalize(&markdown))
    }
}

fn normalize(markdown: &str) -> String {
    let text = markdown
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    EXCESS_NEWLINES
        .replace_all(text.trim(), "\n\n")
        .into_owned()
}
