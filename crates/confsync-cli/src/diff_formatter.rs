//! Terminal rendering of run results.
//!
//! Everything is rendered into a `String` so callers decide where it goes.

use colored::Colorize;
use confsync_application::dto::{PlaylistPhase, RunResult, SessionStatus, UpdatePreview};
use confsync_core::playlist::OperationKind;
use similar::TextDiff;
use std::fmt::Write;

/// Unchanged descriptions are previewed up to this many characters.
pub const PREVIEW_TRUNCATE_LENGTH: usize = 200;

pub fn format_result(result: &RunResult) -> String {
    let mut out = String::new();
    if result.is_dry_run {
        let _ = writeln!(out, "{}", "=== Dry Run Mode ===".bold());
        for (index, preview) in result.previews().enumerate() {
            out.push_str(&format_preview(preview, index + 1));
        }
    }
    out.push_str(&format_playlist(&result.playlist));
    out.push_str(&format_summary(result));
    out
}

pub fn format_preview(preview: &UpdatePreview, index: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", format!("[{index}] {}", preview.session_key).bold());
    let _ = writeln!(out, "  Video ID: {}", preview.video_id);

    let _ = writeln!(out, "\n  {}", "Title:".bold());
    if preview.title_changed() {
        let _ = writeln!(out, "    {}", format!("-{}", preview.current_title).red());
        let _ = writeln!(out, "    {}", format!("+{}", preview.new_title).green());
    } else {
        let _ = writeln!(
            out,
            "    {}",
            format!("(unchanged) {}", preview.current_title).dimmed()
        );
    }

    let _ = writeln!(out, "\n  {}", "Description:".bold());
    out.push_str(&format_description_diff(
        &preview.current_description,
        &preview.new_description,
    ));
    out
}

fn format_description_diff(old: &str, new: &str) -> String {
    let mut out = String::new();

    if old == new {
        for line in truncate_preview(old).split('\n') {
            let _ = writeln!(out, "    {}", line.dimmed());
        }
        let _ = writeln!(out, "    {}", "(unchanged)".dimmed());
        return out;
    }

    let diff = TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header("Current", "New")
        .to_string();

    for line in diff.lines() {
        let styled = if line.starts_with("---") || line.starts_with("+++") {
            line.bold()
        } else if line.starts_with("@@") {
            line.cyan()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else {
            line.normal()
        };
        let _ = writeln!(out, "    {styled}");
    }
    out
}

fn truncate_preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_TRUNCATE_LENGTH {
        return text.to_string();
    }
    let head: String = text.chars().take(PREVIEW_TRUNCATE_LENGTH).collect();
    format!("{head}...")
}

pub fn format_playlist(phase: &PlaylistPhase) -> String {
    let mut out = String::new();
    match phase {
        PlaylistPhase::Skipped(reason) => {
            let _ = writeln!(out, "\n{}", format!("Playlist sync skipped: {reason}").dimmed());
        }
        PlaylistPhase::Failed(reason) => {
            let _ = writeln!(out, "\n{}", format!("Playlist sync failed: {reason}").red());
        }
        PlaylistPhase::Synced(sync) => {
            let heading = if sync.is_dry_run {
                format!("=== Playlist plan ({}) ===", sync.playlist_id)
            } else {
                format!("=== Playlist ({}) ===", sync.playlist_id)
            };
            let _ = writeln!(out, "\n{}", heading.bold());

            for op in &sync.operations {
                let label = format!("{:<11}", op.kind.label());
                let label = match op.kind {
                    OperationKind::Add => label.green(),
                    OperationKind::Reorder => label.yellow(),
                    OperationKind::MoveToEnd => label.magenta(),
                    OperationKind::Unchanged => label.dimmed(),
                };
                let _ = writeln!(
                    out,
                    "  {} #{:<3} {} ({})",
                    label, op.target_position, op.title, op.video_id
                );
            }

            let counts = &sync.counts;
            let _ = writeln!(
                out,
                "  Added: {}, Reordered: {}, Moved to end: {}, Unchanged: {}",
                counts.added, counts.reordered, counts.moved_to_end, counts.unchanged
            );
        }
    }
    out
}

pub fn format_summary(result: &RunResult) -> String {
    let summary = result.summary();
    let mut out = String::new();

    if result.is_dry_run {
        let _ = writeln!(
            out,
            "\nSummary: Would update {} videos",
            summary.updated.to_string().green().bold()
        );
    } else {
        let _ = writeln!(out, "\nUpdated: {} videos", summary.updated);
    }

    if summary.unchanged > 0 {
        let _ = writeln!(out, "Unchanged: {}", summary.unchanged);
    }
    if summary.skipped_no_content > 0 {
        let _ = writeln!(out, "Skipped (no content): {}", summary.skipped_no_content);
    }
    if summary.skipped_no_mapping > 0 {
        let _ = writeln!(out, "Skipped (no mapping): {}", summary.skipped_no_mapping);
    }
    if summary.unused_mappings > 0 {
        let _ = writeln!(out, "Unused mappings: {}", summary.unused_mappings);
        for unused in &result.unused_mappings {
            let _ = writeln!(out, "  - {} ({})", unused.slot, unused.video_id);
        }
    }

    if summary.errors > 0 {
        let _ = writeln!(out, "{}", format!("Errors: {}", summary.errors).red());
        for report in &result.sessions {
            if let SessionStatus::Error(reason) = &report.status {
                let _ = writeln!(
                    out,
                    "  - {} ({}): {}",
                    report.session_key(),
                    report.video_id.as_deref().unwrap_or("-"),
                    reason
                );
            }
        }
    }
    out
}
