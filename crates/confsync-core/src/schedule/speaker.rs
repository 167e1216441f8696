use serde::Deserialize;

/// A session speaker as published in the conference schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Speaker {
    pub first_name: String,
    pub last_name: String,
}

impl Speaker {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Full name, e.g. "John Doe". `None` when both parts are empty.
    pub fn full_name(&self) -> Option<String> {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Initials for every first-name token followed by the last name.
    ///
    /// "John Doe" -> "J. Doe", "Tze Chin Tang" -> "T. C. Tang".
    pub fn initial_name(&self) -> Option<String> {
        if self.first_name.is_empty() && self.last_name.is_empty() {
            return None;
        }

        if self.first_name.is_empty() {
            return Some(self.last_name.clone());
        }

        let initials = self
            .first_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .map(|c| format!("{c}."))
            .collect::<Vec<_>>()
            .join(" ");

        let name = format!("{} {}", initials, self.last_name);
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Last name only, `None` when empty.
    pub fn last_name_only(&self) -> Option<String> {
        (!self.last_name.is_empty()).then(|| self.last_name.clone())
    }
}

/// Comma-joined full names, skipping speakers without any name.
pub fn format_full(speakers: &[Speaker]) -> String {
    join_names(speakers, Speaker::full_name)
}

/// Comma-joined initial names.
pub fn format_initials(speakers: &[Speaker]) -> String {
    join_names(speakers, Speaker::initial_name)
}

/// Comma-joined last names.
pub fn format_last_names(speakers: &[Speaker]) -> String {
    join_names(speakers, Speaker::last_name_only)
}

fn join_names(speakers: &[Speaker], format: fn(&Speaker) -> Option<String>) -> String {
    speakers
        .iter()
        .filter_map(format)
        .collect::<Vec<_>>()
        .join(", ")
}
