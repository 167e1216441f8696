use super::session::Session;
use super::slot::ScheduleSlot;
use crate::error::ConfigError;
use std::collections::HashSet;

/// All sessions of one conference, in schedule order.
#[derive(Debug, Clone)]
pub struct ConferenceSchedule {
    conf_id: String,
    timezone: String,
    sessions: Vec<Session>,
}

impl ConferenceSchedule {
    /// Builds a schedule, sorting sessions by slot.
    ///
    /// Fails when two sessions share a slot.
    pub fn new(
        conf_id: impl Into<String>,
        timezone: impl Into<String>,
        mut sessions: Vec<Session>,
    ) -> Result<Self, ConfigError> {
        {
            let mut seen: HashSet<&ScheduleSlot> = HashSet::with_capacity(sessions.len());
            for session in &sessions {
                if !seen.insert(session.slot()) {
                    return Err(ConfigError::DuplicateSlot(session.slot().to_string()));
                }
            }
        }

        sessions.sort_by(|a, b| a.slot().cmp(b.slot()));

        Ok(Self {
            conf_id: conf_id.into(),
            timezone: timezone.into(),
            sessions,
        })
    }

    pub fn conf_id(&self) -> &str {
        &self.conf_id
    }

    /// IANA timezone name of the conference, e.g. "Asia/Tokyo".
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Speaker;
    use chrono::NaiveDate;

    fn session(hour: u32, room: &str, abstract_md: &str) -> Session {
        let timeslot = NaiveDate::from_ymd_opt(2026, 1, 7)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        Session::new(
            ScheduleSlot::new(timeslot, room),
            format!("Talk {hour} {room}"),
            "",
            vec![Speaker::new("A", "B")],
            abstract_md,
            "",
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_slot_is_rejected() {
        let result = ConferenceSchedule::new(
            "conf",
            "Asia/Tokyo",
            vec![session(10, "Hall A", "x"), session(10, "Hall A", "y")],
        );

        assert!(matches!(result, Err(ConfigError::DuplicateSlot(_))));
    }

    #[test]
    fn test_sessions_are_sorted() {
        let schedule = ConferenceSchedule::new(
            "conf",
            "Asia/Tokyo",
            vec![
                session(11, "Hall A", "x"),
                session(10, "Hall B", "x"),
                session(10, "Hall A", "x"),
            ],
        )
        .unwrap();

        let titles: Vec<_> = schedule.sessions().iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["Talk 10 Hall A", "Talk 10 Hall B", "Talk 11 Hall A"]);
    }
}
