use chrono::NaiveDateTime;
use std::fmt;

/// A (timeslot, room) pair identifying one session within a conference.
///
/// Timeslots are wall-clock times in the conference's own timezone.
/// Ordering is by timeslot first, then room, which is the schedule order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleSlot {
    pub timeslot: NaiveDateTime,
    pub room: String,
}

impl ScheduleSlot {
    pub fn new(timeslot: NaiveDateTime, room: impl Into<String>) -> Self {
        Self {
            timeslot,
            room: room.into(),
        }
    }
}

impl fmt::Display for ScheduleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.timeslot.format("%Y-%m-%dT%H:%M:%S"), self.room)
    }
}
