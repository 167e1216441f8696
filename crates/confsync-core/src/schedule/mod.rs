//! Schedule domain module.
//!
//! # Module Structure
//!
//! - `speaker`: Speaker value type and name formatting tiers
//! - `slot`: `(timeslot, room)` identity of a session
//! - `session`: Session entity
//! - `conference`: `ConferenceSchedule` aggregate (duplicate-slot check)
//! - `source`: `ScheduleSource` trait implemented by schedule adapters

mod conference;
mod session;
mod slot;
pub mod source;
pub mod speaker;

pub use conference::ConferenceSchedule;
pub use session::Session;
pub use slot::ScheduleSlot;
pub use source::ScheduleSource;
pub use speaker::Speaker;
