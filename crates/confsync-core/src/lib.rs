//! Domain layer for confsync.
//!
//! # Module Structure
//!
//! - `schedule`: Speakers, slots, sessions and the conference schedule
//! - `content`: Budgeted YouTube title and description generation
//! - `mapping`: Slot to video mapping configuration
//! - `youtube`: Remote video/playlist models and service traits
//! - `playlist`: Playlist reconciliation operations
//! - `error`: Error taxonomy shared by every layer

pub mod content;
pub mod error;
pub mod mapping;
pub mod playlist;
pub mod schedule;
pub mod youtube;

pub use error::{ConfSyncError, Result};
