//! Playlist reconciliation model.
//!
//! Operations produced by diffing the desired video order against the
//! remote playlist. The diff itself lives in the application layer because
//! it has to talk to the remote service between steps.

mod operation;

pub use operation::{DesiredVideo, OperationKind, PlaylistCounts, PlaylistOperation};
