//! Application layer for confsync.
//!
//! This crate provides the use cases that coordinate the domain layer with
//! the schedule, mapping and YouTube collaborators. It only talks to them
//! through the traits defined in `confsync-core`.

pub mod dto;
pub mod generate_mapping;
pub mod playlist_reconciler;
pub mod sync_orchestrator;
pub mod video_update;

#[cfg(test)]
mod test_support;

pub use generate_mapping::{GenerateMappingUseCase, GeneratedMapping};
pub use playlist_reconciler::{PlaylistReconciler, ReconcileOutcome};
pub use sync_orchestrator::{RunOptions, SyncOrchestrator};
pub use video_update::VideoUpdateUseCase;
