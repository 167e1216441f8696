//! YouTube domain module.
//!
//! # Module Structure
//!
//! - `model`: Video and playlist data as seen by the core
//! - `service`: `VideoService` / `PlaylistService` traits implemented by API adapters

pub mod model;
pub mod service;

pub use model::{PlaylistItem, PlaylistSnapshot, VideoInfo, VideoUpdateRequest};
pub use service::{PlaylistService, VideoService};
