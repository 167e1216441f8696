//! Mapping domain module.
//!
//! Associates schedule slots with YouTube videos and carries the
//! per-conference formatting settings (hashtags, footer).

mod model;
pub mod source;

pub use model::{MappingConfig, SessionOverride, VideoMapping};
pub use source::{MappingSource, MappingTemplateWriter};
