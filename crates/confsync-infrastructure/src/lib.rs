//! Infrastructure layer for confsync.
//!
//! Adapters implementing the collaborator traits from `confsync-core`.
//!
//! # Module Structure
//!
//! - `confengine_api`: ConfEngine schedule client (`ScheduleSource`)
//! - `markdown_converter`: HTML abstracts to Markdown
//! - `mapping_file_reader`: YAML mapping file (`MappingSource`)
//! - `mapping_file_writer`: Commented YAML template (`MappingTemplateWriter`)
//! - `youtube_api`: YouTube Data API client (`VideoService`, `PlaylistService`)
//! - `youtube_auth`: OAuth token storage and refresh
//! - `oauth_consent`: Loopback browser consent for first-time authorization
//! - `config`: `config.toml` loading
//! - `paths`: Configuration directory resolution
//! - `http_client`: Shared `reqwest` client construction

pub mod config;
pub mod confengine_api;
pub mod http_client;
pub mod mapping_file_reader;
pub mod mapping_file_writer;
pub mod markdown_converter;
pub mod oauth_consent;
pub mod paths;
pub mod youtube_api;
pub mod youtube_auth;

pub use config::AppConfig;
pub use confengine_api::ConfEngineApi;
pub use http_client::build_client;
pub use mapping_file_reader::YamlMappingReader;
pub use mapping_file_writer::YamlMappingTemplateWriter;
pub use markdown_converter::MarkdownConverter;
pub use paths::{ConfSyncPaths, PathError};
pub use youtube_api::YouTubeApiClient;
pub use youtube_auth::{TokenStorage, YouTubeAuth};
