//! tunesmith-daemon: AI song concept generation daemon.
//!
//! Turns a free-text prompt into a song concept (title, artist, style tag,
//! lyrics snippet and album art) using a generative text model followed by
//! an image model. Failures never reach the caller: a failed text step
//! yields a localized fallback song and a failed image step a placeholder
//! cover.
//!
//! # Modules
//!
//! - [`types`]: Core data types (Song, Language, GenerationState)
//! - [`config`]: Runtime configuration (DaemonConfig, DeploymentMode)
//! - [`error`]: Error types and codes (DaemonError, ErrorCode)
//! - [`provider`]: Text and image provider trait and the Gemini client
//! - [`generation`]: The text-then-image song generator
//! - [`catalog`]: Sample songs and display helpers
//! - [`session`]: Generated songs, selection and request supersession
//! - [`auth`]: Demo-aware registration client
//! - [`rpc`]: JSON-RPC 2.0 server over stdio
//!
//! # Example
//!
//! ```rust,ignore
//! use tunesmith_daemon::{DaemonConfig, GeminiClient, Language, SongGenerator};
//!
//! let config = DaemonConfig::from_env();
//! let generator = SongGenerator::new(GeminiClient::new(&config)?);
//! let song = generator.generate("neon rain over a sleeping city", Language::En).await;
//! assert_eq!(song.is_generated, Some(true));
//! ```

pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod provider;
pub mod rpc;
pub mod session;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use config::{DaemonConfig, DeploymentMode};
pub use error::{DaemonError, ErrorCode, Result};
pub use generation::SongGenerator;
pub use provider::{ConceptProvider, GeminiClient};
pub use session::Session;
pub use types::{GenerationState, Language, Song};
