//! Core types for the tunesmith-daemon.
//!
//! This module re-exports all the core data types used throughout the daemon:
//! - [`Song`]: A catalog or generated song record
//! - [`Language`]: The en/zh language selector
//! - [`GenerationState`]: Status of the in-flight generation request

mod language;
mod song;
mod state;

// Re-export all types at the module level
pub use language::Language;
pub use song::{
    generate_song_id, jpeg_data_uri, placeholder_image_url, Song, GENERIC_IMAGE_URL,
    JPEG_DATA_URI_PREFIX, PLACEHOLDER_IMAGE_BASE,
};
pub use state::GenerationState;
