//! Sample catalog and display helpers.

pub mod display;
pub mod samples;

pub use display::format_plays;
pub use samples::sample_songs;
