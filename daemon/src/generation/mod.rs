//! Song concept generation module.
//!
//! Provides the two-step text-then-image pipeline and its fallback record.

pub mod concept;

// Re-export commonly used items
pub use concept::{
    concept_prompt, cover_prompt, decode_concept, fallback_song, SongConcept, SongGenerator,
    FALLBACK_DURATION, GENERATED_DURATION,
};
