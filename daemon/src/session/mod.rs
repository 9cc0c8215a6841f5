//! Session module for per-user display state.
//!
//! Provides the coordinator that owns generated songs and the active
//! selection.

pub mod coordinator;

// Re-export commonly used types
pub use coordinator::{GenerationTicket, Session, SessionSnapshot};
