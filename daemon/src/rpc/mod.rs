//! JSON-RPC module for daemon communication.
//!
//! Methods:
//! - `generate`: Start a song concept generation
//! - `cancel`: Abandon the running generation
//! - `songs`, `select`, `now_playing`: Browse and pick songs
//! - `set_language`, `session`: Session language and snapshot
//! - `register`: Sign-up flow
//! - `ping`, `shutdown`
//!
//! Notifications:
//! - `song_generated`: A generation finished and its song is now playing
//! - `generation_cancelled`: A generation was superseded or cancelled

pub mod methods;
pub mod server;
pub mod types;

// Re-export commonly used types
pub use server::{run_server, Server, ServerState};
pub use types::{
    CancelReason, CancelResult, GenerateParams, GenerateResult, GenerationCancelledParams,
    GenerationStatus, JsonRpcError, JsonRpcErrorResponse, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse, RequestId, SongGeneratedParams, SongsResult,
};
