//! Song type shared by the sample catalog and the generator.
//!
//! A Song is a display record standing in for a real audio track. Songs are
//! identified by an opaque id that is unique within the running process.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Base of the deterministic placeholder cover art service.
pub const PLACEHOLDER_IMAGE_BASE: &str = "https://picsum.photos/seed";

/// Fixed cover used by the fallback song.
pub const GENERIC_IMAGE_URL: &str = "https://picsum.photos/400/400";

/// Prefix of inline album art produced by the image model.
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// A song record as rendered by the front end.
///
/// Serialized in camelCase to match the web client's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Opaque identifier, unique within the session's display list.
    pub id: String,

    pub title: String,

    pub artist: String,

    /// URL or inline `data:` URI of the album art.
    pub image_url: String,

    /// Free-text genre descriptor, e.g. "Cyberpunk Jazz".
    pub style: String,

    /// Display duration such as "2:45". Not backed by real audio.
    pub duration: String,

    /// Display-only play count.
    pub plays: u64,

    /// Short lyrics snippet, present on generated songs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,

    /// Set on songs produced by the generator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_generated: Option<bool>,
}

impl Song {
    /// Returns true if this song came from the generator.
    pub fn is_generated(&self) -> bool {
        self.is_generated.unwrap_or(false)
    }

    /// Returns true if the album art is embedded inline rather than linked.
    pub fn has_inline_image(&self) -> bool {
        self.image_url.starts_with("data:")
    }
}

static SONG_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a fresh song identifier.
///
/// The id is the first 16 hex characters of the SHA256 hash of
/// `{counter}:{nanos}:{salt}`. The process-wide counter makes every input
/// distinct, so successive ids never repeat within a process.
pub fn generate_song_id() -> String {
    let counter = SONG_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let salt: u64 = rand::random();

    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}:{}", counter, nanos, salt).as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

/// Builds the placeholder cover URL seeded by a song title.
///
/// The title is percent-encoded as a single path segment, so the same title
/// always maps to the same image. Dot-only titles stay literal segments.
pub fn placeholder_image_url(title: &str) -> String {
    format!("{}/{}/400/400", PLACEHOLDER_IMAGE_BASE, encode_uri_component(title))
}

/// Percent-encodes everything except the URI component unreserved set.
fn encode_uri_component(s: &str) -> String {
    let mut encoded = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Wraps base64 JPEG bytes in a data URI.
pub fn jpeg_data_uri(base64_bytes: &str) -> String {
    format!("{}{}", JPEG_DATA_URI_PREFIX, base64_bytes)
}
