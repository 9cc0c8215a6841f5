//! Generation provider abstraction.
//!
//! The song generator talks to two independent capabilities, structured
//! text and image synthesis, through the [`ConceptProvider`] trait. The
//! production implementation is [`GeminiClient`]; tests substitute scripted
//! providers.

pub mod gemini;
#[cfg(test)]
pub mod testing;

use std::future::Future;

use serde_json::{json, Value};

use crate::error::Result;

pub use gemini::GeminiClient;

/// Fields every song concept response must carry.
pub const CONCEPT_FIELDS: [&str; 4] = ["title", "artist", "style", "lyrics"];

/// Number of images requested per song.
pub const IMAGE_COUNT: u32 = 1;

/// Aspect ratio of generated album art.
pub const IMAGE_ASPECT_RATIO: &str = "1:1";

/// Output format of generated album art.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// A structured text generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    /// Full prompt, including the language instruction.
    pub prompt: String,

    /// Response schema the model must follow.
    pub schema: Value,
}

impl TextRequest {
    /// Creates a request constrained to the song concept schema.
    pub fn song_concept(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            schema: concept_schema(),
        }
    }
}

/// An image synthesis request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub count: u32,
    pub aspect_ratio: &'static str,
    pub mime_type: &'static str,
}

impl ImageRequest {
    /// Creates a request for a single square JPEG cover.
    pub fn album_cover(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            count: IMAGE_COUNT,
            aspect_ratio: IMAGE_ASPECT_RATIO,
            mime_type: IMAGE_MIME_TYPE,
        }
    }
}

/// A backend able to produce song concept text and album art.
pub trait ConceptProvider: Send + Sync {
    /// Runs a structured text generation and returns the raw response text.
    fn generate_text(&self, request: &TextRequest) -> impl Future<Output = Result<String>> + Send;

    /// Runs an image generation and returns the first image as base64.
    fn generate_image(&self, request: &ImageRequest)
        -> impl Future<Output = Result<String>> + Send;
}

/// JSON schema of a song concept: an object with four required strings.
pub fn concept_schema() -> Value {
    let properties: serde_json::Map<String, Value> = CONCEPT_FIELDS
        .iter()
        .map(|field| (field.to_string(), json!({ "type": "STRING" })))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": CONCEPT_FIELDS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_all_fields() {
        let schema = concept_schema();
        assert_eq!(schema["type"], "OBJECT");
        for field in CONCEPT_FIELDS {
            assert_eq!(schema["properties"][field]["type"], "STRING");
        }
        assert_eq!(schema["required"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn album_cover_request_shape() {
        let request = ImageRequest::album_cover("cover");
        assert_eq!(request.count, 1);
        assert_eq!(request.aspect_ratio, "1:1");
        assert_eq!(request.mime_type, "image/jpeg");
    }
}
