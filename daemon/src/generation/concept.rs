//! Song concept generation pipeline.
//!
//! Runs the text step, then the album art step, and assembles a [`Song`].
//! Every failure resolves to a usable record: a failed text step yields the
//! localized fallback song, a failed image step yields a placeholder cover.

use base64::Engine;
use log::{error, info, warn};
use serde::Deserialize;

use crate::error::{DaemonError, Result};
use crate::provider::{ConceptProvider, ImageRequest, TextRequest};
use crate::types::{
    generate_song_id, jpeg_data_uri, placeholder_image_url, Language, Song, GENERIC_IMAGE_URL,
};

/// Display duration of a generated song.
pub const GENERATED_DURATION: &str = "2:45";

/// Display duration of the fallback song.
pub const FALLBACK_DURATION: &str = "0:00";

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_ARTIST: &str = "AI Artist";
const DEFAULT_STYLE: &str = "Experimental";

/// Decoded text step response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SongConcept {
    pub title: String,
    pub artist: String,
    pub style: String,
    pub lyrics: String,
}

impl SongConcept {
    /// Replaces blank fields with display defaults.
    fn with_defaults(self) -> Self {
        Self {
            title: non_blank_or(self.title, DEFAULT_TITLE),
            artist: non_blank_or(self.artist, DEFAULT_ARTIST),
            style: non_blank_or(self.style, DEFAULT_STYLE),
            lyrics: self.lyrics.trim().to_string(),
        }
    }
}

fn non_blank_or(value: String, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Stateless song concept generator over a provider.
pub struct SongGenerator<P> {
    provider: P,
}

impl<P: ConceptProvider> SongGenerator<P> {
    /// Creates a generator using the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Generates a song concept from a prompt.
    ///
    /// Never fails: the returned song is either the generated concept or the
    /// fallback record for `language`. The prompt is not validated here.
    pub async fn generate(&self, prompt: &str, language: Language) -> Song {
        let concept = match self.generate_concept(prompt, language).await {
            Ok(concept) => concept,
            Err(e) => {
                error!("Song concept generation failed: {}", e);
                return fallback_song(language);
            }
        };

        let image_url = match self.generate_cover(&concept).await {
            Ok(data_uri) => data_uri,
            Err(e) => {
                warn!("Image generation failed, using placeholder cover: {}", e);
                placeholder_image_url(&concept.title)
            }
        };

        let song = Song {
            id: generate_song_id(),
            title: concept.title,
            artist: concept.artist,
            image_url,
            style: concept.style,
            duration: GENERATED_DURATION.to_string(),
            plays: 0,
            lyrics: Some(concept.lyrics).filter(|lyrics| !lyrics.is_empty()),
            is_generated: Some(true),
        };

        info!(
            "Generated song concept \"{}\" by {} ({} cover)",
            song.title,
            song.artist,
            if song.has_inline_image() { "generated" } else { "placeholder" }
        );
        song
    }

    /// Step 1: structured text generation and decoding.
    async fn generate_concept(&self, prompt: &str, language: Language) -> Result<SongConcept> {
        let request = TextRequest::song_concept(concept_prompt(prompt, language));
        let text = self.provider.generate_text(&request).await?;
        decode_concept(&text)
    }

    /// Step 2: album art, returned as an inline data URI.
    async fn generate_cover(&self, concept: &SongConcept) -> Result<String> {
        let request = ImageRequest::album_cover(cover_prompt(&concept.title, &concept.style));
        let bytes = self.provider.generate_image(&request).await?;
        let bytes = bytes.trim();

        if bytes.is_empty() {
            return Err(DaemonError::image_generation_failed("empty image payload"));
        }
        base64::engine::general_purpose::STANDARD
            .decode(bytes)
            .map_err(|e| DaemonError::image_generation_failed(format!("invalid base64: {}", e)))?;

        Ok(jpeg_data_uri(bytes))
    }
}

/// Builds the text step prompt.
pub fn concept_prompt(prompt: &str, language: Language) -> String {
    format!(
        "Create a creative song concept based on this prompt: \"{}\".\n\
         {}\n\
         Return a JSON object with a catchy title, an imaginary artist name, \
         a music style (e.g., 'Cyberpunk Jazz'), and a short 4-line snippet of lyrics.",
        prompt,
        language.generation_instruction()
    )
}

/// Builds the image step prompt.
pub fn cover_prompt(title: &str, style: &str) -> String {
    format!(
        "Album cover art for a song titled \"{}\" in the style of {}. \
         High quality, artistic, abstract, music visualization, 4k resolution.",
        title, style
    )
}

/// Decodes the text step response against the concept schema.
///
/// All four fields must be present and be strings. Models occasionally wrap
/// JSON in a markdown fence; the fence is stripped first.
pub fn decode_concept(text: &str) -> Result<SongConcept> {
    let body = strip_code_fence(text.trim());
    let concept: SongConcept = serde_json::from_str(body)
        .map_err(|e| DaemonError::malformed_response(format!("invalid concept JSON: {}", e)))?;
    Ok(concept.with_defaults())
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// The localized record returned when the text step fails.
pub fn fallback_song(language: Language) -> Song {
    let (title, lyrics) = match language {
        Language::En => (
            "Error Generating Song",
            "Could not generate lyrics at this time.",
        ),
        Language::Zh => ("生成失败", "暂时无法生成歌词。"),
    };

    Song {
        id: generate_song_id(),
        title: title.to_string(),
        artist: "System".to_string(),
        image_url: GENERIC_IMAGE_URL.to_string(),
        style: "Glitch Noise".to_string(),
        duration: FALLBACK_DURATION.to_string(),
        plays: 0,
        lyrics: Some(lyrics.to_string()),
        is_generated: Some(true),
    }
}
