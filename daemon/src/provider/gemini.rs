//! Gemini REST client.
//!
//! Text goes through `models/{model}:generateContent` with a JSON response
//! schema; album art goes through the Imagen `models/{model}:predict`
//! endpoint.

use log::debug;
use serde_json::{json, Value};

use crate::config::DaemonConfig;
use crate::error::{DaemonError, ErrorCode, Result};

use super::{ConceptProvider, ImageRequest, TextRequest};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Longest slice of an error body kept in messages.
const ERROR_BODY_LIMIT: usize = 200;

/// Client for the Gemini text and Imagen image endpoints.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    /// Creates a client from the daemon configuration.
    ///
    /// A missing API key is not an error here; it surfaces on the first
    /// request so the generator can fall back.
    pub fn new(config: &DaemonConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            DaemonError::with_source(
                ErrorCode::ProviderRequestFailed,
                "Failed to create HTTP client",
                e,
            )
        })?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    /// Returns the text model identifier.
    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(DaemonError::missing_api_key)
    }

    fn endpoint(&self, model: &str, action: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.api_base, model, action)
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        let api_key = self.api_key()?;
        debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                DaemonError::with_source(
                    ErrorCode::ProviderRequestFailed,
                    format!("Request to {} failed", url),
                    e,
                )
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            DaemonError::with_source(
                ErrorCode::ProviderRequestFailed,
                "Failed to read response body",
                e,
            )
        })?;

        if !status.is_success() {
            return Err(DaemonError::provider_request_failed(format!(
                "HTTP {}: {}",
                status,
                error_message(&text)
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| DaemonError::malformed_response(format!("response is not JSON: {}", e)))
    }
}

impl ConceptProvider for GeminiClient {
    async fn generate_text(&self, request: &TextRequest) -> Result<String> {
        let url = self.endpoint(&self.text_model, "generateContent");
        let response = self.post(&url, &text_request_body(request)).await?;
        extract_text(&response)
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<String> {
        let url = self.endpoint(&self.image_model, "predict");
        let response = self.post(&url, &image_request_body(request)).await?;
        extract_image_bytes(&response)
    }
}

/// Builds the generateContent body for a structured text request.
pub fn text_request_body(request: &TextRequest) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [{ "text": request.prompt }] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.schema,
        },
    })
}

/// Builds the Imagen predict body for an image request.
pub fn image_request_body(request: &ImageRequest) -> Value {
    json!({
        "instances": [{ "prompt": request.prompt }],
        "parameters": {
            "sampleCount": request.count,
            "aspectRatio": request.aspect_ratio,
            "outputOptions": { "mimeType": request.mime_type },
        },
    })
}

/// Concatenates the text parts of the first candidate.
pub fn extract_text(response: &Value) -> Result<String> {
    let parts = response["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| DaemonError::malformed_response("no candidate content"))?;

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    if text.trim().is_empty() {
        return Err(DaemonError::malformed_response("candidate has no text"));
    }
    Ok(text)
}

/// Returns the base64 bytes of the first prediction.
pub fn extract_image_bytes(response: &Value) -> Result<String> {
    match response["predictions"][0]["bytesBase64Encoded"].as_str() {
        Some(bytes) if !bytes.is_empty() => Ok(bytes.to_string()),
        _ => Err(DaemonError::image_generation_failed("no image in response")),
    }
}

/// Pulls a readable message out of an error body.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value["error"]["message"].as_str() {
            return message.to_string();
        }
    }
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{fallback_song, SongGenerator};
    use crate::provider::concept_schema;
    use crate::types::{Language, Song};

    fn fallback_song_with_id(language: Language, id: &str) -> Song {
        Song {
            id: id.to_string(),
            ..fallback_song(language)
        }
    }

    #[test]
    fn text_body_carries_schema_and_prompt() {
        let request = TextRequest::song_concept("make a song");
        let body = text_request_body(&request);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "make a song");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"], concept_schema());
    }

    #[test]
    fn image_body_requests_one_square_jpeg() {
        let body = image_request_body(&ImageRequest::album_cover("cover"));
        assert_eq!(body["instances"][0]["prompt"], "cover");
        assert_eq!(body["parameters"]["sampleCount"], 1);
        assert_eq!(body["parameters"]["aspectRatio"], "1:1");
        assert_eq!(body["parameters"]["outputOptions"]["mimeType"], "image/jpeg");
    }

    #[test]
    fn extract_text_joins_parts() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"title\":" }, { "text": "\"x\"}" }] }
            }]
        });
        assert_eq!(extract_text(&response).unwrap(), "{\"title\":\"x\"}");
    }

    #[test]
    fn extract_text_rejects_empty_candidates() {
        let err = extract_text(&json!({ "candidates": [] })).unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedResponse);

        let blank = json!({ "candidates": [{ "content": { "parts": [{ "text": "  " }] } }] });
        assert_eq!(extract_text(&blank).unwrap_err().code, ErrorCode::MalformedResponse);
    }

    #[test]
    fn extract_image_bytes_requires_prediction() {
        let ok = json!({ "predictions": [{ "bytesBase64Encoded": "AAAA", "mimeType": "image/jpeg" }] });
        assert_eq!(extract_image_bytes(&ok).unwrap(), "AAAA");

        let empty = json!({ "predictions": [] });
        assert_eq!(
            extract_image_bytes(&empty).unwrap_err().code,
            ErrorCode::ImageGenerationFailed
        );
        assert!(extract_image_bytes(&json!({})).is_err());
    }

    #[test]
    fn error_message_prefers_json_message() {
        let body = r#"{"error":{"code":403,"message":"API key not valid"}}"#;
        assert_eq!(error_message(body), "API key not valid");
        assert_eq!(error_message("<html>404</html>"), "<html>404</html>");
    }

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        let client = GeminiClient::new(&DaemonConfig::default()).unwrap();
        let err = client
            .generate_text(&TextRequest::song_concept("anything"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingApiKey);
    }

    #[tokio::test]
    async fn unreachable_provider_yields_fallback_song() {
        let config = DaemonConfig {
            api_key: Some("test-key".to_string()),
            api_base: "http://127.0.0.1:1".to_string(),
            ..DaemonConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        let err = client
            .generate_text(&TextRequest::song_concept("anything"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProviderRequestFailed);

        let generator = SongGenerator::new(client);
        let song = generator.generate("anything", Language::En).await;
        assert_eq!(song, fallback_song_with_id(Language::En, &song.id));
        assert_eq!(song.title, "Error Generating Song");
        assert_eq!(song.duration, "0:00");
    }

    #[test]
    fn endpoints_use_configured_models() {
        let client = GeminiClient::new(&DaemonConfig::default()).unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash", "generateContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(client.text_model(), "gemini-2.5-flash");
    }
}
