//! JSON-RPC types for the daemon protocol.

use serde::{Deserialize, Serialize};

use crate::error::{DaemonError, ErrorCode};
use crate::types::{Language, Song};

/// JSON-RPC version constant.
pub const JSONRPC_VERSION: &str = "2.0";

/// Maximum prompt length accepted over RPC.
pub const MAX_PROMPT_CHARS: usize = 1000;

/// A JSON-RPC request ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RequestId {
    Integer(i64),
    String(String),
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId::Integer(id)
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        RequestId::String(id)
    }
}

/// A JSON-RPC request wrapper.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub id: RequestId,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// A JSON-RPC response wrapper.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse<T: Serialize> {
    pub jsonrpc: &'static str,
    pub id: RequestId,
    pub result: T,
}

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn new(id: RequestId, result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

/// A JSON-RPC error response.
#[derive(Debug, Serialize)]
pub struct JsonRpcErrorResponse {
    pub jsonrpc: &'static str,
    pub id: Option<RequestId>,
    pub error: JsonRpcError,
}

impl JsonRpcErrorResponse {
    pub fn new(id: Option<RequestId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error,
        }
    }
}

/// A JSON-RPC error object.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonRpcErrorData>,
}

/// Extended error data for application-specific errors.
#[derive(Debug, Serialize)]
pub struct JsonRpcErrorData {
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl JsonRpcError {
    fn application(code: i32, message: &str, error_code: ErrorCode, details: String) -> Self {
        Self {
            code,
            message: message.to_string(),
            data: Some(JsonRpcErrorData {
                error_code: error_code.as_str().to_string(),
                details: Some(details),
            }),
        }
    }

    /// Creates a parse error (-32700).
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self {
            code: -32700,
            message: message.into(),
            data: None,
        }
    }

    /// Creates an invalid request error (-32600).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: -32600,
            message: message.into(),
            data: None,
        }
    }

    /// Creates a method not found error (-32601).
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {}", method),
            data: None,
        }
    }

    /// Creates an invalid params error (-32602).
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: message.into(),
            data: None,
        }
    }

    /// Creates an internal error (-32603).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            code: -32603,
            message: message.into(),
            data: None,
        }
    }

    /// Creates an invalid language error (-32005).
    pub fn invalid_language(details: impl Into<String>) -> Self {
        Self::application(
            -32005,
            "Invalid language",
            ErrorCode::InvalidLanguage,
            details.into(),
        )
    }

    /// Creates an invalid prompt error (-32006).
    pub fn invalid_prompt(reason: impl Into<String>) -> Self {
        Self::application(-32006, "Invalid prompt", ErrorCode::InvalidPrompt, reason.into())
    }

    /// Creates a song not found error (-32007).
    pub fn song_not_found(details: impl Into<String>) -> Self {
        Self::application(-32007, "Song not found", ErrorCode::SongNotFound, details.into())
    }

    /// Creates an invalid credentials error (-32008).
    pub fn invalid_credentials(details: impl Into<String>) -> Self {
        Self::application(
            -32008,
            "Invalid credentials",
            ErrorCode::InvalidCredentials,
            details.into(),
        )
    }

    /// Creates a registration failed error (-32009).
    pub fn registration_failed(details: impl Into<String>) -> Self {
        Self::application(
            -32009,
            "Registration failed",
            ErrorCode::RegistrationFailed,
            details.into(),
        )
    }
}

impl From<DaemonError> for JsonRpcError {
    fn from(err: DaemonError) -> Self {
        match err.code {
            ErrorCode::InvalidPrompt => JsonRpcError::invalid_prompt(err.message),
            ErrorCode::InvalidLanguage => JsonRpcError::invalid_language(err.message),
            ErrorCode::SongNotFound => JsonRpcError::song_not_found(err.message),
            ErrorCode::InvalidCredentials => JsonRpcError::invalid_credentials(err.message),
            ErrorCode::RegistrationFailed => JsonRpcError::registration_failed(err.message),
            _ => JsonRpcError::internal_error(err.to_string()),
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Parameters for a generate request.
#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    /// Creative prompt for the song concept.
    pub prompt: String,

    /// Language override; the session language when absent.
    #[serde(default)]
    pub language: Option<String>,
}

impl GenerateParams {
    /// Validates the request parameters.
    pub fn validate(&self) -> Result<(), JsonRpcError> {
        if self.prompt.trim().is_empty() {
            return Err(DaemonError::empty_prompt().into());
        }
        let len = self.prompt.chars().count();
        if len > MAX_PROMPT_CHARS {
            return Err(DaemonError::prompt_too_long(len).into());
        }
        Ok(())
    }

    /// Resolves the requested language against the session default.
    pub fn resolve_language(&self, default: Language) -> Result<Language, JsonRpcError> {
        match self.language.as_deref() {
            None => Ok(default),
            Some(s) => parse_language(s),
        }
    }
}

/// Parameters for a select request.
#[derive(Debug, Deserialize)]
pub struct SelectParams {
    pub id: String,
}

/// Parameters for a set_language request.
#[derive(Debug, Deserialize)]
pub struct SetLanguageParams {
    pub language: String,
}

/// Parses a language name into a [`Language`] or an RPC error.
pub fn parse_language(s: &str) -> Result<Language, JsonRpcError> {
    Language::from_code(s).ok_or_else(|| DaemonError::invalid_language(s).into())
}

// ============================================================================
// Results
// ============================================================================

/// Status of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    /// Nothing in flight.
    Idle,
    Generating,
    Cancelled,
}

/// Response for a generate request.
#[derive(Debug, Serialize)]
pub struct GenerateResult {
    /// Ticket identifying this request in later notifications.
    pub ticket: u64,

    /// Initial status after request.
    pub status: GenerationStatus,

    /// Language the concept is generated in.
    pub language: Language,
}

/// Response for a cancel request.
#[derive(Debug, Serialize)]
pub struct CancelResult {
    /// `cancelled` if a request was abandoned, `idle` otherwise.
    pub status: GenerationStatus,

    /// Ticket of the abandoned request.
    pub ticket: Option<u64>,
}

/// Response for a songs request.
#[derive(Debug, Serialize)]
pub struct SongsResult {
    pub language: Language,
    pub songs: Vec<Song>,
}

// ============================================================================
// Notifications
// ============================================================================

/// A JSON-RPC notification (no id field).
#[derive(Debug, Serialize)]
pub struct JsonRpcNotification<T: Serialize> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: T,
}

impl<T: Serialize> JsonRpcNotification<T> {
    pub fn new(method: &'static str, params: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
        }
    }
}

/// Notification sent when a song has been generated and selected.
#[derive(Debug, Serialize)]
pub struct SongGeneratedParams {
    pub ticket: u64,
    pub song: Song,
}

/// Why an in-flight generation stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelReason {
    /// A newer generate request replaced it.
    Superseded,
    /// The client asked to cancel.
    Requested,
}

/// Notification sent when an in-flight generation is abandoned.
#[derive(Debug, Serialize)]
pub struct GenerationCancelledParams {
    pub ticket: u64,
    pub reason: CancelReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_from_int() {
        let id: RequestId = 42.into();
        assert_eq!(id, RequestId::Integer(42));
    }

    #[test]
    fn request_id_from_string() {
        let id: RequestId = "abc".to_string().into();
        assert_eq!(id, RequestId::String("abc".to_string()));
    }

    #[test]
    fn generate_params_validate() {
        let ok = GenerateParams {
            prompt: "rainy jazz".to_string(),
            language: None,
        };
        assert!(ok.validate().is_ok());

        let empty = GenerateParams {
            prompt: "   ".to_string(),
            language: None,
        };
        assert_eq!(empty.validate().unwrap_err().code, -32006);

        let long = GenerateParams {
            prompt: "x".repeat(1001),
            language: None,
        };
        assert_eq!(long.validate().unwrap_err().code, -32006);
    }

    #[test]
    fn prompt_length_counts_characters() {
        let params = GenerateParams {
            prompt: "雨".repeat(1000),
            language: None,
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn language_resolution() {
        let params = GenerateParams {
            prompt: "x".to_string(),
            language: Some("en".to_string()),
        };
        assert_eq!(params.resolve_language(Language::Zh).unwrap(), Language::En);

        let default = GenerateParams {
            prompt: "x".to_string(),
            language: None,
        };
        assert_eq!(default.resolve_language(Language::Zh).unwrap(), Language::Zh);

        let bad = GenerateParams {
            prompt: "x".to_string(),
            language: Some("klingon".to_string()),
        };
        assert_eq!(bad.resolve_language(Language::Zh).unwrap_err().code, -32005);

        for alias in ["english", "chinese", "zh-cn"] {
            assert_eq!(parse_language(alias).unwrap_err().code, -32005);
        }
    }

    #[test]
    fn daemon_errors_map_to_rpc_codes() {
        assert_eq!(JsonRpcError::from(DaemonError::song_not_found("x")).code, -32007);
        assert_eq!(
            JsonRpcError::from(DaemonError::invalid_credentials("short")).code,
            -32008
        );
        assert_eq!(
            JsonRpcError::from(DaemonError::registration_failed("exists")).code,
            -32009
        );
        assert_eq!(JsonRpcError::from(DaemonError::missing_api_key()).code, -32603);
    }

    #[test]
    fn json_rpc_error_codes() {
        assert_eq!(JsonRpcError::parse_error("").code, -32700);
        assert_eq!(JsonRpcError::invalid_request("").code, -32600);
        assert_eq!(JsonRpcError::method_not_found("").code, -32601);
        assert_eq!(JsonRpcError::invalid_params("").code, -32602);
        assert_eq!(JsonRpcError::internal_error("").code, -32603);
        assert_eq!(JsonRpcError::invalid_language("").code, -32005);
        assert_eq!(JsonRpcError::invalid_prompt("").code, -32006);
    }

    #[test]
    fn error_data_carries_code_name() {
        let json = serde_json::to_value(JsonRpcError::song_not_found("abc")).unwrap();
        assert_eq!(json["data"]["error_code"], "SONG_NOT_FOUND");
        assert_eq!(json["data"]["details"], "abc");
    }
}
