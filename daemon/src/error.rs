//! Error types for the tunesmith-daemon.
//!
//! Defines all error codes and types used throughout the daemon for
//! consistent error handling and reporting. The song generator never lets
//! these escape to its caller; they surface from the provider, auth and
//! session layers and are logged or mapped to JSON-RPC errors.

use std::fmt;

/// Error codes returned by the daemon in error responses.
///
/// These codes are used in JSON-RPC error responses and allow clients
/// to programmatically handle specific error conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// No API key configured for the generation provider.
    /// Trigger: Neither TUNESMITH_API_KEY nor API_KEY is set.
    MissingApiKey,

    /// The request to the generation provider could not be completed.
    /// Trigger: Network error, DNS failure, non-2xx status.
    ProviderRequestFailed,

    /// The provider answered but the payload did not match the expected shape.
    /// Trigger: Missing candidates, non-JSON text, missing schema fields.
    MalformedResponse,

    /// The album art request failed or returned no image.
    /// Trigger: Image model error, empty predictions, invalid base64.
    ImageGenerationFailed,

    /// Prompt text is invalid.
    /// Trigger: Empty prompt or exceeds 1000 characters.
    InvalidPrompt,

    /// Language selector is not one of the supported languages.
    /// Trigger: Anything other than "en" or "zh".
    InvalidLanguage,

    /// No song with the requested identifier is in the display list.
    /// Trigger: Selecting an unknown or stale song id.
    SongNotFound,

    /// Registration input failed local validation.
    /// Trigger: Missing email, password shorter than 6 characters.
    InvalidCredentials,

    /// The auth backend rejected or could not process the registration.
    /// Trigger: Non-2xx response, network error in live mode.
    RegistrationFailed,

    /// Configuration values are inconsistent.
    /// Trigger: Non-http base URL, zero timeout.
    ConfigInvalid,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MissingApiKey => "MISSING_API_KEY",
            ErrorCode::ProviderRequestFailed => "PROVIDER_REQUEST_FAILED",
            ErrorCode::MalformedResponse => "MALFORMED_RESPONSE",
            ErrorCode::ImageGenerationFailed => "IMAGE_GENERATION_FAILED",
            ErrorCode::InvalidPrompt => "INVALID_PROMPT",
            ErrorCode::InvalidLanguage => "INVALID_LANGUAGE",
            ErrorCode::SongNotFound => "SONG_NOT_FOUND",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::RegistrationFailed => "REGISTRATION_FAILED",
            ErrorCode::ConfigInvalid => "CONFIG_INVALID",
        }
    }

    /// Returns a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::MissingApiKey => "No API key configured for the generation provider",
            ErrorCode::ProviderRequestFailed => "Request to the generation provider failed",
            ErrorCode::MalformedResponse => "Generation provider returned an unexpected payload",
            ErrorCode::ImageGenerationFailed => "Album art generation failed",
            ErrorCode::InvalidPrompt => "Prompt must be non-empty and at most 1000 characters",
            ErrorCode::InvalidLanguage => "Language must be 'en' or 'zh'",
            ErrorCode::SongNotFound => "Song is not in the current display list",
            ErrorCode::InvalidCredentials => "Email or password failed validation",
            ErrorCode::RegistrationFailed => "Registration was rejected or could not be completed",
            ErrorCode::ConfigInvalid => "Configuration is invalid",
        }
    }

    /// Returns a recovery hint suggesting how to resolve this error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCode::MissingApiKey => {
                "Set TUNESMITH_API_KEY (or API_KEY) to a Gemini API key. \
                 Without it every generation returns the fallback song"
            }
            ErrorCode::ProviderRequestFailed => {
                "Check internet connection and TUNESMITH_API_BASE, \
                 or try again later if the provider is unavailable"
            }
            ErrorCode::MalformedResponse => {
                "Try a different prompt or model (TUNESMITH_TEXT_MODEL); \
                 the model did not follow the response schema"
            }
            ErrorCode::ImageGenerationFailed => {
                "Check that the key has image model access (TUNESMITH_IMAGE_MODEL). \
                 A placeholder cover is used meanwhile"
            }
            ErrorCode::InvalidPrompt => {
                "Provide a descriptive prompt between 1 and 1000 characters \
                 (e.g., 'rainy night in Tokyo, synthwave')"
            }
            ErrorCode::InvalidLanguage => "Use language: \"en\" or \"zh\"",
            ErrorCode::SongNotFound => {
                "Call 'songs' to list the current display list and pick an id from it"
            }
            ErrorCode::InvalidCredentials => {
                "Provide an email address and a password of at least 6 characters"
            }
            ErrorCode::RegistrationFailed => {
                "Check TUNESMITH_AUTH_BASE, or run with TUNESMITH_DEPLOYMENT=demo \
                 when no auth backend is deployed"
            }
            ErrorCode::ConfigInvalid => "Fix the offending TUNESMITH_* environment variable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for daemon operations.
#[derive(Debug)]
pub struct DaemonError {
    /// The error code identifying the type of error.
    pub code: ErrorCode,
    /// Human-readable error message with context.
    pub message: String,
    /// Optional underlying cause of the error.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DaemonError {
    /// Creates a new DaemonError with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new DaemonError with an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a MISSING_API_KEY error.
    pub fn missing_api_key() -> Self {
        Self::new(ErrorCode::MissingApiKey, "API key not found")
    }

    /// Creates a PROVIDER_REQUEST_FAILED error.
    pub fn provider_request_failed(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ProviderRequestFailed,
            format!("Provider request failed: {}", reason.into()),
        )
    }

    /// Creates a MALFORMED_RESPONSE error.
    pub fn malformed_response(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::MalformedResponse,
            format!("Malformed response: {}", reason.into()),
        )
    }

    /// Creates an IMAGE_GENERATION_FAILED error.
    pub fn image_generation_failed(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ImageGenerationFailed,
            format!("Image generation failed: {}", reason.into()),
        )
    }

    /// Creates an INVALID_PROMPT error for empty prompts.
    pub fn empty_prompt() -> Self {
        Self::new(ErrorCode::InvalidPrompt, "Prompt cannot be empty")
    }

    /// Creates an INVALID_PROMPT error for prompts that are too long.
    pub fn prompt_too_long(len: usize) -> Self {
        Self::new(
            ErrorCode::InvalidPrompt,
            format!("Prompt too long: {} characters (maximum 1000)", len),
        )
    }

    /// Creates an INVALID_LANGUAGE error.
    pub fn invalid_language(language: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidLanguage,
            format!("Unsupported language: {}", language.into()),
        )
    }

    /// Creates a SONG_NOT_FOUND error.
    pub fn song_not_found(id: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::SongNotFound,
            format!("No song with id {}", id.into()),
        )
    }

    /// Creates an INVALID_CREDENTIALS error.
    pub fn invalid_credentials(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidCredentials, reason)
    }

    /// Creates a REGISTRATION_FAILED error.
    pub fn registration_failed(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::RegistrationFailed, reason)
    }

    /// Creates a CONFIG_INVALID error.
    pub fn config_invalid(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, reason)
    }
}

impl fmt::Display for DaemonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}. Recovery: {}",
            self.code,
            self.message,
            self.code.recovery_hint()
        )
    }
}

impl std::error::Error for DaemonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias using DaemonError.
pub type Result<T> = std::result::Result<T, DaemonError>;
