//! Daemon configuration module.
//!
//! Contains the runtime configuration for the tunesmith-daemon, including
//! provider credentials, model selection and the auth deployment mode.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::Language;

/// Default base URL of the Gemini REST API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default structured text model.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default album art model.
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

/// Default auth backend, the local worker the dev proxy pointed at.
pub const DEFAULT_AUTH_BASE: &str = "http://127.0.0.1:8788";

/// Upper bound for TUNESMITH_REQUEST_TIMEOUT_SECS.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Whether an auth backend is deployed next to the front end.
///
/// Replaces guessing backend presence from the shape of the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// A real auth backend answers /api/auth/*.
    Live,

    /// Static deployment without a backend.
    /// Registration succeeds locally without a network call.
    #[default]
    Demo,
}

impl DeploymentMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentMode::Live => "live",
            DeploymentMode::Demo => "demo",
        }
    }

    /// Parses a deployment mode from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "live" | "backend" => Some(DeploymentMode::Live),
            "demo" | "static" => Some(DeploymentMode::Demo),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Runtime configuration for the daemon.
///
/// This configuration is typically loaded from environment variables at
/// startup, with command-line overrides applied by `main`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// API key for the generation provider. Never serialized.
    /// If None, every generation resolves to the fallback song.
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,

    /// Base URL of the generation provider's REST API.
    pub api_base: String,

    /// Model used for the structured text step.
    pub text_model: String,

    /// Model used for the album art step.
    pub image_model: String,

    /// Per-request timeout for provider calls.
    /// If None, requests wait indefinitely.
    pub request_timeout_secs: Option<u64>,

    /// Base URL of the auth backend.
    pub auth_base: String,

    /// Auth deployment mode.
    pub deployment: DeploymentMode,

    /// Initial session language.
    pub language: Language,
}

impl DaemonConfig {
    /// Creates a new DaemonConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a DaemonConfig from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `TUNESMITH_API_KEY` (or `API_KEY`) - Generation provider API key
    /// - `TUNESMITH_API_BASE` - Provider REST base URL
    /// - `TUNESMITH_TEXT_MODEL` - Structured text model
    /// - `TUNESMITH_IMAGE_MODEL` - Album art model
    /// - `TUNESMITH_REQUEST_TIMEOUT_SECS` - Provider request timeout (1-600)
    /// - `TUNESMITH_AUTH_BASE` - Auth backend base URL
    /// - `TUNESMITH_DEPLOYMENT` - Auth deployment mode (live, demo)
    /// - `TUNESMITH_LANGUAGE` - Initial language (en, zh)
    ///
    /// Falls back to defaults for unset or unparsable variables.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.api_key = lookup("TUNESMITH_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|key| !key.trim().is_empty());

        if let Some(base) = lookup("TUNESMITH_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }

        if let Some(model) = lookup("TUNESMITH_TEXT_MODEL").filter(|m| !m.is_empty()) {
            config.text_model = model;
        }

        if let Some(model) = lookup("TUNESMITH_IMAGE_MODEL").filter(|m| !m.is_empty()) {
            config.image_model = model;
        }

        if let Some(timeout_str) = lookup("TUNESMITH_REQUEST_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout_str.parse::<u64>() {
                if (1..=MAX_REQUEST_TIMEOUT_SECS).contains(&timeout) {
                    config.request_timeout_secs = Some(timeout);
                }
            }
        }

        if let Some(base) = lookup("TUNESMITH_AUTH_BASE") {
            config.auth_base = base.trim_end_matches('/').to_string();
        }

        if let Some(mode_str) = lookup("TUNESMITH_DEPLOYMENT") {
            if let Some(mode) = DeploymentMode::parse(&mode_str) {
                config.deployment = mode;
            }
        }

        if let Some(language_str) = lookup("TUNESMITH_LANGUAGE") {
            if let Some(language) = Language::parse(&language_str) {
                config.language = language;
            }
        }

        config
    }

    /// Returns true if a provider API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Returns the provider request timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        if !is_http_url(&self.api_base) {
            return Some(format!("api_base must be an http(s) URL: {}", self.api_base));
        }

        if !is_http_url(&self.auth_base) {
            return Some(format!("auth_base must be an http(s) URL: {}", self.auth_base));
        }

        if self.text_model.is_empty() || self.image_model.is_empty() {
            return Some("model names cannot be empty".to_string());
        }

        if let Some(timeout) = self.request_timeout_secs {
            if timeout == 0 {
                return Some("request_timeout_secs must be > 0".to_string());
            }
            if timeout > MAX_REQUEST_TIMEOUT_SECS {
                return Some(format!(
                    "request_timeout_secs too high: {} (max {})",
                    timeout, MAX_REQUEST_TIMEOUT_SECS
                ));
            }
        }

        None
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            request_timeout_secs: None,
            auth_base: DEFAULT_AUTH_BASE.to_string(),
            deployment: DeploymentMode::default(),
            language: Language::default(),
        }
    }
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn deployment_parsing() {
        assert_eq!(DeploymentMode::parse("live"), Some(DeploymentMode::Live));
        assert_eq!(DeploymentMode::parse("DEMO"), Some(DeploymentMode::Demo));
        assert_eq!(DeploymentMode::parse("static"), Some(DeploymentMode::Demo));
        assert_eq!(DeploymentMode::parse("maybe"), None);
    }

    #[test]
    fn deployment_display() {
        assert_eq!(DeploymentMode::Live.to_string(), "live");
        assert_eq!(DeploymentMode::Demo.to_string(), "demo");
    }

    #[test]
    fn defaults() {
        let config = DaemonConfig::new();
        assert!(!config.has_api_key());
        assert_eq!(config.text_model, "gemini-2.5-flash");
        assert_eq!(config.image_model, "imagen-4.0-generate-001");
        assert_eq!(config.deployment, DeploymentMode::Demo);
        assert_eq!(config.language, Language::Zh);
        assert!(config.request_timeout().is_none());
        assert!(config.validate().is_none());
    }

    #[test]
    fn from_vars_reads_everything() {
        let config = DaemonConfig::from_vars(lookup_from(&[
            ("TUNESMITH_API_KEY", "secret"),
            ("TUNESMITH_API_BASE", "http://localhost:9000/"),
            ("TUNESMITH_TEXT_MODEL", "gemini-test"),
            ("TUNESMITH_REQUEST_TIMEOUT_SECS", "30"),
            ("TUNESMITH_DEPLOYMENT", "live"),
            ("TUNESMITH_LANGUAGE", "en"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.api_base, "http://localhost:9000");
        assert_eq!(config.text_model, "gemini-test");
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.deployment, DeploymentMode::Live);
        assert_eq!(config.language, Language::En);
    }

    #[test]
    fn api_key_falls_back_to_plain_name() {
        let config = DaemonConfig::from_vars(lookup_from(&[("API_KEY", "plain")]));
        assert_eq!(config.api_key.as_deref(), Some("plain"));

        let blank = DaemonConfig::from_vars(lookup_from(&[("TUNESMITH_API_KEY", "  ")]));
        assert!(!blank.has_api_key());
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = DaemonConfig::from_vars(lookup_from(&[
            ("TUNESMITH_REQUEST_TIMEOUT_SECS", "0"),
            ("TUNESMITH_DEPLOYMENT", "sometimes"),
            ("TUNESMITH_LANGUAGE", "fr"),
        ]));
        assert!(config.request_timeout_secs.is_none());
        assert_eq!(config.deployment, DeploymentMode::Demo);
        assert_eq!(config.language, Language::Zh);
    }

    #[test]
    fn config_validation() {
        let mut config = DaemonConfig::new();
        config.request_timeout_secs = Some(0);
        assert!(config.validate().is_some());

        config.request_timeout_secs = Some(10);
        assert!(config.validate().is_none());

        config.auth_base = "ftp://example.com".to_string();
        assert!(config.validate().is_some());
    }

    #[test]
    fn api_key_is_not_serialized() {
        let mut config = DaemonConfig::new();
        config.api_key = Some("secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
