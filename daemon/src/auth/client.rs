//! Registration client for the optional auth backend.
//!
//! Whether a backend exists is decided by [`DeploymentMode`], never by
//! inspecting what comes back. In demo mode registration succeeds without a
//! network call; in live mode the backend's answer is authoritative.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{DaemonConfig, DeploymentMode};
use crate::error::{DaemonError, ErrorCode, Result};

/// Path of the registration endpoint.
pub const REGISTER_PATH: &str = "/api/auth/register";

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Generic message when the backend gives no reason.
const DEFAULT_FAILURE: &str = "Registration failed";

/// Email and password submitted by the sign-up form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Applies the form's client-side checks.
    pub fn validate(&self) -> Result<()> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(DaemonError::invalid_credentials("Email is required"));
        }
        if !email.contains('@') {
            return Err(DaemonError::invalid_credentials(format!(
                "Not an email address: {}",
                email
            )));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DaemonError::invalid_credentials(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

/// How a successful registration was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthOutcome {
    /// The backend accepted the registration.
    Registered,
    /// Demo deployment; accepted locally.
    Demo,
}

/// Error body returned by the auth backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for the auth backend.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    mode: DeploymentMode,
}

impl AuthClient {
    /// Creates a client from the daemon configuration.
    pub fn new(config: &DaemonConfig) -> Result<Self> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            DaemonError::with_source(
                ErrorCode::RegistrationFailed,
                "Failed to create HTTP client",
                e,
            )
        })?;

        Ok(Self {
            http,
            base_url: config.auth_base.trim_end_matches('/').to_string(),
            mode: config.deployment,
        })
    }

    pub fn mode(&self) -> DeploymentMode {
        self.mode
    }

    /// Full URL of the registration endpoint.
    pub fn register_url(&self) -> String {
        format!("{}{}", self.base_url, REGISTER_PATH)
    }

    /// Registers a new account.
    pub async fn register(&self, credentials: &Credentials) -> Result<AuthOutcome> {
        credentials.validate()?;

        if self.mode == DeploymentMode::Demo {
            info!("Demo deployment, accepting registration for {}", credentials.email);
            return Ok(AuthOutcome::Demo);
        }

        let url = self.register_url();
        let response = self
            .http
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| {
                DaemonError::with_source(
                    ErrorCode::RegistrationFailed,
                    format!("Could not reach {}", url),
                    e,
                )
            })?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Failed to read registration response body: {}", e);
                String::new()
            }
        };
        let outcome = interpret_response(status, &body);
        if let Err(ref e) = outcome {
            warn!("Registration rejected with HTTP {}: {}", status, e.message);
        }
        outcome
    }
}

/// Maps a backend response to a registration outcome.
///
/// Any 2xx is success. Otherwise the JSON `error` field is surfaced when
/// present; bodies that are not JSON yield the generic failure.
pub fn interpret_response(status: u16, body: &str) -> Result<AuthOutcome> {
    if (200..300).contains(&status) {
        return Ok(AuthOutcome::Registered);
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FAILURE.to_string());

    Err(DaemonError::registration_failed(message))
}
