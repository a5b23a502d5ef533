//! Typed error hierarchy for the DORA dashboard client.
//!
//! Two enums cover the two failure sources, and `FormError` joins them for
//! form submissions:
//! - `ApiError` — transport and HTTP failures talking to the backend
//! - `ValidationError` — client-side form checks that block a request

use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the REST client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{message}")]
    Server { status: StatusCode, message: String },

    #[error("Request failed with status code {}", status.as_u16())]
    Status { status: StatusCode },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// The message a user should see, when the server supplied one.
    ///
    /// Transport failures and bare status codes return `None` so the caller
    /// can substitute its own wording ("Failed to load releases", ...).
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => Some(message),
            ApiError::Unauthorized => Some("Unauthorized"),
            _ => None,
        }
    }

    /// HTTP status, if a response was received at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Server { status, .. } | ApiError::Status { status } => Some(*status),
            ApiError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Text for the error banner: the server message or `fallback`.
    pub fn display_message(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err)
        }
    }
}

/// Client-side validation failures. None of these issue a network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Version is required")]
    EmptyVersion,

    #[error("Platform is required")]
    MissingPlatform,

    #[error("Release type is required")]
    MissingReleaseType,

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Username is required")]
    EmptyUsername,

    #[error("Password is required")]
    EmptyPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid email address")]
    InvalidEmail,
}

/// Outcome of submitting a form: rejected locally, or rejected by the API.
#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl FormError {
    /// Banner text: validation messages verbatim, API errors via `fallback`.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            FormError::Validation(e) => e.to_string(),
            FormError::Api(e) => e.display_message(fallback),
        }
    }
}
