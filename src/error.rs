//! Error Handling
//!
//! `WikiError` covers everything that can reach a caller's error callback:
//! configuration problems, transport failures while sending the request,
//! non-success responses, and body read failures mid-stream.
//!
//! Malformed individual `data:` frames are not represented here. They are
//! absorbed by the streaming module and never escape it.

use thiserror::Error;

/// Longest response body kept in an [`WikiError::ApiError`] message.
pub(crate) const MAX_ERROR_BODY: usize = 512;

/// Coarse classification of a [`WikiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid or missing configuration
    Configuration,
    /// The request never produced a response (DNS, connect, reset, timeout)
    Transport,
    /// The server answered, but not with a usable stream
    Protocol,
    /// The body failed while it was being read
    Stream,
    /// The request body could not be serialized
    Serialization,
}

/// Errors produced by the streaming client.
#[derive(Error, Debug)]
pub enum WikiError {
    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Could not connect to the endpoint
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request timed out before a response arrived
    #[error("Timeout error: {0}")]
    TimeoutError(String),

    /// Any other failure while sending the request
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success HTTP status
    #[error("API error {code}: {message}")]
    ApiError { code: u16, message: String },

    /// Success status without a response body
    #[error("Response carried no body (status {0})")]
    MissingBody(u16),

    /// The response body failed while streaming
    #[error("Stream error: {0}")]
    StreamError(String),

    /// JSON serialization failure
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl WikiError {
    /// Build an [`WikiError::ApiError`] from a status code and raw body,
    /// truncating long bodies.
    pub fn api_error(code: u16, body: impl Into<String>) -> Self {
        let mut message = body.into();
        if message.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
            message.push_str("...");
        }
        if message.is_empty() {
            message = "request failed".to_string();
        }
        Self::ApiError { code, message }
    }

    /// Classify a send-time `reqwest` failure.
    pub fn from_send_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::TimeoutError(format!("Request timed out: {err}"));
        }
        if err.is_connect() {
            return Self::ConnectionError(format!("Connection error: {err}"));
        }
        Self::HttpError(format!("Failed to send request: {err}"))
    }

    /// Classify a body read failure.
    pub fn from_read_error(err: reqwest::Error) -> Self {
        Self::StreamError(format!("Failed to read response body: {err}"))
    }

    /// Recover the error carried through a line reader, or wrap a plain
    /// I/O failure as a [`WikiError::StreamError`].
    pub fn from_io_error(err: std::io::Error) -> Self {
        let message = err.to_string();
        match err.into_inner().map(|inner| inner.downcast::<WikiError>()) {
            Some(Ok(inner)) => *inner,
            _ => Self::StreamError(format!("Failed to read response body: {message}")),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::ConnectionError(_) | Self::TimeoutError(_) | Self::HttpError(_) => {
                ErrorCategory::Transport
            }
            Self::ApiError { .. } | Self::MissingBody(_) => ErrorCategory::Protocol,
            Self::StreamError(_) => ErrorCategory::Stream,
            Self::JsonError(_) => ErrorCategory::Serialization,
        }
    }

    /// True for failures where no response was received.
    pub fn is_transport(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    /// True for non-success or body-less responses.
    pub fn is_protocol(&self) -> bool {
        self.category() == ErrorCategory::Protocol
    }

    /// HTTP status attached to the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            Self::MissingBody(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for WikiError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, WikiError>;
