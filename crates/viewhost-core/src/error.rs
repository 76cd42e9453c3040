//! Application error types with recoverable/fatal classification

use std::path::PathBuf;
use thiserror::Error;

use crate::types::ViewId;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    // ─────────────────────────────────────────────────────────────
    // Protocol Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    #[error("Message from unknown or destroyed view {view_id}")]
    UnknownView { view_id: ViewId },

    // ─────────────────────────────────────────────────────────────
    // Backend Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("Backend returned HTTP {status}: {message}")]
    BackendStatus { status: u16, message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn unknown_view(view_id: ViewId) -> Self {
        Self::UnknownView { view_id }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn backend_status(status: u16, message: impl Into<String>) -> Self {
        Self::BackendStatus {
            status,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error.
    ///
    /// Protocol and backend failures never take the host down: invalid
    /// messages are dropped and network failures keep the last good state.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Protocol { .. }
                | Error::UnknownView { .. }
                | Error::Backend { .. }
                | Error::BackendStatus { .. }
                | Error::ChannelSend { .. }
        )
    }

    /// Check if this error should trigger host process exit
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ConfigNotFound { .. } | Error::Config { .. } | Error::ChannelClosed
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::protocol("bad envelope");
        assert_eq!(err.to_string(), "Protocol error: bad envelope");

        let err = Error::unknown_view(42);
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_url_parse() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Url(_)));
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::protocol("parse error").is_recoverable());
        assert!(Error::unknown_view(1).is_recoverable());
        assert!(Error::backend("timeout").is_recoverable());
        assert!(Error::backend_status(502, "bad gateway").is_recoverable());
        assert!(!Error::ChannelClosed.is_recoverable());
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::ConfigNotFound {
            path: PathBuf::from("/missing/viewhost.toml")
        }
        .is_fatal());
        assert!(Error::ChannelClosed.is_fatal());
        assert!(!Error::protocol("dropped").is_fatal());
        assert!(!Error::backend("500").is_fatal());
    }

    #[test]
    fn test_error_constructors() {
        let _ = Error::protocol("test");
        let _ = Error::backend("test");
        let _ = Error::backend_status(404, "test");
        let _ = Error::config("test");
        let _ = Error::channel_send("test");
    }
}
