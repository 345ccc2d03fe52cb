//! Error types for the Blaze bridge.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! Only construction and transport setup surface errors to the caller.
//! Everything that happens after the bridge is running (inbound dispatch,
//! collaborator calls, delivery) is converted into a logged no-op or a
//! result payload sent back to the content.
//!
//! ```ignore
//! use blaze_bridge::{Bridge, Result};
//!
//! fn example(host: &Host) -> Result<Bridge> {
//!     Bridge::builder()
//!         .initiate_payload(serde_json::json!({ "baseUrl": "https://x/index.html" }))
//!         .callback(|payload: Value| println!("{payload}"))
//!         .build(host)
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Protocol | [`Error::MalformedEvent`] |
//! | Collaborators | [`Error::Storage`], [`Error::AppResolution`], [`Error::Launch`], [`Error::Surface`] |
//! | Lifecycle | [`Error::HostUnavailable`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`], [`Error::ChannelClosed`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned by the builder when a required field is missing or the
    /// base URL cannot be resolved.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Inbound envelope could not be interpreted.
    ///
    /// Never crosses the bridge boundary: the dispatcher logs and drops it.
    #[error("Malformed event: {message}")]
    MalformedEvent {
        /// What was wrong with the envelope.
        message: String,
    },

    // ========================================================================
    // Collaborator Errors
    // ========================================================================
    /// Storage adapter failure.
    #[error("Storage error for key '{key}': {message}")]
    Storage {
        /// Key being read or written.
        key: String,
        /// Underlying failure.
        message: String,
    },

    /// App resolver failure while listing or resolving candidates.
    #[error("App resolution failed: {message}")]
    AppResolution {
        /// Underlying failure.
        message: String,
    },

    /// The host could not launch the requested URI.
    #[error("{message}")]
    Launch {
        /// Human-readable reason reported back to the content.
        message: String,
    },

    /// Content surface creation failed.
    #[error("Surface error: {message}")]
    Surface {
        /// Underlying failure.
        message: String,
    },

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// The host context has been dropped.
    #[error("Host context is no longer available")]
    HostUnavailable,

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Timed out waiting for the content page to connect.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// WebSocket connection closed.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a malformed event error.
    #[inline]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedEvent {
            message: message.into(),
        }
    }

    /// Creates a storage error.
    #[inline]
    pub fn storage(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates an app resolution error.
    #[inline]
    pub fn app_resolution(message: impl Into<String>) -> Self {
        Self::AppResolution {
            message: message.into(),
        }
    }

    /// Creates a launch error.
    #[inline]
    pub fn launch(message: impl Into<String>) -> Self {
        Self::Launch {
            message: message.into(),
        }
    }

    /// Creates a surface error.
    #[inline]
    pub fn surface(message: impl Into<String>) -> Self {
        Self::Surface {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a malformed inbound envelope.
    #[inline]
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedEvent { .. } | Self::Json(_))
    }

    /// Returns `true` if an external collaborator failed.
    ///
    /// These are converted into result payloads rather than propagated.
    #[inline]
    #[must_use]
    pub fn is_collaborator_error(&self) -> bool {
        matches!(
            self,
            Self::Storage { .. }
                | Self::AppResolution { .. }
                | Self::Launch { .. }
                | Self::Surface { .. }
        )
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionTimeout { .. }
                | Self::ConnectionClosed
                | Self::WebSocket(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "Connection failed: failed to connect");
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("missing callback");
        assert_eq!(err.to_string(), "Configuration error: missing callback");
    }

    #[test]
    fn test_storage_error_names_key() {
        let err = Error::storage("token", "disk full");
        assert_eq!(err.to_string(), "Storage error for key 'token': disk full");
    }

    #[test]
    fn test_launch_error_is_bare_reason() {
        let err = Error::launch("No activity found");
        assert_eq!(err.to_string(), "No activity found");
    }

    #[test]
    fn test_is_malformed() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(Error::malformed("missing eventName").is_malformed());
        assert!(Error::from(json_err).is_malformed());
        assert!(!Error::config("x").is_malformed());
    }

    #[test]
    fn test_is_collaborator_error() {
        assert!(Error::storage("k", "x").is_collaborator_error());
        assert!(Error::launch("x").is_collaborator_error());
        assert!(Error::app_resolution("x").is_collaborator_error());
        assert!(!Error::HostUnavailable.is_collaborator_error());
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::connection("test").is_connection_error());
        assert!(Error::ConnectionTimeout { timeout_ms: 1000 }.is_connection_error());
        assert!(Error::ConnectionClosed.is_connection_error());
        assert!(!Error::config("test").is_connection_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
