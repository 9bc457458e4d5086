//! Error types for Cloud Files client operations.

use thiserror::Error;

/// Specialized [`Result`] type for Cloud Files operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error type used as the source of transport failures.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for Cloud Files client operations.
///
/// Remote rejections of an otherwise well-formed request (for example a `422`
/// on upload) are not represented here: those are reported through a `false`
/// return value and recorded on the client, see
/// [`StorageClient::last_error`](crate::StorageClient::last_error).
#[derive(Debug, Error)]
#[must_use = "errors should be handled appropriately"]
pub enum Error {
    /// Configuration error.
    ///
    /// Raised for an unrecognized authentication endpoint, a credential
    /// import that is not a structured record, a malformed storage URL, or
    /// missing user/key when authentication is required.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid request arguments, such as an empty container or object name.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The authentication endpoint rejected the supplied credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The underlying transport failed before a response was received.
    #[error("Transport error: {message}")]
    Transport {
        /// Human-readable description of the failure.
        message: String,
        /// Underlying error reported by the HTTP stack, if any.
        #[source]
        source: Option<BoxedError>,
    },

    /// A credential payload could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Creates a new authentication error.
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Creates a new transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
            source: None,
        }
    }

    /// Creates a new transport error that keeps the underlying error as its source.
    pub fn transport_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns whether this error indicates a configuration issue.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Returns whether this error indicates invalid request arguments.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Error::InvalidRequest(_))
    }

    /// Returns whether this error is a transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// Returns whether this error came from the authentication handshake.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::config("The authentication URL should be valid");
        assert_eq!(
            error.to_string(),
            "Configuration error: The authentication URL should be valid"
        );
    }

    #[test]
    fn test_error_predicates() {
        assert!(Error::config("x").is_config_error());
        assert!(Error::invalid_request("x").is_invalid_request());
        assert!(Error::authentication("x").is_authentication());
        assert!(Error::transport("x").is_transport());
        assert!(!Error::transport("x").is_config_error());
    }

    #[test]
    fn test_transport_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = Error::transport_with_source("Connection failed", io);

        assert_eq!(error.to_string(), "Transport error: Connection failed");
        assert_eq!(error.source().map(ToString::to_string).as_deref(), Some("refused"));
        assert!(Error::transport("x").source().is_none());
    }

    #[test]
    fn test_from_serde() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = Error::from(source);
        assert!(matches!(error, Error::Serialization(_)));
    }
}
