//! Error types for the reqwest transport.

use thiserror::Error;

/// Result type alias for reqwest transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for reqwest transport operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// A header name or value could not be sent over HTTP.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl From<Error> for cloudfiles_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_builder() {
                    cloudfiles_core::Error::config(e.to_string())
                } else if e.is_timeout() {
                    cloudfiles_core::Error::transport_with_source("Request timed out", e)
                } else if e.is_connect() {
                    cloudfiles_core::Error::transport_with_source("Connection failed", e)
                } else {
                    cloudfiles_core::Error::transport_with_source(e.to_string(), e)
                }
            }
            Error::InvalidHeader(msg) => cloudfiles_core::Error::invalid_request(msg),
        }
    }
}
