//! Transport abstraction the client issues its requests through.

use crate::types::{Credentials, Session, StorageRequest, StorageResponse};
use crate::Result;

/// Authenticated HTTP transport used by [`StorageClient`](crate::StorageClient).
///
/// Implement this trait to plug in a concrete HTTP stack. Connection
/// handling, TLS, timeouts and any retry policy belong to the implementation;
/// the client issues exactly one [`send`](Self::send) per operation.
#[async_trait::async_trait]
pub trait StorageTransport: Send + Sync {
    /// Sends a single request and returns the raw response.
    ///
    /// Non-2xx statuses are returned as responses, not errors. An error means
    /// no response was received.
    async fn send(&self, request: StorageRequest) -> Result<StorageResponse>;

    /// Runs the authentication handshake and returns a fresh session.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session>;
}
