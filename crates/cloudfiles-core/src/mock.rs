//! Recording mock transport for testing.
//!
//! [`MockTransport`] records every request it receives and answers with
//! queued responses, falling back to a configurable default. Clones share
//! state, so a test can keep a handle after moving one into a client.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! cloudfiles-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use cloudfiles_core::mock::MockTransport;
//! use cloudfiles_core::{Credentials, StorageClient, StorageResponse};
//!
//! let transport = MockTransport::new();
//! transport.push_response(StorageResponse::new(422));
//!
//! let mut client = StorageClient::new(transport.clone(), Credentials::anonymous());
//! assert!(!client.store_object("test", "hello.txt", "", None, "text/plain").await?);
//! assert_eq!(transport.requests().len(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::types::{Credentials, Session, StorageRequest, StorageResponse};
use crate::{Error, Result, StorageTransport};

/// Session returned by a default [`MockTransport`].
pub fn mock_session() -> Session {
    Session::new(
        "mock-token",
        "https://storage.example.com/v1/MossoCloudFS_mock",
        "https://cdn.example.com/v1/MossoCloudFS_mock",
        "https://servers.example.com/v1.0/mock",
    )
}

#[derive(Debug)]
struct MockState {
    requests: Vec<StorageRequest>,
    responses: VecDeque<StorageResponse>,
    default_response: StorageResponse,
    session: Session,
    reject_authentication: bool,
    auth_calls: usize,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            responses: VecDeque::new(),
            default_response: StorageResponse::new(201),
            session: mock_session(),
            reject_authentication: false,
            auth_calls: 0,
        }
    }
}

/// In-memory [`StorageTransport`] that records requests.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Creates a mock answering `201` to every request.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the session returned by `authenticate`.
    pub fn with_session(self, session: Session) -> Self {
        self.state().session = session;
        self
    }

    /// Sets the response used once the queue is empty.
    pub fn with_default_response(self, response: StorageResponse) -> Self {
        self.state().default_response = response;
        self
    }

    /// Makes `authenticate` fail with [`Error::Authentication`].
    pub fn reject_authentication(self) -> Self {
        self.state().reject_authentication = true;
        self
    }

    /// Queues a response for the next request.
    pub fn push_response(&self, response: StorageResponse) {
        self.state().responses.push_back(response);
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<StorageRequest> {
        self.state().requests.clone()
    }

    /// Returns the last request received.
    pub fn last_request(&self) -> Option<StorageRequest> {
        self.state().requests.last().cloned()
    }

    /// Returns how many times `authenticate` was called.
    pub fn auth_calls(&self) -> usize {
        self.state().auth_calls
    }
}

#[async_trait::async_trait]
impl StorageTransport for MockTransport {
    async fn send(&self, request: StorageRequest) -> Result<StorageResponse> {
        let mut state = self.state();
        state.requests.push(request);
        let response = match state.responses.pop_front() {
            Some(response) => response,
            None => state.default_response.clone(),
        };
        Ok(response)
    }

    async fn authenticate(&self, _credentials: &Credentials) -> Result<Session> {
        let mut state = self.state();
        state.auth_calls += 1;
        if state.reject_authentication {
            return Err(Error::authentication("mock transport rejects credentials"));
        }
        Ok(state.session.clone())
    }
}
