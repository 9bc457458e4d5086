//! Transport-level request type.

use bytes::Bytes;
use strum::{AsRefStr, Display};
use url::Url;
use uuid::Uuid;

use super::ObjectHeaders;

/// HTTP methods used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Put,
    Post,
    Delete,
}

/// A single request handed to a [`StorageTransport`](crate::StorageTransport).
#[derive(Debug, Clone)]
pub struct StorageRequest {
    /// Identifier used to correlate log records.
    pub request_id: Uuid,
    /// HTTP method.
    pub method: Method,
    /// Fully-resolved target URL.
    pub url: Url,
    /// Request headers.
    pub headers: ObjectHeaders,
    /// Query string parameters.
    pub query: Vec<(String, String)>,
    /// Request body.
    pub body: Bytes,
}

impl StorageRequest {
    /// Creates a request with no headers, query or body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            method,
            url,
            headers: ObjectHeaders::new(),
            query: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Replaces the request headers.
    pub fn with_headers(mut self, headers: ObjectHeaders) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Adds a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}
