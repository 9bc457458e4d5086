//! Reqwest-based implementation of the storage transport.

use std::sync::Arc;

use cloudfiles_core::constants::{
    HEADER_AUTH_KEY, HEADER_AUTH_TOKEN, HEADER_AUTH_USER, HEADER_CDN_MANAGEMENT_URL,
    HEADER_SERVER_MANAGEMENT_URL, HEADER_STORAGE_URL, STATUS_UNAUTHORIZED,
};
use cloudfiles_core::{
    Credentials, Method, ObjectHeaders, Session, StorageRequest, StorageResponse,
    StorageTransport,
};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::{Error, ReqwestConfig, TRACING_TARGET};

/// Inner transport that holds the HTTP client and configuration.
struct ReqwestTransportInner {
    http: Client,
    config: ReqwestConfig,
}

/// Reqwest-based transport for the Cloud Files API.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Examples
///
/// ```rust,ignore
/// use cloudfiles_reqwest::{ReqwestConfig, ReqwestTransport};
///
/// let transport = ReqwestTransport::new(ReqwestConfig::default())?;
/// ```
#[derive(Clone)]
pub struct ReqwestTransport {
    inner: Arc<ReqwestTransportInner>,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Creates a new transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ReqwestConfig) -> cloudfiles_core::Result<Self> {
        let timeout = config.effective_timeout();
        let connect_timeout = config.effective_connect_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = timeout.as_millis(),
            connect_timeout_ms = connect_timeout.as_millis(),
            user_agent = %user_agent,
            "Creating reqwest transport"
        );

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(&user_agent)
            .build()
            .map_err(Error::from)?;

        let inner = ReqwestTransportInner { http, config };

        tracing::info!(
            target: TRACING_TARGET,
            "Reqwest transport created successfully"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Creates a new transport with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_defaults() -> cloudfiles_core::Result<Self> {
        Self::new(ReqwestConfig::default())
    }

    /// Gets the transport configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    fn http(&self) -> &Client {
        &self.inner.http
    }
}

#[async_trait::async_trait]
impl StorageTransport for ReqwestTransport {
    async fn send(&self, request: StorageRequest) -> cloudfiles_core::Result<StorageResponse> {
        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            method = %request.method,
            url = %request.url,
            body_len = request.body.len(),
            "Sending request"
        );

        let headers = header_map(&request.headers)?;
        let mut builder = self
            .http()
            .request(http_method(request.method), request.url)
            .headers(headers);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if !matches!(request.method, Method::Get | Method::Head) || !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET,
                request_id = %request.request_id,
                error = %e,
                "Request failed"
            );
            Error::from(e)
        })?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await.map_err(Error::from)?;

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            status,
            "Received response"
        );

        Ok(StorageResponse {
            status,
            headers,
            body,
        })
    }

    async fn authenticate(&self, credentials: &Credentials) -> cloudfiles_core::Result<Session> {
        let (Some(user), Some(key)) = (credentials.user(), credentials.key()) else {
            return Err(cloudfiles_core::Error::config(
                "Authentication requires both a user and an API key",
            ));
        };

        let auth_url = credentials.auth_endpoint.auth_url();

        tracing::debug!(
            target: TRACING_TARGET,
            auth_url = %auth_url,
            user = %user,
            "Authenticating"
        );

        let response = self
            .http()
            .get(&auth_url)
            .header(HEADER_AUTH_USER, user)
            .header(HEADER_AUTH_KEY, key)
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status().as_u16();
        if status == STATUS_UNAUTHORIZED {
            tracing::warn!(
                target: TRACING_TARGET,
                user = %user,
                "Authentication rejected"
            );
            return Err(cloudfiles_core::Error::authentication(
                "Invalid user name or API key",
            ));
        }
        if !response.status().is_success() {
            return Err(cloudfiles_core::Error::transport(format!(
                "Unexpected authentication status: {status}"
            )));
        }

        let session = session_from_headers(response.headers())?;

        tracing::info!(
            target: TRACING_TARGET,
            storage_url = %session.storage_url,
            "Authentication succeeded"
        );

        Ok(session)
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Put => reqwest::Method::PUT,
        Method::Post => reqwest::Method::POST,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn header_map(headers: &ObjectHeaders) -> Result<HeaderMap, Error> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::InvalidHeader(format!("invalid header name: {name}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| Error::InvalidHeader(format!("invalid value for header {name}")))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Collects response headers.
///
/// Values are decoded lossily: user metadata arrives as raw UTF-8, and a
/// header is never dropped for containing non-ASCII bytes.
fn collect_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_owned(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// Builds a session from the headers of a successful v1.0 handshake.
fn session_from_headers(headers: &HeaderMap) -> cloudfiles_core::Result<Session> {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };

    let token = read(HEADER_AUTH_TOKEN).filter(|token| !token.is_empty());
    let storage_url = read(HEADER_STORAGE_URL).filter(|url| !url.is_empty());
    let (Some(token), Some(storage_url)) = (token, storage_url) else {
        return Err(cloudfiles_core::Error::authentication(
            "Authentication response is missing the token or storage URL",
        ));
    };

    Ok(Session::new(
        token,
        storage_url,
        read(HEADER_CDN_MANAGEMENT_URL).unwrap_or_default(),
        read(HEADER_SERVER_MANAGEMENT_URL).unwrap_or_default(),
    ))
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use cloudfiles_core::{ObjectMetadata, SessionPatch, StorageClient};
    use url::Url;

    use super::*;

    /// Request head and body as received by [`serve_once`].
    struct ReceivedRequest {
        head: String,
        body: Vec<u8>,
    }

    /// Accepts one connection on a local port, records the request and
    /// answers with `response` verbatim.
    fn serve_once(response: &[u8]) -> (String, JoinHandle<ReceivedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = response.to_vec();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];

            let head_end = loop {
                let n = stream.read(&mut chunk).unwrap();
                assert!(n > 0, "connection closed before the request head");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);

            while buf.len() < head_end + content_length {
                let n = stream.read(&mut chunk).unwrap();
                assert!(n > 0, "connection closed before the request body");
                buf.extend_from_slice(&chunk[..n]);
            }

            stream.write_all(&response).unwrap();
            stream.flush().unwrap();

            ReceivedRequest {
                head,
                body: buf[head_end..head_end + content_length].to_vec(),
            }
        });

        (base_url, handle)
    }

    fn client_for(base_url: &str) -> StorageClient {
        let transport = ReqwestTransport::with_defaults().unwrap();
        let mut client = StorageClient::new(transport, Credentials::anonymous());
        client.set_credentials(
            SessionPatch::default()
                .with_token("tok")
                .with_storage_url(format!("{base_url}/v1/acct")),
        );
        client
    }

    fn auth_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-auth-token", HeaderValue::from_static("abc123"));
        headers.insert(
            "x-storage-url",
            HeaderValue::from_static("https://storage101.dfw1.clouddrive.com/v1/MossoCloudFS_1"),
        );
        headers.insert(
            "x-cdn-management-url",
            HeaderValue::from_static("https://cdn1.clouddrive.com/v1/MossoCloudFS_1"),
        );
        headers.insert(
            "x-server-management-url",
            HeaderValue::from_static("https://servers.api.rackspacecloud.com/v1.0/1"),
        );
        headers
    }

    #[test]
    fn test_session_from_headers() {
        let session = session_from_headers(&auth_headers()).unwrap();
        assert_eq!(session.token, "abc123");
        assert_eq!(
            session.storage_url,
            "https://storage101.dfw1.clouddrive.com/v1/MossoCloudFS_1"
        );
        assert_eq!(session.cdn_url, "https://cdn1.clouddrive.com/v1/MossoCloudFS_1");
        assert_eq!(
            session.management_url,
            "https://servers.api.rackspacecloud.com/v1.0/1"
        );
    }

    #[test]
    fn test_session_from_headers_without_optional_urls() {
        let mut headers = auth_headers();
        headers.remove("x-cdn-management-url");
        headers.remove("x-server-management-url");

        let session = session_from_headers(&headers).unwrap();
        assert!(session.is_authenticated());
        assert!(session.cdn_url.is_empty());
        assert!(session.management_url.is_empty());
    }

    #[test]
    fn test_session_from_headers_missing_token() {
        let mut headers = auth_headers();
        headers.remove("x-auth-token");

        let err = session_from_headers(&headers).unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn test_header_map_conversion() {
        let headers = ObjectHeaders::new()
            .with("Content-Type", "text/plain")
            .with("X-Object-Meta-Owner", "alice");

        let map = header_map(&headers).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("content-type").unwrap(), "text/plain");
        assert_eq!(map.get("x-object-meta-owner").unwrap(), "alice");
    }

    #[test]
    fn test_header_map_rejects_invalid_value() {
        let headers = ObjectHeaders::new().with("X-Object-Meta-Note", "line\nbreak");
        let err = header_map(&headers).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }

    #[test]
    fn test_collect_headers_keeps_utf8_values() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-account-meta-owner",
            HeaderValue::from_bytes("caf\u{e9}".as_bytes()).unwrap(),
        );

        let collected = collect_headers(&headers);
        assert_eq!(
            collected,
            [("x-account-meta-owner".to_owned(), "caf\u{e9}".to_owned())]
        );
    }

    #[test]
    fn test_collect_headers() {
        let collected = collect_headers(&auth_headers());
        assert_eq!(collected.len(), 4);
        assert!(
            collected
                .iter()
                .any(|(name, value)| name == "x-auth-token" && value == "abc123")
        );
    }

    #[test]
    fn test_http_method_mapping() {
        assert_eq!(http_method(Method::Put), reqwest::Method::PUT);
        assert_eq!(http_method(Method::Head), reqwest::Method::HEAD);
        assert_eq!(http_method(Method::Post), reqwest::Method::POST);
        assert_eq!(http_method(Method::Get), reqwest::Method::GET);
        assert_eq!(http_method(Method::Delete), reqwest::Method::DELETE);
    }

    #[test]
    fn test_transport_creation() {
        let transport = ReqwestTransport::new(ReqwestConfig::default().with_timeout(5)).unwrap();
        assert_eq!(transport.config().http_timeout, 5);
    }

    #[tokio::test]
    async fn test_authenticate_requires_user_and_key() {
        let transport = ReqwestTransport::with_defaults().unwrap();
        let err = transport
            .authenticate(&Credentials::anonymous())
            .await
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[tokio::test]
    async fn test_store_object_over_http() {
        let (base_url, server) =
            serve_once(b"HTTP/1.1 201 Created\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let mut client = client_for(&base_url);

        let mut metadata = ObjectMetadata::new();
        metadata.insert("color".into(), "blue".into());

        let stored = client
            .store_object("test", "dir/hello world.txt", "hello", Some(&metadata), "text/plain")
            .await
            .unwrap();
        assert!(stored);

        let received = server.join().unwrap();
        assert!(
            received
                .head
                .starts_with("PUT /v1/acct/test/dir%2Fhello%20world.txt HTTP/1.1\r\n"),
            "{}",
            received.head
        );

        let head = received.head.to_ascii_lowercase();
        assert!(head.contains("x-auth-token: tok\r\n"));
        assert!(head.contains("etag: 5d41402abc4b2a76b9719d911017c592\r\n"));
        assert!(head.contains("content-length: 5\r\n"));
        assert!(head.contains("content-type: text/plain\r\n"));
        assert!(head.contains("x-object-meta-color: blue\r\n"));
        assert_eq!(received.body, b"hello");
    }

    #[tokio::test]
    async fn test_store_empty_object_over_http() {
        let (base_url, server) =
            serve_once(b"HTTP/1.1 201 Created\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let mut client = client_for(&base_url);

        let stored = client
            .store_object("test", "empty.txt", "", None, "text/plain")
            .await
            .unwrap();
        assert!(stored);

        let received = server.join().unwrap();
        let head = received.head.to_ascii_lowercase();
        assert!(head.starts_with("put /v1/acct/test/empty.txt http/1.1\r\n"));
        assert!(head.contains("content-length: 0\r\n"));
        assert!(head.contains("etag: d41d8cd98f00b204e9800998ecf8427e\r\n"));
        assert!(received.body.is_empty());
    }

    #[tokio::test]
    async fn test_get_info_account_keeps_utf8_metadata() {
        let response = "HTTP/1.1 204 No Content\r\n\
                        X-Account-Meta-Owner: caf\u{e9}\r\n\
                        X-Account-Bytes-Used: 5\r\n\
                        Connection: close\r\n\r\n";
        let (base_url, server) = serve_once(response.as_bytes());
        let mut client = client_for(&base_url);

        let info = client.get_info_account().await.unwrap().unwrap();
        assert_eq!(info.get("meta-owner").map(String::as_str), Some("caf\u{e9}"));
        assert_eq!(info.get("bytes-used").map(String::as_str), Some("5"));

        let received = server.join().unwrap();
        assert!(received.head.starts_with("HEAD /v1/acct HTTP/1.1\r\n"));
        assert!(received.body.is_empty());
    }

    #[tokio::test]
    async fn test_send_passes_query_and_reads_body() {
        let (base_url, server) = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 11\r\n\
              Connection: close\r\n\r\nhello world",
        );
        let transport = ReqwestTransport::with_defaults().unwrap();

        let url = Url::parse(&format!("{base_url}/v1/acct/test")).unwrap();
        let request = StorageRequest::new(Method::Get, url)
            .with_query("format", "json")
            .with_query("prefix", "a b");
        let response = transport.send(request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("text/plain"));
        assert_eq!(response.body_text(), "hello world");

        let received = server.join().unwrap();
        assert!(
            received
                .head
                .starts_with("GET /v1/acct/test?format=json&prefix=a+b HTTP/1.1\r\n"),
            "{}",
            received.head
        );
    }

    #[tokio::test]
    async fn test_send_returns_rejections_as_responses() {
        let (base_url, server) = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nNot Found",
        );
        let transport = ReqwestTransport::with_defaults().unwrap();

        let url = Url::parse(&format!("{base_url}/v1/acct/test/gone.txt")).unwrap();
        let response = transport
            .send(StorageRequest::new(Method::Delete, url))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert!(!response.is_success());
        assert_eq!(response.body_text(), "Not Found");

        let received = server.join().unwrap();
        assert!(received.head.starts_with("DELETE /v1/acct/test/gone.txt HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn test_connection_failure_keeps_source() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = ReqwestTransport::with_defaults().unwrap();
        let url = Url::parse(&format!("http://{addr}/v1/acct")).unwrap();
        let err = transport
            .send(StorageRequest::new(Method::Head, url))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert!(std::error::Error::source(&err).is_some());
    }
}
