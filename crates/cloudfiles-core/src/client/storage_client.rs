//! Client state, construction, authentication and session import/export.

use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use super::ClientConfig;
use crate::constants::HEADER_AUTH_TOKEN;
use crate::types::{
    AuthEndpoint, Credentials, RemoteError, Session, SessionPatch, StorageRequest,
    StorageResponse,
};
use crate::{Error, Result, StorageTransport, TRACING_TARGET_CLIENT};

/// Cloud Files storage client.
///
/// Holds the account credentials, the current [`Session`] and the last
/// remote rejection. Construction never touches the network; the session is
/// obtained lazily on the first request unless one was imported with
/// [`set_credentials`](Self::set_credentials).
///
/// Operations that record state take `&mut self`. Share a client across
/// tasks only behind a lock, or give each task its own instance.
///
/// # Examples
///
/// ```rust,ignore
/// use cloudfiles_core::{Credentials, StorageClient};
/// use cloudfiles_reqwest::ReqwestTransport;
///
/// let credentials = Credentials::new(Some("user"), Some("api-key"), None)?;
/// let mut client = StorageClient::new(ReqwestTransport::with_defaults()?, credentials);
///
/// client.create_pseudo_directory("backups", "2024/01").await?;
/// let stored = client
///     .store_object("backups", "2024/01/db.sql", dump, None, "application/sql")
///     .await?;
/// ```
#[derive(Clone)]
pub struct StorageClient {
    transport: Arc<dyn StorageTransport>,
    credentials: Credentials,
    session: Session,
    config: ClientConfig,
    last_error: Option<RemoteError>,
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient")
            .field("credentials", &self.credentials)
            .field("session", &self.session)
            .field("config", &self.config)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl StorageClient {
    /// Creates a client with the default configuration.
    pub fn new(transport: impl StorageTransport + 'static, credentials: Credentials) -> Self {
        Self::with_config(transport, credentials, ClientConfig::default())
    }

    /// Creates a client with the given configuration.
    pub fn with_config(
        transport: impl StorageTransport + 'static,
        credentials: Credentials,
        config: ClientConfig,
    ) -> Self {
        Self::from_shared(Arc::new(transport), credentials, config)
    }

    /// Creates a client over an already shared transport.
    pub fn from_shared(
        transport: Arc<dyn StorageTransport>,
        credentials: Credentials,
        config: ClientConfig,
    ) -> Self {
        debug!(
            target: TRACING_TARGET_CLIENT,
            auth_endpoint = %credentials.auth_endpoint,
            has_user = credentials.user.is_some(),
            "Creating storage client"
        );

        Self {
            transport,
            credentials,
            session: Session::default(),
            config,
            last_error: None,
        }
    }

    /// Returns the account user name.
    #[inline]
    pub fn user(&self) -> Option<&str> {
        self.credentials.user()
    }

    /// Returns the API key.
    #[inline]
    pub fn key(&self) -> Option<&str> {
        self.credentials.key()
    }

    /// Returns the authentication endpoint.
    #[inline]
    pub fn auth_endpoint(&self) -> AuthEndpoint {
        self.credentials.auth_endpoint
    }

    /// Returns the current session token.
    #[inline]
    pub fn token(&self) -> &str {
        &self.session.token
    }

    /// Returns the storage account base URL.
    #[inline]
    pub fn storage_url(&self) -> &str {
        &self.session.storage_url
    }

    /// Returns the CDN management URL.
    #[inline]
    pub fn cdn_url(&self) -> &str {
        &self.session.cdn_url
    }

    /// Returns the server management URL.
    #[inline]
    pub fn management_url(&self) -> &str {
        &self.session.management_url
    }

    /// Returns the most recent remote rejection, if any.
    ///
    /// This is only overwritten by the next failure, never cleared by a
    /// success.
    #[inline]
    pub fn last_error(&self) -> Option<&RemoteError> {
        self.last_error.as_ref()
    }

    /// Returns the client configuration.
    #[inline]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the underlying transport.
    #[inline]
    pub fn transport(&self) -> &Arc<dyn StorageTransport> {
        &self.transport
    }

    /// Authenticates against the configured endpoint and replaces the session.
    ///
    /// # Errors
    ///
    /// Propagates any error from the transport's handshake.
    pub async fn authenticate(&mut self) -> Result<()> {
        debug!(
            target: TRACING_TARGET_CLIENT,
            auth_endpoint = %self.credentials.auth_endpoint,
            "Authenticating"
        );

        let session = self.transport.authenticate(&self.credentials).await?;
        self.session = session;

        info!(
            target: TRACING_TARGET_CLIENT,
            storage_url = %self.session.storage_url,
            "Authenticated successfully"
        );

        Ok(())
    }

    /// Imports previously exported session fields.
    ///
    /// Only the fields present in `patch` are overwritten. Importing a
    /// non-empty token skips authentication on the next request.
    pub fn set_credentials(&mut self, patch: impl Into<SessionPatch>) -> &mut Self {
        self.session.apply(patch.into());
        self
    }

    /// Imports session fields from an untyped record.
    ///
    /// Keys other than `token`, `storageUrl`, `cdnUrl` and `managementUrl`
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `value` is not a JSON object.
    pub fn set_credentials_value(&mut self, value: &serde_json::Value) -> Result<&mut Self> {
        let patch = SessionPatch::from_value(value)?;
        Ok(self.set_credentials(patch))
    }

    /// Exports the current session.
    pub fn get_credentials(&self) -> Session {
        self.session.clone()
    }

    /// Records a remote rejection.
    pub(crate) fn record_failure(&mut self, code: u16, message: impl Into<String>) {
        self.last_error = Some(RemoteError::new(code, message));
    }

    /// Authenticates if no session token is held yet.
    pub(crate) async fn ensure_session(&mut self) -> Result<()> {
        if !self.session.is_authenticated() {
            self.authenticate().await?;
        }
        Ok(())
    }

    /// Returns the account base URL.
    pub(crate) fn account_url(&self) -> Result<Url> {
        parse_storage_url(&self.session.storage_url)
    }

    /// Returns `{storage_url}/{container}/{object}` with both names percent-encoded.
    pub(crate) fn object_url(&self, container: &str, object: &str) -> Result<Url> {
        let url = format!(
            "{}/{}/{}",
            self.session.storage_url,
            urlencoding::encode(container),
            urlencoding::encode(object)
        );
        parse_storage_url(&url)
    }

    /// Attaches the session token and sends the request.
    pub(crate) async fn dispatch(&self, request: StorageRequest) -> Result<StorageResponse> {
        let request = request.with_header(HEADER_AUTH_TOKEN, self.session.token.clone());

        debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            method = %request.method,
            url = %request.url,
            "Sending request"
        );

        let response = self.transport.send(request).await?;

        debug!(
            target: TRACING_TARGET_CLIENT,
            status = response.status,
            success = response.is_success(),
            "Request completed"
        );

        Ok(response)
    }
}

fn parse_storage_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| Error::config(format!("Invalid storage URL '{url}': {e}")))
}
