//! Object uploads, header updates and pseudo-directories.

use bytes::Bytes;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::{DirectoryFailurePolicy, StorageClient};
use crate::constants::{
    CONTENT_TYPE_DIRECTORY, ERROR_OBJECT_CHECKSUM, ERROR_OBJECT_MISSING_PARAM,
    ERROR_PARAM_NO_NAME_CONTAINER, ERROR_PARAM_NO_NAME_OBJECT, HEADER_CONTENT_LENGTH, HEADER_HASH,
    STATUS_CREATED, STATUS_PRECONDITION_FAILED, STATUS_UNPROCESSABLE_ENTITY,
};
use crate::types::{
    Method, ObjectHeaders, ObjectMetadata, RemoteError, StorageRequest, UploadHeaders,
};
use crate::{Error, Result, TRACING_TARGET_OBJECTS};

/// Result of creating one level of a pseudo-directory path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryOutcome {
    /// Cumulative path of this level, e.g. `home/user1`.
    pub path: String,
    /// Whether the marker object was stored.
    pub created: bool,
    /// Rejection reported for this level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RemoteError>,
}

impl StorageClient {
    /// Uploads `content` as `container/object`.
    ///
    /// `headers` is either a bare content type or a full header map. Each
    /// `metadata` entry is sent as `X-Object-Meta-{key}`. `ETag` and
    /// `Content-Length` are always computed from `content` and replace any
    /// caller-supplied value.
    ///
    /// `content` takes owned buffers (`Vec<u8>`, `String`, `Bytes`) without
    /// copying. Borrowed slices only convert when they are `'static`; copy a
    /// shorter-lived buffer with [`Bytes::copy_from_slice`] first.
    ///
    /// Returns `Ok(true)` on `201 Created`. Any other status returns
    /// `Ok(false)` and is recorded in [`last_error`](Self::last_error).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if `container` or `object` is empty,
    /// before any request is made.
    #[instrument(
        skip(self, content, metadata, headers),
        target = TRACING_TARGET_OBJECTS,
        fields(container = %container, object = %object)
    )]
    pub async fn store_object(
        &mut self,
        container: &str,
        object: &str,
        content: impl Into<Bytes>,
        metadata: Option<&ObjectMetadata>,
        headers: impl Into<UploadHeaders>,
    ) -> Result<bool> {
        let mut headers = headers.into().into_headers();
        validate_object_path(container, object)?;

        if let Some(metadata) = metadata {
            headers.extend_metadata(metadata);
        }

        let content = content.into();
        headers.insert(HEADER_HASH, hex::encode(Md5::digest(&content)));
        headers.insert(HEADER_CONTENT_LENGTH, content.len().to_string());

        self.ensure_session().await?;
        let url = self.object_url(container, object)?;

        debug!(
            target: TRACING_TARGET_OBJECTS,
            size = content.len(),
            header_count = headers.len(),
            "Storing object"
        );

        let size = content.len();
        let request = StorageRequest::new(Method::Put, url)
            .with_headers(headers)
            .with_body(content);
        let response = self.dispatch(request).await?;

        let message = match response.status {
            STATUS_CREATED => {
                info!(
                    target: TRACING_TARGET_OBJECTS,
                    size,
                    "Object stored successfully"
                );
                return Ok(true);
            }
            STATUS_PRECONDITION_FAILED => ERROR_OBJECT_MISSING_PARAM.to_owned(),
            STATUS_UNPROCESSABLE_ENTITY => ERROR_OBJECT_CHECKSUM.to_owned(),
            _ => response.body_text(),
        };

        warn!(
            target: TRACING_TARGET_OBJECTS,
            status = response.status,
            error = %message,
            "Object upload rejected"
        );
        self.record_failure(response.status, message);

        Ok(false)
    }

    /// Creates a zero-byte `application/directory` marker for every prefix
    /// of `pathname`, shallowest first.
    ///
    /// `"a/b/c"` stores `a`, `a/b` and `a/b/c`. Leading slashes and empty
    /// segments are ignored. Levels created before a failure are kept. With
    /// [`DirectoryFailurePolicy::FailFast`] no deeper level is attempted after
    /// the first failure; with [`DirectoryFailurePolicy::BestEffort`] every
    /// level is attempted.
    ///
    /// Returns one [`DirectoryOutcome`] per attempted level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if `container` is empty or
    /// `pathname` has no segments. Transport errors abort the loop.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(container = %container))]
    pub async fn create_pseudo_directory(
        &mut self,
        container: &str,
        pathname: &str,
    ) -> Result<Vec<DirectoryOutcome>> {
        validate_object_path(container, pathname)?;

        let paths = directory_paths(pathname);
        if paths.is_empty() {
            return Err(Error::invalid_request(ERROR_PARAM_NO_NAME_OBJECT));
        }

        let policy = self.config().directory_failure_policy;
        let mut outcomes = Vec::with_capacity(paths.len());

        for path in paths {
            let created = self
                .store_object(container, &path, Bytes::new(), None, CONTENT_TYPE_DIRECTORY)
                .await?;
            let error = if created {
                None
            } else {
                self.last_error().cloned()
            };

            outcomes.push(DirectoryOutcome {
                path,
                created,
                error,
            });

            if !created && policy == DirectoryFailurePolicy::FailFast {
                warn!(
                    target: TRACING_TARGET_OBJECTS,
                    attempted = outcomes.len(),
                    "Stopping pseudo-directory creation after failure"
                );
                break;
            }
        }

        Ok(outcomes)
    }

    /// Applies `headers` to an existing object with a metadata update.
    ///
    /// Returns whether the response was 2xx. Unlike
    /// [`store_object`](Self::store_object) the names are not checked for
    /// emptiness; the service decides.
    #[instrument(
        skip(self, headers),
        target = TRACING_TARGET_OBJECTS,
        fields(container = %container, object = %object)
    )]
    pub async fn set_object_headers(
        &mut self,
        container: &str,
        object: &str,
        headers: ObjectHeaders,
    ) -> Result<bool> {
        self.ensure_session().await?;
        let url = self.object_url(container, object)?;

        let request = StorageRequest::new(Method::Post, url).with_headers(headers);
        let response = self.dispatch(request).await?;

        Ok(response.is_success())
    }
}

fn validate_object_path(container: &str, object: &str) -> Result<()> {
    if container.is_empty() {
        return Err(Error::invalid_request(ERROR_PARAM_NO_NAME_CONTAINER));
    }
    if object.is_empty() {
        return Err(Error::invalid_request(ERROR_PARAM_NO_NAME_OBJECT));
    }
    Ok(())
}

/// Expands `a/b/c` into `["a", "a/b", "a/b/c"]`.
fn directory_paths(pathname: &str) -> Vec<String> {
    if !pathname.contains('/') {
        return vec![pathname.to_owned()];
    }

    let mut paths = Vec::new();
    let mut current = String::new();
    for segment in pathname
        .trim_start_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
    {
        if !current.is_empty() {
            current.push('/');
        }
        current.push_str(segment);
        paths.push(current.clone());
    }
    paths
}
