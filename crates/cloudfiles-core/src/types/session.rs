//! Authenticated session state and its import/export record.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Session produced by authentication.
///
/// Serializes to `{ "token", "storageUrl", "cdnUrl", "managementUrl" }`,
/// which is the record used to cache a session across process restarts.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Authentication token sent as `X-Auth-Token`.
    #[serde(default)]
    pub token: String,
    /// Base URL of the storage account.
    #[serde(default)]
    pub storage_url: String,
    /// CDN management URL.
    #[serde(default)]
    pub cdn_url: String,
    /// Server management URL.
    #[serde(default)]
    pub management_url: String,
}

impl Session {
    /// Creates a session from its four fields.
    pub fn new(
        token: impl Into<String>,
        storage_url: impl Into<String>,
        cdn_url: impl Into<String>,
        management_url: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            storage_url: storage_url.into(),
            cdn_url: cdn_url.into(),
            management_url: management_url.into(),
        }
    }

    /// Returns whether the session carries a token.
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Overwrites the fields present in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(token) = patch.token {
            self.token = token;
        }
        if let Some(storage_url) = patch.storage_url {
            self.storage_url = storage_url;
        }
        if let Some(cdn_url) = patch.cdn_url {
            self.cdn_url = cdn_url;
        }
        if let Some(management_url) = patch.management_url {
            self.management_url = management_url;
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("storage_url", &self.storage_url)
            .field("cdn_url", &self.cdn_url)
            .field("management_url", &self.management_url)
            .finish_non_exhaustive()
    }
}

/// Partial session update.
///
/// Only the four session fields are recognized; any other key in the source
/// record is dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdn_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_url: Option<String>,
}

impl SessionPatch {
    /// Decodes a patch from an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `value` is not a JSON object, and
    /// [`Error::Serialization`] if a recognized field is not a string.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::config("Credentials must be a structured record"));
        }

        Ok(Self::deserialize(value)?)
    }

    /// Sets the token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the storage URL.
    pub fn with_storage_url(mut self, storage_url: impl Into<String>) -> Self {
        self.storage_url = Some(storage_url.into());
        self
    }

    /// Sets the CDN management URL.
    pub fn with_cdn_url(mut self, cdn_url: impl Into<String>) -> Self {
        self.cdn_url = Some(cdn_url.into());
        self
    }

    /// Sets the server management URL.
    pub fn with_management_url(mut self, management_url: impl Into<String>) -> Self {
        self.management_url = Some(management_url.into());
        self
    }
}

impl From<Session> for SessionPatch {
    fn from(session: Session) -> Self {
        Self {
            token: Some(session.token),
            storage_url: Some(session.storage_url),
            cdn_url: Some(session.cdn_url),
            management_url: Some(session.management_url),
        }
    }
}
