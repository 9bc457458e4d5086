//! Account credentials and authentication endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{API_VERSION, UK_AUTH_URL, US_AUTH_URL};
use crate::{Error, Result};

/// One of the two recognized authentication endpoints.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthEndpoint {
    /// `https://auth.api.rackspacecloud.com`
    #[default]
    Us,
    /// `https://lon.auth.api.rackspacecloud.com`
    Uk,
}

impl AuthEndpoint {
    /// Resolves an endpoint from its base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for any URL other than the two known endpoints.
    pub fn from_url(url: &str) -> Result<Self> {
        match url {
            US_AUTH_URL => Ok(Self::Us),
            UK_AUTH_URL => Ok(Self::Uk),
            _ => Err(Error::config("The authentication URL should be valid")),
        }
    }

    /// Returns the base URL of this endpoint.
    pub const fn as_url(&self) -> &'static str {
        match self {
            Self::Us => US_AUTH_URL,
            Self::Uk => UK_AUTH_URL,
        }
    }

    /// Returns the versioned URL the authentication handshake is sent to.
    pub fn auth_url(&self) -> String {
        format!("{}/{}", self.as_url(), API_VERSION)
    }
}

impl FromStr for AuthEndpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_url(s)
    }
}

impl fmt::Display for AuthEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_url())
    }
}

/// Cloud Files account credentials.
///
/// Both user and key are optional so a client can be created from a
/// previously exported [`Session`](crate::Session) without them.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// Account user name.
    pub user: Option<String>,

    /// API key. Never serialized.
    #[serde(skip_serializing, default)]
    pub key: Option<String>,

    /// Authentication endpoint.
    #[serde(default)]
    pub auth_endpoint: AuthEndpoint,
}

impl Credentials {
    /// Creates credentials, validating the optional authentication URL.
    ///
    /// A missing URL defaults to the US endpoint.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cloudfiles_core::{AuthEndpoint, Credentials};
    ///
    /// let credentials = Credentials::new(Some("user"), Some("key"), None).unwrap();
    /// assert_eq!(credentials.auth_endpoint, AuthEndpoint::Us);
    ///
    /// assert!(Credentials::new(None::<String>, None::<String>, Some("invalidUrl")).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `auth_url` is not a recognized endpoint.
    pub fn new(
        user: Option<impl Into<String>>,
        key: Option<impl Into<String>>,
        auth_url: Option<&str>,
    ) -> Result<Self> {
        let auth_endpoint = match auth_url {
            Some(url) => AuthEndpoint::from_url(url)?,
            None => AuthEndpoint::Us,
        };

        Ok(Self {
            user: user.map(Into::into),
            key: key.map(Into::into),
            auth_endpoint,
        })
    }

    /// Creates credentials with no user or key against the US endpoint.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Sets the authentication endpoint.
    pub fn with_auth_endpoint(mut self, auth_endpoint: AuthEndpoint) -> Self {
        self.auth_endpoint = auth_endpoint;
        self
    }

    /// Returns the user name.
    #[inline]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Returns the API key.
    #[inline]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns a masked version of the key for logging.
    pub fn key_masked(&self) -> Option<String> {
        self.key.as_ref().map(|key| {
            let len = key.chars().count();
            if len <= 4 {
                "*".repeat(len)
            } else {
                format!("{}***", key.chars().take(4).collect::<String>())
            }
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("key", &self.key_masked())
            .field("auth_endpoint", &self.auth_endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint_is_us() {
        let creds = Credentials::new(None::<String>, None::<String>, None).unwrap();
        assert_eq!(creds.auth_endpoint, AuthEndpoint::Us);
        assert!(creds.user().is_none());
        assert!(creds.key().is_none());
    }

    #[test]
    fn test_known_endpoints() {
        let creds = Credentials::new(Some("user"), Some("key"), Some(UK_AUTH_URL)).unwrap();
        assert_eq!(creds.auth_endpoint, AuthEndpoint::Uk);
        assert_eq!(creds.user(), Some("user"));
        assert_eq!(creds.key(), Some("key"));

        let creds = Credentials::new(Some("user"), Some("key"), Some(US_AUTH_URL)).unwrap();
        assert_eq!(creds.auth_endpoint, AuthEndpoint::Us);
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        for url in ["invalidUrl", "", "https://auth.api.rackspacecloud.com/"] {
            let result = Credentials::new(None::<String>, None::<String>, Some(url));
            assert!(matches!(result, Err(Error::Config(_))), "accepted {url:?}");
        }
    }

    #[test]
    fn test_with_auth_endpoint() {
        let creds = Credentials::new(Some("user"), Some("key"), None)
            .unwrap()
            .with_auth_endpoint(AuthEndpoint::Uk);
        assert_eq!(creds.auth_endpoint.as_url(), UK_AUTH_URL);
        assert_eq!(creds.user(), Some("user"));
    }

    #[test]
    fn test_auth_url() {
        assert_eq!(
            AuthEndpoint::Us.auth_url(),
            "https://auth.api.rackspacecloud.com/v1.0"
        );
        assert_eq!(
            AuthEndpoint::Uk.auth_url(),
            "https://lon.auth.api.rackspacecloud.com/v1.0"
        );
    }

    #[test]
    fn test_endpoint_from_str_and_display() {
        let endpoint: AuthEndpoint = UK_AUTH_URL.parse().unwrap();
        assert_eq!(endpoint, AuthEndpoint::Uk);
        assert_eq!(endpoint.to_string(), UK_AUTH_URL);
    }

    #[test]
    fn test_key_masking() {
        let creds = Credentials::new(Some("user"), Some("0123456789abcdef"), None).unwrap();
        assert_eq!(creds.key_masked().as_deref(), Some("0123***"));

        let debug = format!("{creds:?}");
        assert!(!debug.contains("0123456789abcdef"));

        let short = Credentials::new(Some("user"), Some("abc"), None).unwrap();
        assert_eq!(short.key_masked().as_deref(), Some("***"));
    }

    #[test]
    fn test_key_not_serialized() {
        let creds = Credentials::new(Some("user"), Some("secret"), None).unwrap();
        let json = serde_json::to_string(&creds).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"auth_endpoint\":\"us\""));
    }
}
