//! Client behaviour configuration.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// What pseudo-directory creation does when one level fails to upload.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DirectoryFailurePolicy {
    /// Keep creating deeper levels after a failure.
    #[default]
    BestEffort,
    /// Stop at the first level that fails.
    FailFast,
}

/// Configuration for a [`StorageClient`](crate::StorageClient).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Failure handling for
    /// [`create_pseudo_directory`](crate::StorageClient::create_pseudo_directory).
    #[serde(default)]
    pub directory_failure_policy: DirectoryFailurePolicy,
}

impl ClientConfig {
    /// Sets the pseudo-directory failure policy.
    #[must_use]
    pub fn with_directory_failure_policy(mut self, policy: DirectoryFailurePolicy) -> Self {
        self.directory_failure_policy = policy;
        self
    }
}
