#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging
pub const TRACING_TARGET_CLIENT: &str = "cloudfiles_core::client";
pub const TRACING_TARGET_OBJECTS: &str = "cloudfiles_core::objects";
pub const TRACING_TARGET_ACCOUNT: &str = "cloudfiles_core::account";

mod client;
mod error;
mod transport;

pub mod constants;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use crate::client::{ClientConfig, DirectoryFailurePolicy, DirectoryOutcome, StorageClient};
pub use crate::error::{BoxedError, Error, Result};
pub use crate::transport::StorageTransport;
pub use crate::types::{
    AuthEndpoint, Credentials, Method, ObjectHeaders, ObjectMetadata, RemoteError, Session,
    SessionPatch, StorageRequest, StorageResponse, UploadHeaders,
};
