//! Cloud Files storage client.
//!
//! [`StorageClient`] owns the account credentials and the current session and
//! issues every request through a [`StorageTransport`](crate::StorageTransport).
//! Object operations live in `objects`, account operations in `account`.

mod account;
mod config;
mod objects;
mod storage_client;

pub use config::{ClientConfig, DirectoryFailurePolicy};
pub use objects::DirectoryOutcome;
pub use storage_client::StorageClient;
