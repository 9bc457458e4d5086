#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod error;
mod transport;

pub use crate::config::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS, ReqwestConfig};
pub use crate::error::{Error, Result};
pub use crate::transport::ReqwestTransport;

/// Tracing target for reqwest transport operations.
pub const TRACING_TARGET: &str = "cloudfiles_reqwest::transport";
