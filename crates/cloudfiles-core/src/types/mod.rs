//! Data types shared by the client and its transports.

mod credentials;
mod headers;
mod request;
mod response;
mod session;

pub use credentials::{AuthEndpoint, Credentials};
pub use headers::{ObjectHeaders, ObjectMetadata, UploadHeaders};
pub use request::{Method, StorageRequest};
pub use response::{RemoteError, StorageResponse};
pub use session::{Session, SessionPatch};
