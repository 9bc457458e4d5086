//! Protocol constants for the Cloud Files v1.0 API.

/// US authentication endpoint.
pub const US_AUTH_URL: &str = "https://auth.api.rackspacecloud.com";
/// UK authentication endpoint.
pub const UK_AUTH_URL: &str = "https://lon.auth.api.rackspacecloud.com";
/// Authentication API version appended to the endpoint.
pub const API_VERSION: &str = "v1.0";

pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_CONTENT_LENGTH: &str = "Content-Length";
pub const HEADER_CONTENT_DISPOSITION: &str = "Content-Disposition";
/// Integrity checksum header, carries the hex MD5 of the body.
pub const HEADER_HASH: &str = "ETag";
pub const HEADER_OBJECT_DELETE_AT: &str = "X-Delete-At";
pub const HEADER_OBJECT_DELETE_AFTER: &str = "X-Delete-After";

pub const HEADER_AUTH_USER: &str = "X-Auth-User";
pub const HEADER_AUTH_KEY: &str = "X-Auth-Key";
pub const HEADER_AUTH_TOKEN: &str = "X-Auth-Token";
pub const HEADER_STORAGE_URL: &str = "X-Storage-Url";
pub const HEADER_CDN_MANAGEMENT_URL: &str = "X-CDN-Management-Url";
pub const HEADER_SERVER_MANAGEMENT_URL: &str = "X-Server-Management-Url";

/// Prefix for user metadata headers on objects.
pub const METADATA_OBJECT_HEADER: &str = "X-Object-Meta-";
/// Prefix for account-level headers.
pub const METADATA_ACCOUNT_HEADER: &str = "X-Account-";
/// Account secret used to sign temporary URLs.
pub const ACCOUNT_TEMP_URL_KEY: &str = "X-Account-Meta-Temp-Url-Key";

/// Content type of pseudo-directory marker objects.
pub const CONTENT_TYPE_DIRECTORY: &str = "application/directory";

pub const STATUS_CREATED: u16 = 201;
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_PRECONDITION_FAILED: u16 = 412;
pub const STATUS_UNPROCESSABLE_ENTITY: u16 = 422;

pub const ERROR_PARAM_NO_NAME_CONTAINER: &str = "You must specify the container name";
pub const ERROR_PARAM_NO_NAME_OBJECT: &str = "You must specify the object name";
pub const ERROR_OBJECT_MISSING_PARAM: &str =
    "Missing Content-Length or Content-Type header in the request";
pub const ERROR_OBJECT_CHECKSUM: &str = "Checksum of the file content failed";
