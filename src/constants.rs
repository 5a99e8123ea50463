//! Application constants and configuration defaults

pub const APP_NAME: &str = "Content Browser";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service root used when neither settings nor environment provide one.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8080/demo/rest";
/// Environment variable overriding the configured service root for a session.
pub const SERVICE_URL_ENV: &str = "CONTENT_SERVICE_URL";

/// Path segments under the service root.
pub const CONTENT_RESOURCE: &str = "content";
pub const BY_TITLE_SEGMENT: &str = "getByTitle";
pub const BY_ID_SEGMENT: &str = "get";

pub const CONNECT_TIMEOUT_SECS: u64 = 10;
pub const MAX_PHOTO_BYTES: usize = 16 * 1024 * 1024;
/// Longest response body excerpt kept in a status error.
pub const ERROR_BODY_SNIPPET: usize = 200;

pub const EMPTY_TITLE_PROMPT: &str = "Please enter a title.";
