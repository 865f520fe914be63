/* src/error.rs */

use thiserror::Error;

/// Result type alias for operations that may fail with `RealIpError`.
pub type Result<T> = std::result::Result<T, RealIpError>;

/// Errors produced by the string-taking helpers and the axum extractor.
///
/// Header extraction itself never fails: a missing address is `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RealIpError {
    /// Text that is not an IPv4 or IPv6 literal.
    #[error("Invalid IP address format: {0:?}")]
    InvalidIpFormat(String),

    /// No proxy header and no peer address yielded an IP.
    #[error("No valid IP address found")]
    NoValidIp,
}
