/* src/lib.rs */
//! # Forwarded IP
//!
//! Finds the real client IP address in headers set by reverse proxies and
//! formats IP/port pairs as socket address strings.
//!
//! ## Features
//!
//! - Checks `X-Real-IP`, `X-Forwarded-For`, `CF-Connecting-IP` and
//!   `True-Client-IP`, in that order
//! - Skips malformed entries inside an `X-Forwarded-For` chain
//! - Formats `host:port` with IPv6 bracketing and canonical notation
//! - Works with plain maps, header pair slices and `http::HeaderMap`
//!   (`http` feature)
//! - Optional Axum middleware and extractor via the `axum` feature
//!
//! The headers are taken at face value. Only rely on them when a trusted
//! proxy in front of the service overwrites them.
//!
//! ## Examples
//!
//! ```rust
//! use forwarded_ip::{format_address, real_ip_from_headers, HeaderMap};
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("x-forwarded-for".to_string(), "unknown, 2001:db8::1".to_string());
//!
//! let ip = real_ip_from_headers(&headers).unwrap();
//! assert_eq!(format_address(ip, 443), "[2001:db8::1]:443");
//! ```

pub mod address;
pub mod error;
pub mod extractor;
pub mod headers;

#[cfg(feature = "axum")]
pub mod middleware;

pub use address::{format_address, format_address_str};
pub use error::{RealIpError, Result};
pub use extractor::{
    CF_CONNECTING_IP, ForwardHeader, HeaderKind, IpExtractor, REAL_IP_HEADERS, TRUE_CLIENT_IP,
    X_FORWARDED_FOR, X_REAL_IP, extract_real_ip, real_ip_from_headers, validate_ip,
};
pub use headers::{HeaderMap, HeaderSource};

#[cfg(feature = "axum")]
pub use middleware::{RealIp, RealIpLayer, RealIpService};

/// Re-export commonly used types
pub use std::net::IpAddr;
