/* src/address.rs */

use std::net::{IpAddr, SocketAddr};

use crate::error::{RealIpError, Result};
use crate::extractor::validate_ip;

/// Render `ip` and `port` as a socket address string.
///
/// IPv4 gives `host:port`, IPv6 gives `[host]:port`. IPv4-mapped IPv6
/// addresses collapse to their IPv4 form, and IPv6 output uses the
/// compressed canonical notation. The port is written as given.
///
/// # Examples
///
/// ```rust
/// use forwarded_ip::format_address;
///
/// assert_eq!(format_address("192.168.1.1".parse().unwrap(), 8080), "192.168.1.1:8080");
/// assert_eq!(format_address("::1".parse().unwrap(), 80), "[::1]:80");
/// ```
pub fn format_address(ip: IpAddr, port: u16) -> String {
    SocketAddr::new(ip.to_canonical(), port).to_string()
}

/// Parse `ip` and format it with [`format_address`].
pub fn format_address_str(ip: &str, port: u16) -> Result<String> {
    let ip = validate_ip(ip).ok_or_else(|| RealIpError::InvalidIpFormat(ip.to_string()))?;
    Ok(format_address(ip, port))
}
