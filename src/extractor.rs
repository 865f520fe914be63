/* src/extractor.rs */

use std::borrow::Cow;
use std::net::IpAddr;

use tracing::{debug, trace};

use crate::headers::HeaderSource;

/// How the value of a forwarding header is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// The whole value must be one IP literal.
    Single,
    /// Comma-separated chain, client first. Entries are trimmed and the first
    /// one that parses wins; malformed entries are skipped.
    List,
}

/// A header consulted during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardHeader {
    name: Cow<'static, str>,
    kind: HeaderKind,
}

impl ForwardHeader {
    /// Header carrying a single address.
    pub const fn single(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            kind: HeaderKind::Single,
        }
    }

    /// Header carrying a comma-separated chain of addresses.
    pub const fn list(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            kind: HeaderKind::List,
        }
    }

    /// Header with a name only known at runtime.
    pub fn custom(name: impl Into<String>, kind: HeaderKind) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> HeaderKind {
        self.kind
    }

    /// Pick the client address out of one raw value of this header.
    pub fn resolve(&self, value: &str) -> Option<IpAddr> {
        match self.kind {
            HeaderKind::Single => {
                let ip = validate_ip(value);
                if ip.is_none() {
                    trace!(header = %self.name, value, "ignoring malformed address");
                }
                ip
            }
            HeaderKind::List => {
                for candidate in value.split(',').map(str::trim) {
                    if let Some(ip) = validate_ip(candidate) {
                        return Some(ip);
                    }
                    trace!(header = %self.name, candidate, "skipping malformed chain entry");
                }
                None
            }
        }
    }
}

/// Nginx `proxy_set_header X-Real-IP`.
pub const X_REAL_IP: ForwardHeader = ForwardHeader::single("X-Real-IP");
/// De facto forwarding chain appended by each proxy.
pub const X_FORWARDED_FOR: ForwardHeader = ForwardHeader::list("X-Forwarded-For");
/// Cloudflare.
pub const CF_CONNECTING_IP: ForwardHeader = ForwardHeader::single("CF-Connecting-IP");
/// Akamai and Cloudflare Enterprise.
pub const TRUE_CLIENT_IP: ForwardHeader = ForwardHeader::single("True-Client-IP");

/// Headers checked by default, highest priority first.
pub const REAL_IP_HEADERS: [ForwardHeader; 4] =
    [X_REAL_IP, X_FORWARDED_FOR, CF_CONNECTING_IP, TRUE_CLIENT_IP];

/// Parse a candidate as an IPv4 or IPv6 literal.
///
/// Purely syntactic: private, loopback and multicast addresses are accepted.
/// Surrounding whitespace is not stripped.
///
/// ```rust
/// use forwarded_ip::validate_ip;
///
/// assert!(validate_ip("10.0.0.5").is_some());
/// assert!(validate_ip("fe80::1").is_some());
/// assert!(validate_ip("").is_none());
/// assert!(validate_ip("10.0.0.256").is_none());
/// ```
pub fn validate_ip(candidate: &str) -> Option<IpAddr> {
    if candidate.is_empty() {
        return None;
    }
    candidate.parse().ok()
}

fn first_match<'r, H>(
    rules: &'r [ForwardHeader],
    headers: &H,
) -> Option<(IpAddr, &'r ForwardHeader)>
where
    H: HeaderSource + ?Sized,
{
    rules.iter().find_map(|rule| {
        let value = headers.first_value(rule.name())?;
        let ip = rule.resolve(value)?;
        debug!(header = %rule.name, %ip, "resolved client address from proxy header");
        Some((ip, rule))
    })
}

/// Ordered set of proxy headers to consult.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpExtractor {
    /// Headers to check for the real IP, in order of preference.
    pub headers: Vec<ForwardHeader>,
}

impl Default for IpExtractor {
    fn default() -> Self {
        Self {
            headers: REAL_IP_HEADERS.to_vec(),
        }
    }
}

impl IpExtractor {
    /// Create an extractor that checks [`REAL_IP_HEADERS`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the header list.
    pub fn with_headers(mut self, headers: Vec<ForwardHeader>) -> Self {
        self.headers = headers;
        self
    }

    /// Append a header with the lowest priority.
    pub fn push_header(mut self, header: ForwardHeader) -> Self {
        self.headers.push(header);
        self
    }

    /// First valid address found in the configured headers.
    pub fn extract<H>(&self, headers: &H) -> Option<IpAddr>
    where
        H: HeaderSource + ?Sized,
    {
        first_match(&self.headers, headers).map(|(ip, _)| ip)
    }

    /// Like [`extract`](Self::extract), also reporting which header matched.
    pub fn extract_with_source<H>(&self, headers: &H) -> Option<(IpAddr, &ForwardHeader)>
    where
        H: HeaderSource + ?Sized,
    {
        first_match(&self.headers, headers)
    }

    /// Extract from headers, falling back to `fallback` (usually the peer address).
    pub fn extract_or<H>(&self, headers: &H, fallback: Option<IpAddr>) -> Option<IpAddr>
    where
        H: HeaderSource + ?Sized,
    {
        self.extract(headers).or(fallback)
    }
}

/// Find the client address in the default proxy headers.
///
/// Checks `X-Real-IP`, `X-Forwarded-For`, `CF-Connecting-IP` and
/// `True-Client-IP` in that order. Nothing here authenticates the headers;
/// only trust them behind a proxy that overwrites them.
///
/// # Examples
///
/// ```rust
/// use forwarded_ip::{real_ip_from_headers, HeaderMap};
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for".to_string(), "bad, 10.0.0.5, 8.8.8.8".to_string());
///
/// assert_eq!(real_ip_from_headers(&headers), Some("10.0.0.5".parse().unwrap()));
/// ```
pub fn real_ip_from_headers<H>(headers: &H) -> Option<IpAddr>
where
    H: HeaderSource + ?Sized,
{
    first_match(&REAL_IP_HEADERS, headers).map(|(ip, _)| ip)
}

/// Default extraction with a fallback address for when no header matches.
///
/// # Arguments
///
/// * `headers` - Request headers
/// * `fallback_ip` - Usually the remote socket address
pub fn extract_real_ip<H>(headers: &H, fallback_ip: Option<IpAddr>) -> Option<IpAddr>
where
    H: HeaderSource + ?Sized,
{
    real_ip_from_headers(headers).or(fallback_ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::HeaderMap;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_no_ip_found() {
        assert_eq!(real_ip_from_headers(&HeaderMap::new()), None);

        let unrelated = headers(&[("host", "example.com"), ("x-client-ip", "192.0.2.1")]);
        assert_eq!(real_ip_from_headers(&unrelated), None);
    }

    #[test]
    fn test_x_real_ip_wins() {
        let h = headers(&[
            ("x-real-ip", "192.168.1.100"),
            ("x-forwarded-for", "203.0.113.1"),
            ("cf-connecting-ip", "198.51.100.1"),
            ("true-client-ip", "192.0.2.1"),
        ]);
        assert_eq!(real_ip_from_headers(&h), Some(ip("192.168.1.100")));
    }

    #[test]
    fn test_forwarded_for_skips_invalid_entries() {
        let h = headers(&[("x-forwarded-for", "bad, 10.0.0.5, 8.8.8.8")]);
        assert_eq!(real_ip_from_headers(&h), Some(ip("10.0.0.5")));

        let h = headers(&[("x-forwarded-for", " , ,  2001:db8::7 ,10.0.0.1")]);
        assert_eq!(real_ip_from_headers(&h), Some(ip("2001:db8::7")));
    }

    #[test]
    fn test_fallback_order() {
        let h = headers(&[
            ("x-real-ip", "garbage"),
            ("x-forwarded-for", "unknown, also-bad"),
            ("cf-connecting-ip", "198.51.100.42"),
            ("true-client-ip", "192.0.2.9"),
        ]);
        assert_eq!(real_ip_from_headers(&h), Some(ip("198.51.100.42")));

        let h = headers(&[("cf-connecting-ip", ""), ("true-client-ip", "192.0.2.9")]);
        assert_eq!(real_ip_from_headers(&h), Some(ip("192.0.2.9")));
    }

    #[test]
    fn test_single_value_headers_are_not_split_or_trimmed() {
        let h = headers(&[("x-real-ip", "203.0.113.1, 203.0.113.2")]);
        assert_eq!(real_ip_from_headers(&h), None);

        let h = headers(&[("true-client-ip", " 203.0.113.1")]);
        assert_eq!(real_ip_from_headers(&h), None);
    }

    #[test]
    fn test_no_semantic_filtering() {
        for addr in ["127.0.0.1", "10.1.2.3", "224.0.0.1", "::1", "fe80::1", "0.0.0.0"] {
            let h = headers(&[("x-real-ip", addr)]);
            assert_eq!(real_ip_from_headers(&h), Some(ip(addr)), "{addr}");
        }
    }

    #[test]
    fn test_header_names_case_insensitive() {
        let h = headers(&[("X-FORWARDED-FOR", "203.0.113.5")]);
        assert_eq!(real_ip_from_headers(&h), Some(ip("203.0.113.5")));

        let pairs = [("Cf-Connecting-Ip", "2001:db8::2")];
        assert_eq!(real_ip_from_headers(&pairs), Some(ip("2001:db8::2")));
    }

    #[test]
    fn test_default_header_order() {
        let defaults = REAL_IP_HEADERS;
        let names: Vec<&str> = defaults.iter().map(ForwardHeader::name).collect();
        assert_eq!(
            names,
            ["X-Real-IP", "X-Forwarded-For", "CF-Connecting-IP", "True-Client-IP"]
        );
        assert_eq!(X_FORWARDED_FOR.kind(), HeaderKind::List);
        assert!(
            defaults
                .iter()
                .filter(|h| h.name() != "X-Forwarded-For")
                .all(|h| h.kind() == HeaderKind::Single)
        );
    }

    #[test]
    fn test_resolve_per_entry() {
        assert_eq!(X_REAL_IP.resolve("203.0.113.1"), Some(ip("203.0.113.1")));
        assert_eq!(X_REAL_IP.resolve(""), None);
        assert_eq!(X_FORWARDED_FOR.resolve(""), None);
        assert_eq!(X_FORWARDED_FOR.resolve("a,b,c"), None);
        assert_eq!(CF_CONNECTING_IP.resolve("::ffff:192.0.2.1"), Some(ip("::ffff:192.0.2.1")));
        assert_eq!(TRUE_CLIENT_IP.resolve("1.2.3"), None);
    }

    #[test]
    fn test_fallback_ip() {
        let fallback = Some(ip("127.0.0.1"));
        assert_eq!(extract_real_ip(&HeaderMap::new(), fallback), fallback);

        let h = headers(&[("x-real-ip", "203.0.113.7")]);
        assert_eq!(extract_real_ip(&h, fallback), Some(ip("203.0.113.7")));
        assert_eq!(IpExtractor::new().extract_or(&HeaderMap::new(), None), None);
    }

    #[test]
    fn test_custom_extractor() {
        let h = headers(&[
            ("x-client-ip", "198.51.100.3"),
            ("x-real-ip", "192.168.1.50"),
            ("forwarded-for", "bogus, 192.0.2.77"),
        ]);

        let custom = IpExtractor::new().with_headers(vec![
            ForwardHeader::custom("X-Client-IP", HeaderKind::Single),
            X_REAL_IP,
        ]);
        assert_eq!(custom.extract(&h), Some(ip("198.51.100.3")));

        let appended = IpExtractor::new()
            .with_headers(Vec::new())
            .push_header(ForwardHeader::custom("Forwarded-For", HeaderKind::List));
        assert_eq!(appended.extract(&h), Some(ip("192.0.2.77")));

        assert_eq!(IpExtractor::default().extract(&h), Some(ip("192.168.1.50")));
    }

    #[test]
    fn test_extract_with_source() {
        let h = headers(&[("x-real-ip", "nope"), ("x-forwarded-for", "203.0.113.9")]);
        let extractor = IpExtractor::default();

        let (addr, source) = extractor.extract_with_source(&h).unwrap();
        assert_eq!(addr, ip("203.0.113.9"));
        assert_eq!(source, &X_FORWARDED_FOR);

        assert!(extractor.extract_with_source(&HeaderMap::new()).is_none());
    }
}
