/* src/headers.rs */

use std::collections::HashMap;
use std::hash::BuildHasher;

/// Type alias for plain header maps keyed by header name.
///
/// Lookups through [`HeaderSource`] are case-insensitive, but lowercase keys
/// hit the fast path.
pub type HeaderMap = HashMap<String, String>;

/// Read-only view of an HTTP header collection.
///
/// Header names compare case-insensitively. When a name carries several
/// values only the first one is visible.
pub trait HeaderSource {
    /// First value stored under `name`, if any.
    fn first_value(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> HeaderSource for HashMap<String, String, S> {
    fn first_value(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.get(name) {
            return Some(value);
        }

        let lower = name.to_ascii_lowercase();
        if let Some(value) = self.get(&lower) {
            return Some(value);
        }

        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl<K: AsRef<str>, V: AsRef<str>> HeaderSource for [(K, V)] {
    fn first_value(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key.as_ref().eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_ref())
    }
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> HeaderSource for [(K, V); N] {
    fn first_value(&self, name: &str) -> Option<&str> {
        self.as_slice().first_value(name)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> HeaderSource for Vec<(K, V)> {
    fn first_value(&self, name: &str) -> Option<&str> {
        self.as_slice().first_value(name)
    }
}

/// Values that are not visible ASCII are treated as absent.
#[cfg(feature = "http")]
impl HeaderSource for http::HeaderMap {
    fn first_value(&self, name: &str) -> Option<&str> {
        self.get(name)?.to_str().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_lookup_ignores_case() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Real-IP".to_string(), "203.0.113.7".to_string());
        headers.insert("cf-connecting-ip".to_string(), "198.51.100.1".to_string());

        assert_eq!(headers.first_value("x-real-ip"), Some("203.0.113.7"));
        assert_eq!(headers.first_value("X-REAL-IP"), Some("203.0.113.7"));
        assert_eq!(headers.first_value("CF-Connecting-IP"), Some("198.51.100.1"));
        assert_eq!(headers.first_value("true-client-ip"), None);
    }

    #[test]
    fn test_pairs_first_match_wins() {
        let headers = [
            ("X-Forwarded-For", "192.0.2.1"),
            ("x-forwarded-for", "192.0.2.2"),
        ];

        assert_eq!(headers.first_value("x-forwarded-for"), Some("192.0.2.1"));
        assert_eq!(headers.first_value("x-real-ip"), None);

        let owned = vec![("True-Client-IP".to_string(), "::1".to_string())];
        assert_eq!(owned.first_value("true-client-ip"), Some("::1"));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_header_map_first_value() {
        use http::header::{HeaderName, HeaderValue};

        let name = HeaderName::from_static("x-forwarded-for");
        let mut headers = http::HeaderMap::new();
        headers.append(name.clone(), HeaderValue::from_static("198.51.100.9"));
        headers.append(name, HeaderValue::from_static("203.0.113.9"));
        headers.insert(
            HeaderName::from_static("x-real-ip"),
            HeaderValue::from_bytes(b"\xff\xfe").unwrap(),
        );

        assert_eq!(headers.first_value("X-Forwarded-For"), Some("198.51.100.9"));
        assert_eq!(headers.first_value("x-real-ip"), None);
        assert_eq!(headers.first_value("not a header"), None);
    }
}
