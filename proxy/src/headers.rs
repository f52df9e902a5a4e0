// Helpers to clean header maps in both directions: inbound request headers
// before they are forwarded to a backend, and backend response headers
// before they are relayed to the client.

use http::header::{
    CONNECTION, CONTENT_LENGTH, HeaderMap, TE, TRAILER, TRANSFER_ENCODING, UPGRADE,
};

// Headers that must not be blindly relayed to a backend the gateway is
// impersonating a direct client to: hop-by-hop, connection-specific, and
// client-fingerprinting names. Matching is case-insensitive (header names
// are normalized to lowercase in the map).
static REQUEST_DENY_LIST: &[&str] = &[
    "host",
    "connection",
    "cookie",
    "pragma",
    "referer",
    "x-forwarded-for",
    "x-forwarded-host",
    "x-forwarded-port",
    "x-forwarded-proto",
    "sec-fetch-site",
    "sec-fetch-mode",
    "sec-fetch-dest",
    "sec-ch-ua",
    "sec-ch-ua-mobile",
    "sec-ch-ua-platform",
    "user-agent",
];

/// Strips the request deny list. Everything else, custom auth headers
/// included, passes through unchanged.
pub fn sanitize_request_headers(headers: &mut HeaderMap) -> &mut HeaderMap {
    for name in REQUEST_DENY_LIST {
        headers.remove(*name);
    }
    headers
}

/// Removes hop-by-hop and framing headers from a backend response before the
/// collected body is re-framed for the client.
pub fn normalize_response_headers(headers: &mut HeaderMap) -> &mut HeaderMap {
    headers.remove(CONNECTION);
    headers.remove(TE);
    headers.remove(TRAILER);
    headers.remove(UPGRADE);
    headers.remove("keep-alive");
    headers.remove("proxy-connection");
    headers.remove(TRANSFER_ENCODING);
    headers.remove(CONTENT_LENGTH);
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{CONTENT_TYPE, COOKIE, HOST, HeaderValue, USER_AGENT};

    #[test]
    fn test_sanitize_strips_deny_list_keeps_custom() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("portfolio.example"));
        headers.insert(COOKIE, HeaderValue::from_static("session=abc"));
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.1.2.3"));
        headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
        headers.insert("x-api-key", HeaderValue::from_static("secret-key"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let sanitized = sanitize_request_headers(&mut headers);

        assert!(sanitized.get(HOST).is_none());
        assert!(sanitized.get(COOKIE).is_none());
        assert!(sanitized.get(USER_AGENT).is_none());
        assert!(sanitized.get("x-forwarded-for").is_none());
        assert!(sanitized.get("sec-fetch-mode").is_none());
        // custom headers survive
        assert_eq!(
            sanitized.get("x-api-key"),
            Some(&HeaderValue::from_static("secret-key"))
        );
        assert_eq!(
            sanitized.get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );
    }

    #[test]
    fn test_sanitize_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        // Lookup and removal are case-insensitive regardless of how the
        // client spelled the name on the wire.
        headers.insert("Cookie", HeaderValue::from_static("session=abc"));
        headers.insert("User-Agent", HeaderValue::from_static("curl/8.0"));

        sanitize_request_headers(&mut headers);
        assert!(headers.is_empty());
    }

    #[test]
    fn test_normalize_response_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert(TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("42"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let normalized = normalize_response_headers(&mut headers);

        assert_eq!(normalized.len(), 1);
        assert_eq!(
            normalized.get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );
    }
}
