use hyper::Method;
use std::time::Duration;

/// Default window a backend gets to answer a forwarded request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Extended window for the bulk project order update: its payload can carry
/// many items and the backend may take longer to persist the batch.
const UPDATE_ORDER_TIMEOUT: Duration = Duration::from_secs(30);

/// What the gateway does with a backend response's headers.
#[derive(Debug, PartialEq, Eq)]
pub enum ResponsePolicy {
    /// Relay the backend's headers (minus hop-by-hop and framing headers).
    RelayHeaders,
    /// Drop the backend's headers and answer as `application/json`.
    ForceJson,
}

/// A declarative per-endpoint forwarding binding: how the public path maps
/// to the backend path, and the endpoint-specific forwarding options.
/// Constructed once at definition time, read-only during request handling.
#[derive(Debug)]
pub struct ProxyRule {
    pub name: &'static str,
    pub method: Method,
    pub public_path: &'static str,
    pub backend_path: &'static str,
    pub timeout: Duration,
    /// Forced `Content-Type` on the outbound request, applied after
    /// sanitization.
    pub request_content_type: Option<&'static str>,
    pub response: ResponsePolicy,
}

pub const ADMIN_AUTH: ProxyRule = ProxyRule {
    name: "admin_auth",
    method: Method::POST,
    public_path: "/api/proxy/admin/auth",
    backend_path: "/api/admin/auth",
    timeout: DEFAULT_TIMEOUT,
    request_content_type: None,
    response: ResponsePolicy::ForceJson,
};

pub const UPDATE_ORDER: ProxyRule = ProxyRule {
    name: "update_order",
    method: Method::POST,
    public_path: "/api/proxy/projects/updateOrder",
    backend_path: "/api/projects/updateOrder",
    timeout: UPDATE_ORDER_TIMEOUT,
    request_content_type: Some("application/json"),
    response: ResponsePolicy::RelayHeaders,
};

pub static RULES: &[ProxyRule] = &[ADMIN_AUTH, UPDATE_ORDER];

/// Finds the rule bound to a public path, if any.
pub fn find(path: &str) -> Option<&'static ProxyRule> {
    RULES.iter().find(|rule| rule.public_path == path)
}

impl ProxyRule {
    /// Rewrites the public-facing path to the backend's real path. The query
    /// string is carried separately by the forwarder.
    pub fn rewrite(&self, path: &str) -> String {
        path.replacen(self.public_path, self.backend_path, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_public_path() {
        let rule = find("/api/proxy/admin/auth").unwrap();
        assert_eq!(rule.name, "admin_auth");

        let rule = find("/api/proxy/projects/updateOrder").unwrap();
        assert_eq!(rule.name, "update_order");

        assert!(find("/api/proxy/unknown").is_none());
        assert!(find("/api/admin/auth").is_none());
    }

    #[test]
    fn test_rewrite() {
        assert_eq!(
            ADMIN_AUTH.rewrite("/api/proxy/admin/auth"),
            "/api/admin/auth"
        );
        assert_eq!(
            UPDATE_ORDER.rewrite("/api/proxy/projects/updateOrder"),
            "/api/projects/updateOrder"
        );
    }

    #[test]
    fn test_order_update_gets_extended_timeout() {
        assert!(UPDATE_ORDER.timeout > ADMIN_AUTH.timeout);
    }
}
