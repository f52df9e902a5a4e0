use crate::errors::ProxyError;
use crate::headers::normalize_response_headers;
use crate::routes::{ProxyRule, ResponsePolicy};
use http::header::{CONTENT_TYPE, HeaderValue};
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

pub type ProxyBody = BoxBody<Bytes, ProxyError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Builds a JSON error response with a stable `{error, message}` shape so a
/// calling UI can render a consistent message whichever branch fired.
pub fn json_error(status: StatusCode, error: &str, message: Option<String>) -> Response<ProxyBody> {
    let body = serde_json::to_vec(&ErrorBody { error, message })
        .unwrap_or_else(|_| br#"{"error":"Internal proxy error"}"#.to_vec());

    let mut response = Response::new(Full::new(Bytes::from(body)).map_err(|e| match e {}).boxed());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// Maps a transport-level failure to the client-facing status and body.
/// Backend-returned statuses never come through here; they are relayed.
pub fn error_response(err: &ProxyError) -> Response<ProxyBody> {
    let (status, label, message) = match err {
        ProxyError::NoTargets => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "No backend targets configured",
            None,
        ),
        ProxyError::Timeout { .. } => (
            StatusCode::REQUEST_TIMEOUT,
            "Request timeout",
            Some(err.to_string()),
        ),
        ProxyError::Refused { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Backend unavailable",
            Some(err.to_string()),
        ),
        ProxyError::Transport { .. } => (
            StatusCode::BAD_GATEWAY,
            "Backend unreachable",
            Some(err.to_string()),
        ),
        ProxyError::RequestBody(_) => (
            StatusCode::BAD_REQUEST,
            "Invalid request body",
            Some(err.to_string()),
        ),
        ProxyError::Io(_) | ProxyError::InvalidTarget { .. } | ProxyError::InvalidOutbound(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal proxy error",
            Some(err.to_string()),
        ),
    };

    json_error(status, label, message)
}

/// Applies a rule's response policy to a collected backend response and
/// relays status and body verbatim.
pub fn relay_response(response: Response<Bytes>, rule: &ProxyRule) -> Response<ProxyBody> {
    let (mut parts, body) = response.into_parts();

    match rule.response {
        ResponsePolicy::RelayHeaders => {
            normalize_response_headers(&mut parts.headers);
        }
        ResponsePolicy::ForceJson => {
            parts.headers.clear();
            parts
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
    }

    Response::from_parts(parts, Full::new(body).map_err(|e| match e {}).boxed())
}

/// Plain-text error response for the admin endpoints.
pub fn make_error_response(status_code: StatusCode) -> Response<ProxyBody> {
    let message = status_code.canonical_reason().unwrap_or("an error occurred");

    let mut response = Response::new(Full::new(message.into()).map_err(|e| match e {}).boxed());
    *response.status_mut() = status_code;
    response
}
