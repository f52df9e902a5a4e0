use crate::errors::ProxyError;
use crate::headers::sanitize_request_headers;
use crate::routes::ProxyRule;
use crate::targets::TargetPool;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderValue, TRANSFER_ENCODING};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Request, Response};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::Connect;
use std::io;
use tokio::time::timeout;

/// Forwards one buffered inbound request to the next backend in rotation.
///
/// The backend's HTTP status is never an error here: whatever status it
/// returns, 4xx and 5xx included, the exchange succeeded and the response is
/// handed back for verbatim relay. Only transport failures surface as
/// `ProxyError` — the rule's timeout covers the whole exchange, connection
/// included, through collecting the response body.
pub async fn forward<C>(
    client: &Client<C, Full<Bytes>>,
    pool: &TargetPool,
    rule: &ProxyRule,
    parts: http::request::Parts,
    body: Bytes,
) -> Result<Response<Bytes>, ProxyError>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    let target = pool.next_target().ok_or(ProxyError::NoTargets)?;

    // Use host as identifier for error messages
    let target_name = target
        .host_str()
        .unwrap_or_else(|| target.as_str())
        .to_string();

    let mut url = target.clone();
    url.set_path(&rule.rewrite(parts.uri.path()));
    url.set_query(parts.uri.query());

    let mut headers = parts.headers;
    sanitize_request_headers(&mut headers);
    // The buffered body is re-framed by the client; stale framing headers
    // must not ride along.
    headers.remove(CONTENT_LENGTH);
    headers.remove(TRANSFER_ENCODING);
    if let Some(content_type) = rule.request_content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    tracing::debug!(
        rule = rule.name,
        method = %parts.method,
        target = %target_name,
        url = %url,
        "forwarding request"
    );

    let mut builder = Request::builder().method(parts.method).uri(url.as_str());
    for (name, value) in headers.iter() {
        builder = builder.header(name, value);
    }
    let outbound = builder.body(Full::new(body))?;

    let exchange = async {
        let response = client
            .request(outbound)
            .await
            .map_err(|e| classify_transport(&target_name, e))?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map(|collected| collected.to_bytes())
            .map_err(|e| ProxyError::Transport {
                target: target_name.clone(),
                detail: e.to_string(),
            })?;
        Ok(Response::from_parts(parts, body))
    };

    timeout(rule.timeout, exchange)
        .await
        .map_err(|_| ProxyError::Timeout {
            target: target_name.clone(),
            timeout: rule.timeout,
        })?
}

// A refused connection means the whole target is likely down, which callers
// may retry after backoff; anything else stays a generic transport failure.
// The refusal sits behind the client error as an io::Error somewhere in the
// source chain.
fn classify_transport(target: &str, err: hyper_util::client::legacy::Error) -> ProxyError {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&err);
    while let Some(e) = source {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionRefused {
                return ProxyError::Refused {
                    target: target.to_string(),
                    detail: io_err.to_string(),
                };
            }
        }
        source = e.source();
    }

    ProxyError::Transport {
        target: target.to_string(),
        detail: err.to_string(),
    }
}
