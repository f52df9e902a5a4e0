use crate::admin_service::AdminService;
use crate::errors::ProxyError;
use crate::forward::forward;
use crate::response::{ProxyBody, error_response, json_error, relay_response};
use crate::routes;
use crate::targets::TargetPool;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::Service as HyperService;
use hyper::{Request, Response, StatusCode};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type HttpClient = Client<HttpConnector, Full<Bytes>>;

/// The public-facing service: matches proxy routes, buffers the inbound
/// body once, forwards, and relays or translates the outcome. Every failure
/// becomes a JSON response; nothing propagates to the connection as an
/// unhandled error.
pub struct ProxyService {
    pool: Arc<TargetPool>,
    client: HttpClient,
}

impl ProxyService {
    pub fn new(pool: Arc<TargetPool>) -> Self {
        let conn = HttpConnector::new();
        let client: HttpClient = Client::builder(TokioExecutor::new())
            .http2_adaptive_window(true)
            .build(conn);

        Self { pool, client }
    }
}

impl<B> HyperService<Request<B>> for ProxyService
where
    B: hyper::body::Body + Send + 'static,
    B::Data: Send,
    B::Error: std::fmt::Display,
{
    type Response = Response<ProxyBody>;
    type Error = ProxyError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        let pool = self.pool.clone();
        let client = self.client.clone();
        Box::pin(async move { Ok(handle(pool, client, req).await) })
    }
}

async fn handle<B>(pool: Arc<TargetPool>, client: HttpClient, req: Request<B>) -> Response<ProxyBody>
where
    B: hyper::body::Body + Send + 'static,
    B::Data: Send,
    B::Error: std::fmt::Display,
{
    let Some(rule) = routes::find(req.uri().path()) else {
        tracing::warn!(
            method = %req.method(),
            path = %req.uri().path(),
            "no proxy route matched"
        );
        return json_error(StatusCode::NOT_FOUND, "Not found", None);
    };

    if req.method() != rule.method {
        return json_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", None);
    }

    // Buffer the raw body once; it is forwarded byte for byte, never
    // re-parsed.
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => return error_response(&ProxyError::RequestBody(e.to_string())),
    };

    match forward(&client, &pool, rule, parts, body).await {
        Ok(response) => relay_response(response, rule),
        Err(err) => {
            tracing::warn!(rule = rule.name, error = %err, "forward failed");
            error_response(&err)
        }
    }
}

/// Lets one accept loop serve either the proxy or the admin endpoints.
pub enum ServiceType {
    Proxy(Box<ProxyService>),
    Admin(Box<AdminService>),
}

impl HyperService<Request<Incoming>> for ServiceType {
    type Response = Response<ProxyBody>;
    type Error = ProxyError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        match self {
            ServiceType::Proxy(proxy) => proxy.call(req),
            ServiceType::Admin(admin) => admin.call(req),
        }
    }
}
