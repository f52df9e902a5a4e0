use crate::errors::ProxyError;
use crate::response::{ProxyBody, make_error_response};
use crate::targets::TargetPool;
use http_body_util::{BodyExt, Full};
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Health and readiness endpoints. Readiness reports whether any backend
/// targets are configured: with an empty pool the process serves but every
/// proxied request fails, which the platform should see as not-ready.
pub struct AdminService {
    pool: Arc<TargetPool>,
}

impl AdminService {
    pub fn new(pool: Arc<TargetPool>) -> Self {
        Self { pool }
    }
}

impl<B> Service<Request<B>> for AdminService
where
    B: Send + 'static,
{
    type Response = Response<ProxyBody>;
    type Error = ProxyError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        let is_ready = !self.pool.is_empty();

        Box::pin(async move {
            let res = match req.uri().path() {
                "/health" => {
                    Response::new(Full::new("ok\n".into()).map_err(|e| match e {}).boxed())
                }
                "/ready" => match is_ready {
                    true => Response::new(Full::new("ok\n".into()).map_err(|e| match e {}).boxed()),
                    false => make_error_response(StatusCode::SERVICE_UNAVAILABLE),
                },
                _ => make_error_response(StatusCode::NOT_FOUND),
            };
            Ok(res)
        })
    }
}
