mod admin_service;
pub mod config;
mod errors;
mod forward;
mod headers;
mod response;
mod routes;
mod service;
pub mod targets;

use admin_service::AdminService;
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::server::conn::auto::Builder;
use service::{ProxyService, ServiceType};
use std::process;
use std::sync::Arc;
use targets::TargetPool;
use tokio::net::TcpListener;

pub use errors::ProxyError;

pub async fn run(config: config::Config, pool: TargetPool) {
    let pool = Arc::new(pool);

    tracing::info!(
        host = %config.listener.host,
        port = config.listener.port,
        targets = pool.len(),
        "starting gateway"
    );

    let proxy_task = run_task(
        &config.listener.host,
        config.listener.port,
        ServiceType::Proxy(Box::new(ProxyService::new(pool.clone()))),
    );
    let admin_task = run_task(
        &config.admin_listener.host,
        config.admin_listener.port,
        ServiceType::Admin(Box::new(AdminService::new(pool))),
    );

    if let Err(e) = tokio::try_join!(proxy_task, admin_task) {
        tracing::error!("server error: {e}");
        process::exit(1);
    }
}

async fn run_task(host: &str, port: u16, service: ServiceType) -> Result<(), ProxyError> {
    let listener = TcpListener::bind(format!("{}:{}", host, port)).await?;

    let service_arc = Arc::new(service);

    loop {
        let (stream, _peer_addr) = listener.accept().await?;
        let _ = stream.set_nodelay(true);
        let io = TokioIo::new(stream);
        let svc = service_arc.clone();

        // Hand the connection to hyper; auto-detect h1/h2 on this socket
        tokio::spawn(async move {
            let _ = Builder::new(TokioExecutor::new())
                .serve_connection(io, svc)
                .await;
        });
    }
}
