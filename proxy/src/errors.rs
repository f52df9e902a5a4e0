use std::io;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ProxyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid backend URL in {var}: {source}")]
    InvalidTarget {
        var: String,
        source: url::ParseError,
    },

    #[error("no backend targets configured")]
    NoTargets,

    #[error("failed to read request body: {0}")]
    RequestBody(String),

    #[error("failed to build outbound request: {0}")]
    InvalidOutbound(#[from] http::Error),

    #[error("backend {target} did not respond within {timeout:?}")]
    Timeout { target: String, timeout: Duration },

    #[error("backend {target} refused the connection: {detail}")]
    Refused { target: String, detail: String },

    #[error("backend {target} unreachable: {detail}")]
    Transport { target: String, detail: String },
}
