use std::net::SocketAddr;

use meridian_http::HttpServerError;
use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// `start` was called on a server that is running or has stopped.
    #[error("server already started")]
    AlreadyStarted,

    /// Failed to bind the listen address.
    #[error("failed to bind {0}: {1}")]
    Bind(SocketAddr, #[source] std::io::Error),

    /// The bound listener could not report its address.
    #[error("failed to read bound address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

impl HttpServerError for Error {}
