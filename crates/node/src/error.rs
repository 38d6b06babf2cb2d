use thiserror::Error;

/// The result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Node already started.
    #[error("node already started")]
    AlreadyStarted,

    /// HTTP server error.
    #[error("http server error: {0}")]
    HttpServer(String),

    /// HTTP server stopped without being asked to.
    #[error("http server stopped unexpectedly")]
    HttpServerStopped,
}
