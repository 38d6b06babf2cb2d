//! Abstract interface for the HTTP servers a node listens on.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::error::Error;
use std::fmt::Debug;
use std::net::SocketAddr;

use async_trait::async_trait;
use axum::Router;
use tokio::task::JoinHandle;

/// Marker trait for `HttpServer` errors
pub trait HttpServerError: Debug + Error + Send + Sync + 'static {}

/// A server that accepts HTTP connections and hands every request to a router.
#[async_trait]
pub trait HttpServer
where
    Self: Clone + Send + Sync + 'static,
{
    /// The error type for this server.
    type Error: HttpServerError;

    /// Bind and start serving `router`.
    ///
    /// The returned handle completes once the server stops, either after
    /// [`Self::shutdown`] or because serving failed.
    async fn start(&self, router: Router) -> Result<JoinHandle<()>, Self::Error>;

    /// Stop accepting connections and wait for in-flight requests to finish.
    async fn shutdown(&self);

    /// The address the server is bound to, once started.
    fn local_addr(&self) -> Option<SocketAddr>;
}
