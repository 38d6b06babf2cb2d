//! Implementation of simple non-secure HTTP for local development.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]

mod error;

pub use error::Error;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use meridian_http::HttpServer;
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info};

/// Simple non-secure HTTP server.
#[derive(Clone)]
pub struct InsecureHttpServer {
    listen_addr: SocketAddr,
    local_addr: Arc<RwLock<Option<SocketAddr>>>,
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl InsecureHttpServer {
    /// Creates a new instance of `InsecureHttpServer`.
    ///
    /// Port `0` binds an ephemeral port; see [`HttpServer::local_addr`].
    #[must_use]
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            local_addr: Arc::new(RwLock::new(None)),
            shutdown_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
        }
    }
}

#[async_trait]
impl HttpServer for InsecureHttpServer {
    type Error = Error;

    async fn start(&self, router: Router) -> Result<JoinHandle<()>, Self::Error> {
        if self.task_tracker.is_closed() {
            return Err(Error::AlreadyStarted);
        }

        let listener = tokio::net::TcpListener::bind(self.listen_addr)
            .await
            .map_err(|e| Error::Bind(self.listen_addr, e))?;
        let local_addr = listener.local_addr().map_err(Error::LocalAddr)?;
        *self.local_addr.write() = Some(local_addr);

        info!("http server listening on http://{}", local_addr);

        let shutdown_token = self.shutdown_token.clone();
        let handle = self.task_tracker.spawn(async move {
            let serve = axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(shutdown_token.cancelled_owned())
                .into_future();

            match serve.await {
                Ok(()) => info!("http server exited"),
                Err(e) => error!("http server failed: {}", e),
            }
        });

        self.task_tracker.close();

        Ok(handle)
    }

    async fn shutdown(&self) {
        info!("http server shutting down...");

        self.shutdown_token.cancel();
        self.task_tracker.wait().await;

        info!("http server shutdown");
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.read()
    }
}
