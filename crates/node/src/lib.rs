//! Runs a node's request router on an HTTP server.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::{Error, Result};

use meridian_http::HttpServer;
use meridian_roles::PeerAddressSet;
use meridian_router::NodeRouter;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info};

/// Options for creating a new node server.
pub struct NodeServerOptions<HS, P>
where
    HS: HttpServer,
    P: PeerAddressSet,
{
    /// The HTTP server to listen on.
    pub http_server: HS,

    /// The router dispatching every incoming request.
    pub router: NodeRouter<P>,
}

/// Serves a [`NodeRouter`] until shut down.
#[derive(Clone)]
pub struct NodeServer<HS, P>
where
    HS: HttpServer,
    P: PeerAddressSet,
{
    http_server: HS,
    router: NodeRouter<P>,
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl<HS, P> NodeServer<HS, P>
where
    HS: HttpServer,
    P: PeerAddressSet,
{
    /// Create a new node server.
    pub fn new(
        NodeServerOptions {
            http_server,
            router,
        }: NodeServerOptions<HS, P>,
    ) -> Self {
        Self {
            http_server,
            router,
            shutdown_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
        }
    }

    /// Start serving.
    ///
    /// The returned handle resolves once the node stops: `Ok` after
    /// [`Self::shutdown`], or an error if the HTTP server exits on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the node was already started or the HTTP server
    /// fails to start.
    pub async fn start(&self) -> Result<JoinHandle<Result<()>>> {
        if self.task_tracker.is_closed() {
            return Err(Error::AlreadyStarted);
        }

        info!(
            consensus = self.router.has_consensus(),
            broker = self.router.has_broker(),
            data = self.router.has_data(),
            "starting node"
        );

        let http_handle = self
            .http_server
            .start(self.router.clone().into_router())
            .await
            .map_err(|e| Error::HttpServer(e.to_string()))?;

        let http_server = self.http_server.clone();
        let shutdown_token = self.shutdown_token.clone();
        let handle = self.task_tracker.spawn(async move {
            tokio::select! {
                () = shutdown_token.cancelled() => {
                    info!("shutdown command received");
                    http_server.shutdown().await;

                    Ok(())
                }
                _ = http_handle => {
                    error!("http server stopped unexpectedly");

                    Err(Error::HttpServerStopped)
                }
            }
        });

        self.task_tracker.close();

        Ok(handle)
    }

    /// Shutdown the node.
    pub async fn shutdown(&self) {
        info!("node shutting down...");

        self.shutdown_token.cancel();
        self.task_tracker.wait().await;

        info!("node shutdown");
    }

    /// Wait for the node to exit.
    pub async fn wait(&self) {
        self.task_tracker.wait().await;
    }

    /// The address the node is listening on, once started.
    pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
        self.http_server.local_addr()
    }
}
