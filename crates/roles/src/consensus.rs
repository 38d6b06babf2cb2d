use std::convert::Infallible;

use axum::Router;
use axum::extract::Request;
use axum::response::Response;
use tower::ServiceExt;

/// A local consensus-log endpoint.
pub trait ConsensusLog
where
    Self: Clone + Send + Sync + 'static,
{
    /// Builds the HTTP handler serving consensus traffic for this log.
    ///
    /// The handler owns all consensus-protocol semantics; requests reach it
    /// unchanged.
    fn handler(&self) -> Router;
}

/// Handle given to a broker so its replication traffic can reach the
/// consensus log hosted on the same node.
#[derive(Clone, Debug)]
pub struct ConsensusForwarder {
    handler: Router,
}

impl ConsensusForwarder {
    /// Binds a forwarder to the given consensus log.
    pub fn new<L>(log: &L) -> Self
    where
        L: ConsensusLog,
    {
        Self {
            handler: log.handler(),
        }
    }

    /// Passes a request through to the consensus handler.
    pub async fn forward(&self, request: Request) -> Response {
        self.handler
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|never: Infallible| match never {})
    }
}
