use crate::SUBSYSTEM_HEADER;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::http::Uri;
use meridian_roles::ConsensusLog;

/// Mock consensus log that echoes request paths.
#[derive(Clone, Debug, Default)]
pub struct MockConsensusLog {
    requests: Arc<AtomicUsize>,
}

impl MockConsensusLog {
    /// Create a new mock consensus log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests served by every handler built from this log.
    #[must_use]
    pub fn requests_served(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl ConsensusLog for MockConsensusLog {
    fn handler(&self) -> Router {
        let requests = Arc::clone(&self.requests);

        Router::new().fallback(move |uri: Uri| async move {
            requests.fetch_add(1, Ordering::SeqCst);

            ([(SUBSYSTEM_HEADER, "consensus")], uri.path().to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_echoes_path_and_counts() {
        let log = MockConsensusLog::new();

        let response = log
            .handler()
            .oneshot(Request::get("/raft/vote").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.headers()[SUBSYSTEM_HEADER], "consensus");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, "/raft/vote");
        assert_eq!(log.requests_served(), 1);
    }
}
