use crate::SUBSYSTEM_HEADER;
use crate::consensus::MockConsensusLog;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::Request;
use axum::response::IntoResponse;
use meridian_roles::{Broker, ConsensusForwarder};

/// Path prefix under which the mock broker forwards replication traffic to
/// its consensus log.
const REPLICATION_PREFIX: &str = "/messaging/raft";

/// Mock broker built on a [`MockConsensusLog`].
#[derive(Clone, Debug, Default)]
pub struct MockBroker {
    log: MockConsensusLog,
    requests: Arc<AtomicUsize>,
}

impl MockBroker {
    /// Create a new mock broker on top of the given consensus log.
    #[must_use]
    pub fn new(log: MockConsensusLog) -> Self {
        Self {
            log,
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of requests the broker answered itself.
    #[must_use]
    pub fn requests_served(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Broker for MockBroker {
    type Log = MockConsensusLog;

    fn log(&self) -> &MockConsensusLog {
        &self.log
    }

    fn handler(&self, consensus: ConsensusForwarder) -> Router {
        let requests = Arc::clone(&self.requests);

        Router::new().fallback(move |request: Request| async move {
            if request.uri().path().starts_with(REPLICATION_PREFIX) {
                return consensus.forward(request).await;
            }

            requests.fetch_add(1, Ordering::SeqCst);

            ([(SUBSYSTEM_HEADER, "broker")], request.uri().path().to_string()).into_response()
        })
    }
}
