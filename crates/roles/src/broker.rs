use crate::consensus::{ConsensusForwarder, ConsensusLog};

use axum::Router;

/// A local message-broker endpoint.
///
/// A broker cannot exist without a consensus log on the same node, so every
/// broker exposes the log it is built on.
pub trait Broker
where
    Self: Clone + Send + Sync + 'static,
{
    /// The consensus log backing this broker.
    type Log: ConsensusLog;

    /// The consensus log backing this broker.
    fn log(&self) -> &Self::Log;

    /// Builds the HTTP handler serving messaging traffic.
    ///
    /// `consensus` forwards the broker's own replication traffic to the
    /// node's consensus endpoint.
    fn handler(&self, consensus: ConsensusForwarder) -> Router;
}
