use crate::classifier::Route;

use meridian_roles::{Broker, ConsensusLog, DataServer};

/// The subsystems hosted by this node.
///
/// Fixed for the lifetime of the process. A broker always carries the
/// consensus log it is built on, so broker variants also serve consensus
/// traffic through that log.
#[derive(Clone, Debug)]
pub enum NodeRoles<C, B, D>
where
    C: ConsensusLog,
    B: Broker<Log = C>,
    D: DataServer,
{
    /// Consensus participant only.
    Consensus(C),

    /// Broker, and therefore consensus participant.
    Broker(B),

    /// Data server only.
    Data(D),

    /// Consensus participant and data server.
    ConsensusAndData(C, D),

    /// Broker and data server.
    BrokerAndData(B, D),
}

impl<C, B, D> NodeRoles<C, B, D>
where
    C: ConsensusLog,
    B: Broker<Log = C>,
    D: DataServer,
{
    /// The local consensus log, if any.
    pub fn consensus(&self) -> Option<&C> {
        match self {
            Self::Consensus(consensus) | Self::ConsensusAndData(consensus, _) => Some(consensus),
            Self::Broker(broker) | Self::BrokerAndData(broker, _) => Some(broker.log()),
            Self::Data(_) => None,
        }
    }

    /// The local broker, if any.
    pub const fn broker(&self) -> Option<&B> {
        match self {
            Self::Broker(broker) | Self::BrokerAndData(broker, _) => Some(broker),
            Self::Consensus(_) | Self::Data(_) | Self::ConsensusAndData(..) => None,
        }
    }

    /// The local data server, if any.
    pub const fn data(&self) -> Option<&D> {
        match self {
            Self::Data(data) | Self::ConsensusAndData(_, data) | Self::BrokerAndData(_, data) => {
                Some(data)
            }
            Self::Consensus(_) | Self::Broker(_) => None,
        }
    }

    /// Whether consensus traffic can be served locally.
    pub const fn has_consensus(&self) -> bool {
        !matches!(self, Self::Data(_))
    }

    /// Whether broker traffic can be served locally.
    pub const fn has_broker(&self) -> bool {
        self.broker().is_some()
    }

    /// Whether data traffic can be served locally.
    pub const fn has_data(&self) -> bool {
        self.data().is_some()
    }

    /// Routes served locally, in route order.
    pub fn served_routes(&self) -> Vec<Route> {
        [
            (Route::Consensus, self.has_consensus()),
            (Route::Broker, self.has_broker()),
            (Route::Data, self.has_data()),
        ]
        .into_iter()
        .filter_map(|(route, served)| served.then_some(route))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use meridian_roles_mock::{MockBroker, MockConsensusLog, MockDataServer};

    type Roles = NodeRoles<MockConsensusLog, MockBroker, MockDataServer>;

    #[test]
    fn test_consensus_only() {
        let roles = Roles::Consensus(MockConsensusLog::new());

        assert!(roles.has_consensus());
        assert!(!roles.has_broker());
        assert!(!roles.has_data());
        assert_eq!(roles.served_routes(), vec![Route::Consensus]);
    }

    #[test]
    fn test_broker_implies_consensus() {
        let roles = Roles::Broker(MockBroker::new(MockConsensusLog::new()));

        assert!(roles.has_consensus());
        assert!(roles.has_broker());
        assert!(!roles.has_data());
        assert!(roles.consensus().is_some());
        assert_eq!(roles.served_routes(), vec![Route::Consensus, Route::Broker]);
    }

    #[test]
    fn test_data_only() {
        let roles = Roles::Data(MockDataServer::new());

        assert!(!roles.has_consensus());
        assert!(!roles.has_broker());
        assert!(roles.has_data());
        assert!(roles.consensus().is_none());
        assert_eq!(roles.served_routes(), vec![Route::Data]);
    }

    #[test]
    fn test_combined_roles() {
        let consensus_and_data =
            Roles::ConsensusAndData(MockConsensusLog::new(), MockDataServer::new());
        assert_eq!(
            consensus_and_data.served_routes(),
            vec![Route::Consensus, Route::Data]
        );

        let broker_and_data = Roles::BrokerAndData(
            MockBroker::new(MockConsensusLog::new()),
            MockDataServer::new(),
        );
        assert_eq!(
            broker_and_data.served_routes(),
            vec![Route::Consensus, Route::Broker, Route::Data]
        );
    }
}
