use crate::config::{PrefixMatching, RoutingConfig};

use std::fmt;

use serde::Serialize;

/// The sub-route a request is dispatched to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Consensus-log traffic.
    Consensus,

    /// Message-broker traffic.
    Broker,

    /// Client data queries. Anything not claimed by another route.
    Data,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Consensus => write!(f, "consensus"),
            Self::Broker => write!(f, "broker"),
            Self::Data => write!(f, "data"),
        }
    }
}

/// Maps request paths to routes.
///
/// Classification only ever looks at the path. Every path maps to exactly
/// one route; paths matching neither prefix are [`Route::Data`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathClassifier {
    broker_prefix: String,
    consensus_prefix: String,
    matching: PrefixMatching,
}

impl PathClassifier {
    /// Create a classifier from the routing configuration.
    #[must_use]
    pub fn new(config: &RoutingConfig) -> Self {
        let matching = config.prefix_matching;

        Self {
            broker_prefix: matching.normalize(&config.broker_prefix).to_string(),
            consensus_prefix: matching.normalize(&config.consensus_prefix).to_string(),
            matching,
        }
    }

    /// Classify a request path.
    #[must_use]
    pub fn classify(&self, path: &str) -> Route {
        if self.matching.matches(path, &self.consensus_prefix) {
            Route::Consensus
        } else if self.matching.matches(path, &self.broker_prefix) {
            Route::Broker
        } else {
            Route::Data
        }
    }

}
