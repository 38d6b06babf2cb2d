use crate::error::{Error, Result};

use meridian_roles::DataHandlerOptions;
use serde::Deserialize;

/// Default path prefix for consensus traffic.
pub const DEFAULT_CONSENSUS_PREFIX: &str = "/raft";

/// Default path prefix for broker traffic.
pub const DEFAULT_BROKER_PREFIX: &str = "/messaging";

/// How route prefixes are matched against request paths.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PrefixMatching {
    /// Raw string prefix. `/raftsomething` matches `/raft`.
    #[default]
    Literal,

    /// The prefix must end on a path-segment boundary. `/raftsomething` does
    /// not match `/raft`, while `/raft` and `/raft/vote` do.
    Segment,
}

impl PrefixMatching {
    /// Whether `path` falls under `prefix`.
    ///
    /// `prefix` is expected in the form returned by [`Self::normalize`].
    #[must_use]
    pub fn matches(self, path: &str, prefix: &str) -> bool {
        path.strip_prefix(prefix).is_some_and(|rest| match self {
            Self::Literal => true,
            Self::Segment => rest.is_empty() || rest.starts_with('/'),
        })
    }

    /// The form of `prefix` that paths are compared against.
    ///
    /// Literal prefixes are used as written. Segment prefixes drop trailing
    /// slashes so the bare prefix still matches.
    #[must_use]
    pub fn normalize(self, prefix: &str) -> &str {
        match self {
            Self::Literal => prefix,
            Self::Segment => match prefix.trim_end_matches('/') {
                "" => prefix,
                trimmed => trimmed,
            },
        }
    }
}

/// Routing policy fixed at startup.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct RoutingConfig {
    /// Whether the data handler requires authentication.
    pub auth_enabled: bool,

    /// Whether the data handler trace-logs writes.
    pub write_tracing: bool,

    /// Version string reported by the data handler.
    pub version: String,

    /// Path prefix routed to the consensus handler.
    pub consensus_prefix: String,

    /// Path prefix routed to the broker handler.
    pub broker_prefix: String,

    /// How prefixes are matched.
    pub prefix_matching: PrefixMatching,
}

impl RoutingConfig {
    /// Check that both route prefixes are usable and can both be reached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrefix`] if a prefix does not start with `/`,
    /// names no path segment, or overlaps the other prefix so that one of
    /// them would claim every path meant for the other.
    pub fn validate(&self) -> Result<()> {
        for prefix in [&self.consensus_prefix, &self.broker_prefix] {
            if !prefix.starts_with('/') {
                return Err(Error::InvalidPrefix(prefix.clone(), "must start with '/'"));
            }

            if prefix.trim_end_matches('/').is_empty() {
                return Err(Error::InvalidPrefix(
                    prefix.clone(),
                    "must name at least one path segment",
                ));
            }
        }

        let matching = self.prefix_matching;
        let consensus = matching.normalize(&self.consensus_prefix);
        let broker = matching.normalize(&self.broker_prefix);

        if matching.matches(broker, consensus) || matching.matches(consensus, broker) {
            return Err(Error::InvalidPrefix(
                self.broker_prefix.clone(),
                "must not overlap the consensus prefix",
            ));
        }

        Ok(())
    }

    /// Options the data handler is built with.
    #[must_use]
    pub fn data_handler_options(&self) -> DataHandlerOptions {
        DataHandlerOptions {
            auth_enabled: self.auth_enabled,
            write_tracing: self.write_tracing,
            version: self.version.clone(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            auth_enabled: false,
            write_tracing: false,
            version: env!("CARGO_PKG_VERSION").to_string(),
            consensus_prefix: DEFAULT_CONSENSUS_PREFIX.to_string(),
            broker_prefix: DEFAULT_BROKER_PREFIX.to_string(),
            prefix_matching: PrefixMatching::default(),
        }
    }
}
