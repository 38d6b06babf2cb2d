//! CLI binary to run a node router locally against in-memory subsystems.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]

use std::net::{Ipv4Addr, SocketAddr};

use clap::{Parser, ValueEnum};
use meridian_http_insecure::InsecureHttpServer;
use meridian_node::{NodeServer, NodeServerOptions};
use meridian_roles_mock::{MemoryPeerAddressSet, MockBroker, MockConsensusLog, MockDataServer};
use meridian_router::{NodeRoles, NodeRouter, NodeRouterOptions, PrefixMatching, RoutingConfig};
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info};
use url::Url;

type Roles = NodeRoles<MockConsensusLog, MockBroker, MockDataServer>;

/// CLI-specific error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The node task panicked or was aborted.
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),

    /// Node server error.
    #[error(transparent)]
    Node(#[from] meridian_node::Error),

    /// No role flag was given.
    #[error("at least one of --consensus, --broker or --data is required")]
    NoRoles,

    /// Router construction error.
    #[error(transparent)]
    Router(#[from] meridian_router::Error),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum PrefixMatchingArg {
    Literal,
    Segment,
}

impl From<PrefixMatchingArg> for PrefixMatching {
    fn from(arg: PrefixMatchingArg) -> Self {
        match arg {
            PrefixMatchingArg::Literal => Self::Literal,
            PrefixMatchingArg::Segment => Self::Segment,
        }
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Require authentication on data requests
    #[arg(long, env = "MERIDIAN_AUTH_ENABLED")]
    auth_enabled: bool,

    /// Act as a message broker (implies --consensus)
    #[arg(long, env = "MERIDIAN_BROKER")]
    broker: bool,

    /// Path prefix routed to the broker
    #[arg(long, default_value = "/messaging", env = "MERIDIAN_BROKER_PREFIX")]
    broker_prefix: String,

    /// Broker peers to redirect messaging requests to, in preference order
    #[arg(
        long = "broker-url",
        env = "MERIDIAN_BROKER_URLS",
        value_delimiter = ','
    )]
    broker_urls: Vec<Url>,

    /// Participate in the consensus log
    #[arg(long, env = "MERIDIAN_CONSENSUS")]
    consensus: bool,

    /// Path prefix routed to the consensus log
    #[arg(long, default_value = "/raft", env = "MERIDIAN_CONSENSUS_PREFIX")]
    consensus_prefix: String,

    /// Serve client data queries
    #[arg(long, env = "MERIDIAN_DATA")]
    data: bool,

    /// Address to listen on
    #[arg(
        long,
        default_value_t = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8086)),
        env = "MERIDIAN_LISTEN_ADDR"
    )]
    listen_addr: SocketAddr,

    /// Maximum log level
    #[arg(long, default_value_t = Level::INFO, env = "MERIDIAN_LOG_LEVEL")]
    log_level: Level,

    /// How route prefixes are matched against request paths
    #[arg(
        long,
        value_enum,
        default_value_t = PrefixMatchingArg::Literal,
        env = "MERIDIAN_PREFIX_MATCHING"
    )]
    prefix_matching: PrefixMatchingArg,

    /// Trace-log every data write
    #[arg(long, env = "MERIDIAN_WRITE_TRACING")]
    write_tracing: bool,
}

impl Args {
    fn routing_config(&self) -> RoutingConfig {
        RoutingConfig {
            auth_enabled: self.auth_enabled,
            write_tracing: self.write_tracing,
            version: env!("CARGO_PKG_VERSION").to_string(),
            consensus_prefix: self.consensus_prefix.clone(),
            broker_prefix: self.broker_prefix.clone(),
            prefix_matching: self.prefix_matching.into(),
        }
    }

    fn roles(&self) -> Result<Roles, Error> {
        let broker = || MockBroker::new(MockConsensusLog::new());

        Ok(match (self.broker, self.consensus, self.data) {
            (true, _, false) => Roles::Broker(broker()),
            (true, _, true) => Roles::BrokerAndData(broker(), MockDataServer::new()),
            (false, true, false) => Roles::Consensus(MockConsensusLog::new()),
            (false, true, true) => {
                Roles::ConsensusAndData(MockConsensusLog::new(), MockDataServer::new())
            }
            (false, false, true) => Roles::Data(MockDataServer::new()),
            (false, false, false) => return Err(Error::NoRoles),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let router = NodeRouter::new(NodeRouterOptions {
        config: args.routing_config(),
        peers: MemoryPeerAddressSet::new(args.broker_urls.clone()),
        roles: args.roles()?,
    })?;

    let node = NodeServer::new(NodeServerOptions {
        http_server: InsecureHttpServer::new(args.listen_addr),
        router,
    });

    let shutdown_token = CancellationToken::new();
    let signal_shutdown_token = shutdown_token.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_signal().await {
            error!("failed to listen for shutdown signals: {}", e);
        }

        info!("Shutting down");
        signal_shutdown_token.cancel();
    });

    let handle = node.start().await?;

    tokio::select! {
        () = shutdown_token.cancelled() => {
            node.shutdown().await;
        }
        result = handle => {
            result??;
        }
    }

    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM"),
        _ = sigint.recv() => info!("Received SIGINT"),
    }

    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("Received interrupt signal");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("meridian-local").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_roles_from_flags() {
        let roles = parse(&["--broker"]).roles().unwrap();
        assert!(roles.has_broker() && roles.has_consensus() && !roles.has_data());

        let roles = parse(&["--broker", "--data"]).roles().unwrap();
        assert!(roles.has_broker() && roles.has_data());

        let roles = parse(&["--consensus"]).roles().unwrap();
        assert!(roles.has_consensus() && !roles.has_broker() && !roles.has_data());

        let roles = parse(&["--consensus", "--data"]).roles().unwrap();
        assert!(roles.has_consensus() && roles.has_data());

        let roles = parse(&["--data"]).roles().unwrap();
        assert!(!roles.has_consensus() && roles.has_data());
    }

    #[test]
    fn test_no_roles_is_an_error() {
        assert!(matches!(parse(&[]).roles(), Err(Error::NoRoles)));
    }

    #[test]
    fn test_routing_config_from_flags() {
        let args = parse(&[
            "--data",
            "--auth-enabled",
            "--write-tracing",
            "--prefix-matching",
            "segment",
            "--broker-url",
            "http://b1:8090,http://b2:8090",
        ]);
        let config = args.routing_config();

        assert!(config.auth_enabled);
        assert!(config.write_tracing);
        assert_eq!(config.prefix_matching, PrefixMatching::Segment);
        assert_eq!(config.consensus_prefix, "/raft");
        assert_eq!(config.broker_prefix, "/messaging");
        assert_eq!(
            args.broker_urls,
            vec![
                Url::parse("http://b1:8090").unwrap(),
                Url::parse("http://b2:8090").unwrap(),
            ]
        );
    }
}
