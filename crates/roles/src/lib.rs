//! Abstract interfaces for the subsystems a node can host.
//!
//! A node plays any non-empty subset of three roles: consensus-log
//! participant, message broker, and data server. The router only ever talks
//! to these subsystems through the traits below.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Message brokers built on top of a consensus log.
pub mod broker;

/// Consensus-log endpoints.
pub mod consensus;

/// Data-serving endpoints.
pub mod data;

/// Known network locations of peer nodes.
pub mod peers;

pub use broker::Broker;
pub use consensus::{ConsensusForwarder, ConsensusLog};
pub use data::{DataHandlerOptions, DataServer};
pub use peers::PeerAddressSet;
