//! In-memory implementations of the node subsystems for tests and local runs.
//!
//! Every mock answers with a `x-mock-subsystem` header naming the subsystem
//! that served the request, and echoes the request path as the body.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod broker;
mod consensus;
mod data;
mod peers;

pub use broker::MockBroker;
pub use consensus::MockConsensusLog;
pub use data::{MockDataServer, VERSION_HEADER};
pub use peers::MemoryPeerAddressSet;

/// Header naming the mock subsystem that produced a response.
pub const SUBSYSTEM_HEADER: &str = "x-mock-subsystem";
