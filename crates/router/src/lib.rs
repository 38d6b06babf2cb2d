//! Single network entry point for a multi-role node.
//!
//! Every request is classified by path prefix and handed to the local
//! consensus, broker, or data handler. Broker requests reaching a node
//! without a broker are redirected to a known broker peer; anything else that
//! cannot be served locally gets an explicit error response.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod classifier;
mod config;
mod error;
mod redirect;
mod roles;
mod router;

pub use classifier::{PathClassifier, Route};
pub use config::{PrefixMatching, RoutingConfig};
pub use error::{Error, Result};
pub use redirect::redirect_target;
pub use roles::NodeRoles;
pub use router::{NodeRouter, NodeRouterOptions};
