use crate::classifier::{PathClassifier, Route};
use crate::config::RoutingConfig;
use crate::error::{Error, Result};
use crate::redirect::redirect_target;
use crate::roles::NodeRoles;

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::Router;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use meridian_roles::{Broker, ConsensusForwarder, ConsensusLog, DataServer, PeerAddressSet};
use tower::{Service, ServiceExt};
use tracing::{debug, info, warn};

/// Options for creating a new node router.
pub struct NodeRouterOptions<C, B, D, P>
where
    C: ConsensusLog,
    B: Broker<Log = C>,
    D: DataServer,
    P: PeerAddressSet,
{
    /// Routing policy.
    pub config: RoutingConfig,

    /// Known broker peers, read on every broker request this node cannot serve.
    pub peers: P,

    /// The subsystems hosted by this node.
    pub roles: NodeRoles<C, B, D>,
}

/// Dispatches requests to the local consensus, broker, or data handler.
///
/// Handlers are built once on construction and never change afterwards, so
/// clones can serve any number of concurrent requests without coordination.
#[derive(Clone)]
pub struct NodeRouter<P>
where
    P: PeerAddressSet,
{
    broker: Option<Router>,
    classifier: PathClassifier,
    consensus: Option<Router>,
    data: Option<Router>,
    peers: P,
    served: Arc<[Route]>,
}

impl<P> NodeRouter<P>
where
    P: PeerAddressSet,
{
    /// Create a new node router.
    ///
    /// # Errors
    ///
    /// Returns an error if the routing configuration is invalid.
    pub fn new<C, B, D>(
        NodeRouterOptions {
            config,
            peers,
            roles,
        }: NodeRouterOptions<C, B, D, P>,
    ) -> Result<Self>
    where
        C: ConsensusLog,
        B: Broker<Log = C>,
        D: DataServer,
    {
        config.validate()?;

        let served = roles.served_routes();
        info!(?served, ?config, "building node router");

        Ok(Self {
            broker: roles
                .broker()
                .map(|broker| broker.handler(ConsensusForwarder::new(broker.log()))),
            classifier: PathClassifier::new(&config),
            consensus: roles.consensus().map(ConsensusLog::handler),
            data: roles
                .data()
                .map(|data| data.handler(config.data_handler_options())),
            peers,
            served: served.into(),
        })
    }

    /// Whether consensus requests are served locally.
    #[must_use]
    pub const fn has_consensus(&self) -> bool {
        self.consensus.is_some()
    }

    /// Whether broker requests are served locally.
    #[must_use]
    pub const fn has_broker(&self) -> bool {
        self.broker.is_some()
    }

    /// Whether data requests are served locally.
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// The classifier used to pick routes.
    #[must_use]
    pub const fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    /// Dispatch a single request.
    ///
    /// Failures to route are turned into responses here; responses from
    /// delegated handlers pass through untouched.
    pub async fn dispatch(&self, request: Request) -> Response {
        let route = self.classifier.classify(request.uri().path());
        debug!(
            %route,
            method = %request.method(),
            path = request.uri().path(),
            "dispatching request"
        );

        let result = match route {
            Route::Consensus => self.serve_consensus(request).await,
            Route::Broker => self.serve_broker(request).await,
            Route::Data => self.serve_data(request).await,
        };

        result.unwrap_or_else(IntoResponse::into_response)
    }

    /// Convert into an axum router that sends every request through
    /// [`Self::dispatch`].
    pub fn into_router(self) -> Router {
        Router::new().fallback_service(self)
    }

    async fn serve_consensus(&self, request: Request) -> Result<Response> {
        match &self.consensus {
            Some(handler) => Ok(delegate(handler, request).await),
            None => Err(self.absent(Route::Consensus)),
        }
    }

    async fn serve_broker(&self, request: Request) -> Result<Response> {
        if let Some(handler) = &self.broker {
            return Ok(delegate(handler, request).await);
        }

        let peers = self.peers.list();
        let Some(target) = redirect_target(&peers, request.uri()) else {
            warn!(path = request.uri().path(), "no local broker and no broker peers known");
            return Err(Error::NoBrokerAvailable);
        };

        debug!(
            peer = %target.origin().ascii_serialization(),
            path = target.path(),
            "redirecting to broker peer"
        );

        Ok((StatusCode::MOVED_PERMANENTLY, [(LOCATION, target.to_string())]).into_response())
    }

    async fn serve_data(&self, request: Request) -> Result<Response> {
        match &self.data {
            Some(handler) => Ok(delegate(handler, request).await),
            None => Err(self.absent(Route::Data)),
        }
    }

    fn absent(&self, subsystem: Route) -> Error {
        warn!(%subsystem, "request for subsystem not hosted on this node");

        Error::SubsystemAbsent {
            subsystem,
            served: self.served.to_vec(),
        }
    }
}

async fn delegate(handler: &Router, request: Request) -> Response {
    handler
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|never: Infallible| match never {})
}

impl<P> Service<Request> for NodeRouter<P>
where
    P: PeerAddressSet,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, std::result::Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let router = self.clone();

        Box::pin(async move { Ok(router.dispatch(request).await) })
    }
}
