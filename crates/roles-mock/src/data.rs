use crate::SUBSYSTEM_HEADER;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use meridian_roles::{DataHandlerOptions, DataServer};
use parking_lot::Mutex;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Header carrying the version string the data handler was built with.
pub const VERSION_HEADER: &str = "x-meridian-version";

/// Mock data server.
///
/// Handlers reject requests without an `Authorization` header when built
/// with `auth_enabled`, and wrap themselves in a [`TraceLayer`] when built
/// with `write_tracing`.
#[derive(Clone, Debug, Default)]
pub struct MockDataServer {
    built_with: Arc<Mutex<Vec<DataHandlerOptions>>>,
    requests: Arc<AtomicUsize>,
}

impl MockDataServer {
    /// Create a new mock data server.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options of every handler built so far, in build order.
    #[must_use]
    pub fn handlers_built(&self) -> Vec<DataHandlerOptions> {
        self.built_with.lock().clone()
    }

    /// Number of requests answered successfully.
    #[must_use]
    pub fn requests_served(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl DataServer for MockDataServer {
    fn handler(&self, options: DataHandlerOptions) -> Router {
        debug!(?options, "building mock data handler");
        self.built_with.lock().push(options.clone());

        let requests = Arc::clone(&self.requests);
        let DataHandlerOptions {
            auth_enabled,
            write_tracing,
            version,
        } = options;

        let router = Router::new().fallback(move |headers: HeaderMap, uri: Uri| async move {
            if auth_enabled && !headers.contains_key(AUTHORIZATION) {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(VERSION_HEADER, version)],
                    "authentication required",
                )
                    .into_response();
            }

            requests.fetch_add(1, Ordering::SeqCst);

            (
                [
                    (SUBSYSTEM_HEADER, "data".to_string()),
                    (VERSION_HEADER, version),
                ],
                uri.path().to_string(),
            )
                .into_response()
        });

        if write_tracing {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn options(auth_enabled: bool) -> DataHandlerOptions {
        DataHandlerOptions {
            auth_enabled,
            write_tracing: true,
            version: "1.2.3".to_string(),
        }
    }

    #[tokio::test]
    async fn test_reports_version() {
        let server = MockDataServer::new();

        let response = server
            .handler(options(false))
            .oneshot(Request::get("/query").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[SUBSYSTEM_HEADER], "data");
        assert_eq!(response.headers()[VERSION_HEADER], "1.2.3");
        assert_eq!(server.handlers_built(), vec![options(false)]);
    }

    #[tokio::test]
    async fn test_requires_authorization_when_enabled() {
        let server = MockDataServer::new();
        let handler = server.handler(options(true));

        let rejected = handler
            .clone()
            .oneshot(Request::get("/query").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);

        let accepted = handler
            .oneshot(
                Request::get("/query")
                    .header(AUTHORIZATION, "Bearer token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(accepted.status(), StatusCode::OK);
        assert_eq!(server.requests_served(), 1);
    }
}
