use crate::classifier::Route;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A configured route prefix is unusable.
    #[error("invalid route prefix {0:?}: {1}")]
    InvalidPrefix(String, &'static str),

    /// No local broker and no broker peer to redirect to.
    #[error("no broker is available to serve messaging requests")]
    NoBrokerAvailable,

    /// The targeted subsystem is not hosted here and cannot be redirected.
    #[error("node does not serve {subsystem} requests")]
    SubsystemAbsent {
        /// The subsystem the request was routed to.
        subsystem: Route,

        /// The subsystems this node does serve.
        served: Vec<Route>,
    },
}

impl Error {
    /// Machine-readable code included in error responses.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidPrefix(..) => "invalid_prefix",
            Self::NoBrokerAvailable => "no_broker_available",
            Self::SubsystemAbsent { .. } => "subsystem_absent",
        }
    }

    /// HTTP status the error is reported with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPrefix(..) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoBrokerAvailable | Self::SubsystemAbsent { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    subsystem: Option<Route>,
    #[serde(skip_serializing_if = "Option::is_none")]
    roles: Option<&'a [Route]>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (subsystem, roles) = match &self {
            Self::InvalidPrefix(..) => (None, None),
            Self::NoBrokerAvailable => (Some(Route::Broker), None),
            Self::SubsystemAbsent { subsystem, served } => {
                (Some(*subsystem), Some(served.as_slice()))
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
            code: self.code(),
            subsystem,
            roles,
        };

        (self.status(), Json(body)).into_response()
    }
}
