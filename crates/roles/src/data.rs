use axum::Router;

/// Policy the data handler is built with.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DataHandlerOptions {
    /// Whether client requests must authenticate.
    pub auth_enabled: bool,

    /// Whether every write is trace-logged.
    pub write_tracing: bool,

    /// Version string reported to clients.
    pub version: String,
}

/// A local data-serving endpoint.
pub trait DataServer
where
    Self: Clone + Send + Sync + 'static,
{
    /// Builds the HTTP handler serving client queries.
    ///
    /// Called once per router; the returned handler is reused for every
    /// request.
    fn handler(&self, options: DataHandlerOptions) -> Router;
}
