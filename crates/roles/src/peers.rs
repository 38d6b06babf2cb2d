use url::Url;

/// Read-only view of the broker locations known to this node.
///
/// Contents may change at any time as cluster topology changes, so
/// implementations must be safe to read concurrently and callers must not
/// hold on to a listing across requests.
pub trait PeerAddressSet
where
    Self: Clone + Send + Sync + 'static,
{
    /// Returns the current broker URLs in preference order.
    fn list(&self) -> Vec<Url>;
}
