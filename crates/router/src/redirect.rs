use axum::http::Uri;
use url::Url;

/// Resolve where a broker request should be redirected.
///
/// Always the first known peer; callers cache the redirect and retry against
/// it, so there is no balancing across peers here. The request path and
/// query are kept and appended to the peer's own base path.
///
/// Returns `None` when no peer is known.
#[must_use]
pub fn redirect_target(peers: &[Url], uri: &Uri) -> Option<Url> {
    let peer = peers.first()?;

    let mut target = peer.clone();
    let base = peer.path().trim_end_matches('/');
    target.set_path(&format!("{base}{}", uri.path()));
    target.set_query(uri.query());
    target.set_fragment(None);

    Some(target)
}
