use std::sync::Arc;

use meridian_roles::PeerAddressSet;
use parking_lot::RwLock;
use url::Url;

/// Peer address set held in memory and shared between clones.
#[derive(Clone, Debug, Default)]
pub struct MemoryPeerAddressSet {
    urls: Arc<RwLock<Vec<Url>>>,
}

impl MemoryPeerAddressSet {
    /// Create a new set holding the given broker URLs.
    #[must_use]
    pub fn new(urls: Vec<Url>) -> Self {
        Self {
            urls: Arc::new(RwLock::new(urls)),
        }
    }

    /// Replace the known broker URLs, as a topology change would.
    pub fn replace(&self, urls: Vec<Url>) {
        *self.urls.write() = urls;
    }
}

impl PeerAddressSet for MemoryPeerAddressSet {
    fn list(&self) -> Vec<Url> {
        self.urls.read().clone()
    }
}
