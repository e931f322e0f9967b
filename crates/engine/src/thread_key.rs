//! Thread key derivation.
//!
//! Chat backends group messages posted with the same `thread_key` into one
//! thread. The key is the MD5 of the issue URL so every notification about
//! an issue lands in the same thread.

use reqwest::Url;

/// Query parameter carrying the thread key.
pub const THREAD_KEY_PARAM: &str = "thread_key";

/// Hex-encoded MD5 of the issue's canonical URL.
pub fn derive_thread_key(canonical_url: &str) -> String {
    format!("{:x}", md5::compute(canonical_url.as_bytes()))
}

/// Whether `url` can be posted to: an `http`/`https` scheme with a host.
pub fn is_deliverable(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
}

/// Resolved webhook plus the thread key for one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookDestination {
    pub webhook: Url,
    pub thread_key: String,
}

impl WebhookDestination {
    pub fn new(webhook: Url, canonical_url: &str) -> Self {
        Self {
            webhook,
            thread_key: derive_thread_key(canonical_url),
        }
    }

    /// The webhook with `thread_key` appended to its query string.
    ///
    /// Returns `None` when the result is not deliverable over HTTP(S).
    pub fn delivery_url(&self) -> Option<Url> {
        let mut url = self.webhook.clone();
        url.query_pairs_mut()
            .append_pair(THREAD_KEY_PARAM, &self.thread_key);

        is_deliverable(&url).then_some(url)
    }
}
