//! Webhook dispatcher — posts rendered notifications to the chat backend.
//!
//! Each notification gets exactly one delivery attempt on a spawned tokio
//! task. Failures are logged with the target URL and dropped; the caller
//! has already moved on by the time the request completes.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, NoProxy, Proxy, StatusCode, Url};
use thiserror::Error;
use tokio::task::JoinHandle;
use uuid::Uuid;

use threadline_common::types::NotificationPayload;
use threadline_engine::WebhookSender;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Longest error response body kept in a `DeliveryError`.
pub const MAX_ERROR_BODY_BYTES: usize = 512;

/// Reasons a single delivery attempt failed.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Webhook returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// reqwest-backed [`WebhookSender`].
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    timeout: Duration,
}

impl WebhookDispatcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Perform one POST and report the result.
    pub async fn deliver(
        &self,
        url: Url,
        payload: &NotificationPayload,
    ) -> Result<(), DeliveryError> {
        self.deliver_via(url, payload, https_proxy_from_env().as_deref())
            .await
    }

    async fn deliver_via(
        &self,
        url: Url,
        payload: &NotificationPayload,
        proxy: Option<&str>,
    ) -> Result<(), DeliveryError> {
        let client = self.build_client(proxy)?;

        let response = client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = truncate_body(response.text().await.unwrap_or_default());
            return Err(DeliveryError::Status { status, body });
        }

        Ok(())
    }

    /// Spawn the delivery and return immediately.
    ///
    /// Returns `None` when called outside a tokio runtime; the notification is
    /// dropped in that case.
    pub fn dispatch(&self, url: Url, payload: NotificationPayload) -> Option<JoinHandle<()>> {
        let delivery_id = Uuid::new_v4();

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(
                    delivery_id = %delivery_id,
                    url = %url,
                    error = %e,
                    "No async runtime available, notification dropped"
                );
                return None;
            }
        };

        tracing::debug!(delivery_id = %delivery_id, url = %url, "Webhook URL");
        tracing::debug!(delivery_id = %delivery_id, text = %payload.text, "Webhook data");

        let dispatcher = self.clone();
        Some(runtime.spawn(async move {
            match dispatcher.deliver(url.clone(), &payload).await {
                Ok(()) => {
                    tracing::info!(delivery_id = %delivery_id, url = %url, "Notification delivered");
                }
                Err(e) => {
                    tracing::warn!(
                        delivery_id = %delivery_id,
                        url = %url,
                        error = %e,
                        "Cannot deliver notification"
                    );
                }
            }
        }))
    }

    /// Built per delivery so the proxy is read from the environment each time.
    /// All schemes go through the proxy except hosts listed in `NO_PROXY`.
    fn build_client(&self, proxy: Option<&str>) -> Result<Client, DeliveryError> {
        let mut builder = Client::builder().timeout(self.timeout).no_proxy();

        if let Some(proxy) = proxy {
            let proxy = Proxy::all(proxy)
                .map_err(DeliveryError::Client)?
                .no_proxy(NoProxy::from_env());
            builder = builder.proxy(proxy);
        }

        builder.build().map_err(DeliveryError::Client)
    }
}

impl Default for WebhookDispatcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl WebhookSender for WebhookDispatcher {
    fn send(&self, url: Url, payload: NotificationPayload) {
        self.dispatch(url, payload);
    }
}

fn https_proxy_from_env() -> Option<String> {
    first_non_empty([
        std::env::var("https_proxy").ok(),
        std::env::var("HTTPS_PROXY").ok(),
    ])
}

/// Keep at most `MAX_ERROR_BODY_BYTES` of a response body, cut on a char boundary.
fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY_BYTES {
        let mut end = MAX_ERROR_BODY_BYTES;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}

fn first_non_empty<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::POST;
    use httpmock::MockServer;

    fn payload() -> NotificationPayload {
        NotificationPayload::new("*Updated:2024-05-01 09:30:00 UTC*")
    }

    fn refused_url() -> Url {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        Url::parse(&format!("http://127.0.0.1:{}/hook", port)).unwrap()
    }

    #[tokio::test]
    async fn test_deliver_posts_json_text() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/hook")
                    .query_param("thread_key", "abc123")
                    .header("content-type", "application/json")
                    .json_body(serde_json::json!({ "text": "*Updated:2024-05-01 09:30:00 UTC*" }));
                then.status(200);
            })
            .await;

        let url = Url::parse(&server.url("/hook?thread_key=abc123")).unwrap();
        WebhookDispatcher::default()
            .deliver(url, &payload())
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(500).body("backend down");
            })
            .await;

        let url = Url::parse(&server.url("/hook")).unwrap();
        let err = WebhookDispatcher::default()
            .deliver(url, &payload())
            .await
            .unwrap_err();

        match err {
            DeliveryError::Status { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "backend down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let err = WebhookDispatcher::default()
            .deliver(refused_url(), &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/slow");
                then.status(200).delay(Duration::from_millis(500));
            })
            .await;

        let url = Url::parse(&server.url("/slow")).unwrap();
        let err = WebhookDispatcher::new(Duration::from_millis(50))
            .deliver(url, &payload())
            .await
            .unwrap_err();

        match err {
            DeliveryError::Transport(e) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_dispatch_swallows_failure() {
        let handle = WebhookDispatcher::default()
            .dispatch(refused_url(), payload())
            .expect("runtime available");

        // The task completes normally even though delivery failed.
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_dispatch_delivers_in_background() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(200);
            })
            .await;

        let url = Url::parse(&server.url("/hook")).unwrap();
        let handle = WebhookDispatcher::default()
            .dispatch(url, payload())
            .unwrap();
        handle.await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_plain_http_webhook_goes_through_proxy() {
        let proxy = MockServer::start_async().await;
        let mock = proxy
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/hook")
                    .query_param("thread_key", "abc");
                then.status(200);
            })
            .await;

        let url = Url::parse("http://chat.invalid/hook?thread_key=abc").unwrap();
        WebhookDispatcher::default()
            .deliver_via(url, &payload(), Some(&proxy.base_url()))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_long_error_body_is_capped() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(502).body("x".repeat(10_000));
            })
            .await;

        let url = Url::parse(&server.url("/hook")).unwrap();
        let err = WebhookDispatcher::default()
            .deliver(url, &payload())
            .await
            .unwrap_err();

        match err {
            DeliveryError::Status { body, .. } => assert_eq!(body.len(), MAX_ERROR_BODY_BYTES),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_truncate_body_respects_char_boundary() {
        let body = format!("{}é", "a".repeat(MAX_ERROR_BODY_BYTES - 1));
        let truncated = truncate_body(body);
        assert_eq!(truncated.len(), MAX_ERROR_BODY_BYTES - 1);
        assert_eq!(truncate_body("short".to_string()), "short");
    }

    #[test]
    fn test_send_without_runtime_does_not_panic() {
        WebhookDispatcher::default().send(refused_url(), payload());
        assert!(WebhookDispatcher::default().dispatch(refused_url(), payload()).is_none());
    }

    #[test]
    fn test_proxy_lowercase_takes_precedence() {
        assert_eq!(
            first_non_empty([
                Some("http://lower:3128".to_string()),
                Some("http://upper:3128".to_string()),
            ]),
            Some("http://lower:3128".to_string())
        );
        assert_eq!(
            first_non_empty([Some("  ".to_string()), Some("http://upper:3128".to_string())]),
            Some("http://upper:3128".to_string())
        );
        assert_eq!(first_non_empty([None, None]), None);
    }
}
