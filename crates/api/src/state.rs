//! Shared application state for the Axum API server.

use std::sync::Arc;

use tokio::sync::RwLock;

use threadline_common::config::NotificationSettings;
use threadline_engine::NotificationPipeline;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<NotificationPipeline>,
    /// Current settings. Handlers take a snapshot per request.
    pub settings: Arc<RwLock<NotificationSettings>>,
}

impl AppState {
    pub fn new(pipeline: NotificationPipeline, settings: NotificationSettings) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    pub async fn settings_snapshot(&self) -> NotificationSettings {
        self.settings.read().await.clone()
    }
}
