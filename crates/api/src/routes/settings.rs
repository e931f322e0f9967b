//! Notification settings routes.
//!
//! Replacing the settings takes effect for the next event; nothing derived
//! from them is cached.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use threadline_common::config::NotificationSettings;
use threadline_common::error::AppError;
use threadline_engine::is_deliverable;
use threadline_engine::resolver::parse_absolute;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/settings", get(get_settings).put(put_settings))
}

/// GET /api/settings — Current notification settings.
async fn get_settings(State(state): State<AppState>) -> Json<NotificationSettings> {
    Json(state.settings_snapshot().await)
}

/// PUT /api/settings — Replace the notification settings.
async fn put_settings(
    State(state): State<AppState>,
    Json(mut settings): Json<NotificationSettings>,
) -> Result<Json<NotificationSettings>, AppError> {
    settings.default_webhook_url = settings
        .default_webhook_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    if let Some(url) = settings.default_webhook_url.as_deref()
        && !parse_absolute(url).is_some_and(|parsed| is_deliverable(&parsed))
    {
        return Err(AppError::Validation(format!(
            "default_webhook_url '{}' is not an absolute http(s) URL",
            url
        )));
    }

    *state.settings.write().await = settings.clone();
    tracing::info!(
        default_webhook = settings.default_webhook_url.is_some(),
        project_webhook_field = settings.project_webhook_field,
        user_opt_out_field = settings.user_opt_out_field,
        "Notification settings updated"
    );

    Ok(Json(settings))
}
