//! Host event hooks.
//!
//! The issue tracker calls these after persisting an entity. Notification
//! problems never turn into an error response; the outcome is reported for
//! diagnostics only.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use threadline_common::types::IssueCreatedEvent;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/hooks/issue-created", post(issue_created))
}

/// POST /api/hooks/issue-created — Run the notification pipeline for a new issue.
async fn issue_created(
    State(state): State<AppState>,
    Json(event): Json<IssueCreatedEvent>,
) -> (StatusCode, Json<serde_json::Value>) {
    let settings = state.settings_snapshot().await;
    let outcome = state.pipeline.on_issue_created(&event, &settings);

    tracing::info!(
        issue_id = event.issue.id,
        project_id = event.issue.project.id,
        outcome = %outcome,
        "Issue created event processed"
    );

    (
        StatusCode::ACCEPTED,
        Json(json!({
            "issue_id": event.issue.id,
            "outcome": outcome.to_string(),
        })),
    )
}
