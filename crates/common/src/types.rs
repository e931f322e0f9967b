use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference from an issue to the project it was filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: u64,
    pub name: String,
}

/// Snapshot of a freshly created issue, as handed over by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub subject: String,
    /// Free-form body text. Hosts send `null` for issues without one.
    #[serde(default)]
    pub description: Option<String>,
    /// Display name of the issue author.
    pub author: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub project: ProjectRef,
    /// Tracker name, e.g. "Bug" or "Feature".
    pub tracker: String,
    #[serde(default)]
    pub is_private: bool,
    /// Notes attached to the issue's current journal entry, if any.
    #[serde(default)]
    pub notes: Option<String>,
    /// Canonical, publicly reachable URL of the issue.
    pub url: String,
}

/// A node in the host's project tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    /// Parent project ID. `None` for root projects.
    #[serde(default)]
    pub parent_id: Option<u64>,
    /// Value of the per-project webhook attribute, unvalidated.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// The user whose action created the issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: u64,
    pub name: String,
    /// Raw value of the per-user opt-out attribute. `None` when the user
    /// never set it.
    #[serde(default)]
    pub opt_out: Option<String>,
}

/// Event emitted by the host after an issue has been persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueCreatedEvent {
    pub issue: Issue,
    /// The issue's project and its ancestors. Order does not matter.
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Authenticated user of the request, absent for anonymous or
    /// system-initiated creations.
    #[serde(default)]
    pub actor: Option<Actor>,
}

/// Message body posted to the chat webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub text: String,
}

impl NotificationPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
