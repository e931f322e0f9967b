//! Notification pipeline.
//!
//! Runs once per issue-creation event:
//! 1. Check eligibility (via `EligibilityGate`)
//! 2. Resolve the webhook through the project hierarchy (via `DestinationResolver`)
//! 3. Derive the thread key and build the delivery URL
//! 4. Render the message (via `MessageFormatter`)
//! 5. Hand it to a `WebhookSender`, which must not block
//!
//! Nothing here returns an error to the host: every failure ends in a
//! `PipelineOutcome` that is only logged.

use std::sync::Arc;

use reqwest::Url;

use threadline_common::config::NotificationSettings;
use threadline_common::types::{IssueCreatedEvent, NotificationPayload};

use crate::formatter::{Labels, MessageFormatter};
use crate::gate::{EligibilityGate, SuppressReason};
use crate::resolver::{DestinationResolver, ProjectTree};
use crate::thread_key::WebhookDestination;

/// Fire-and-forget delivery of a rendered notification.
///
/// Implementations must return immediately and must not surface delivery
/// failures to the caller.
pub trait WebhookSender: Send + Sync {
    fn send(&self, url: Url, payload: NotificationPayload);
}

/// Why a notification was dropped after passing the eligibility gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// No webhook anywhere in the hierarchy and no usable default.
    NoDestination,
    /// The delivery URL built from the webhook is not an HTTP(S) URL.
    MalformedUrl,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::NoDestination => write!(f, "no_destination"),
            AbortReason::MalformedUrl => write!(f, "malformed_url"),
        }
    }
}

/// Terminal state of one pipeline pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Dispatched { url: Url },
    Suppressed(SuppressReason),
    Aborted(AbortReason),
}

impl std::fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineOutcome::Dispatched { .. } => write!(f, "dispatched"),
            PipelineOutcome::Suppressed(reason) => write!(f, "suppressed:{}", reason),
            PipelineOutcome::Aborted(reason) => write!(f, "aborted:{}", reason),
        }
    }
}

/// Orchestrates the notification steps for issue-creation events.
pub struct NotificationPipeline {
    formatter: MessageFormatter,
    sender: Arc<dyn WebhookSender>,
}

impl NotificationPipeline {
    pub fn new(sender: Arc<dyn WebhookSender>) -> Self {
        Self::with_labels(sender, Labels::default())
    }

    pub fn with_labels(sender: Arc<dyn WebhookSender>, labels: Labels) -> Self {
        Self {
            formatter: MessageFormatter::new(labels),
            sender,
        }
    }

    /// Host hook, called after an issue has been created.
    ///
    /// `settings` is read as-is for this event only.
    pub fn on_issue_created(
        &self,
        event: &IssueCreatedEvent,
        settings: &NotificationSettings,
    ) -> PipelineOutcome {
        let issue = &event.issue;

        if let Some(reason) = EligibilityGate::check(settings, event.actor.as_ref(), issue) {
            tracing::debug!(issue_id = issue.id, reason = %reason, "Notification suppressed");
            return PipelineOutcome::Suppressed(reason);
        }

        let tree = ProjectTree::new(event.projects.iter().cloned());
        let Some(webhook) = DestinationResolver::new(&tree, settings).resolve(Some(issue.project.id))
        else {
            tracing::debug!(
                issue_id = issue.id,
                project_id = issue.project.id,
                "No webhook configured, notification aborted"
            );
            return PipelineOutcome::Aborted(AbortReason::NoDestination);
        };

        let destination = WebhookDestination::new(webhook, &issue.url);
        let Some(url) = destination.delivery_url() else {
            tracing::warn!(
                issue_id = issue.id,
                webhook = %destination.webhook,
                "Webhook is not deliverable, notification aborted"
            );
            return PipelineOutcome::Aborted(AbortReason::MalformedUrl);
        };

        let payload = self.formatter.format(issue);

        tracing::debug!(
            issue_id = issue.id,
            thread_key = %destination.thread_key,
            url = %url,
            "Dispatching notification"
        );
        self.sender.send(url.clone(), payload);

        PipelineOutcome::Dispatched { url }
    }
}
