//! Eligibility gate — decides whether a notification must be suppressed.
//!
//! Rules are evaluated in order and the first match wins:
//! 1. No authenticated actor
//! 2. Actor opted out (or the host has no opt-out attribute at all)
//! 3. Private issue

use threadline_common::config::NotificationSettings;
use threadline_common::types::{Actor, Issue};

/// Opt-out value meaning "notifications enabled".
const OPTED_IN: &str = "0";

/// Why a notification was suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    NoActor,
    /// The host schema has no opt-out attribute, so consent cannot be confirmed.
    OptOutFieldUndefined,
    OptedOut,
    PrivateIssue,
}

impl std::fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuppressReason::NoActor => write!(f, "no_actor"),
            SuppressReason::OptOutFieldUndefined => write!(f, "opt_out_field_undefined"),
            SuppressReason::OptedOut => write!(f, "opted_out"),
            SuppressReason::PrivateIssue => write!(f, "private_issue"),
        }
    }
}

/// Stateless suppression check.
pub struct EligibilityGate;

impl EligibilityGate {
    /// Return the first suppression rule that matches, or `None` if the
    /// notification may proceed.
    pub fn check(
        settings: &NotificationSettings,
        actor: Option<&Actor>,
        issue: &Issue,
    ) -> Option<SuppressReason> {
        let Some(actor) = actor else {
            return Some(SuppressReason::NoActor);
        };

        if !settings.user_opt_out_field {
            return Some(SuppressReason::OptOutFieldUndefined);
        }

        if let Some(value) = actor.opt_out.as_deref()
            && value != OPTED_IN
        {
            return Some(SuppressReason::OptedOut);
        }

        if issue.is_private {
            return Some(SuppressReason::PrivateIssue);
        }

        None
    }

    pub fn should_suppress(
        settings: &NotificationSettings,
        actor: Option<&Actor>,
        issue: &Issue,
    ) -> bool {
        Self::check(settings, actor, issue).is_some()
    }
}
