//! Destination resolver — finds the webhook closest to an issue's project.
//!
//! Walks from the issue's project up through its ancestors and returns the
//! first valid per-project webhook. When the walk runs out, the global
//! default from [`NotificationSettings`] is used. Nothing is cached, so a
//! settings change applies to the very next event.

use std::collections::{HashMap, HashSet};

use reqwest::Url;

use threadline_common::config::NotificationSettings;
use threadline_common::types::Project;

/// Maximum number of projects visited before giving up on the walk.
pub const MAX_HIERARCHY_DEPTH: usize = 64;

/// Read access to the host's project tree.
pub trait ProjectHierarchy {
    fn project(&self, id: u64) -> Option<&Project>;
}

/// Project tree built from the snapshot carried on an event.
#[derive(Debug, Clone, Default)]
pub struct ProjectTree {
    projects: HashMap<u64, Project>,
}

impl ProjectTree {
    pub fn new(projects: impl IntoIterator<Item = Project>) -> Self {
        Self {
            projects: projects.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

impl ProjectHierarchy for ProjectTree {
    fn project(&self, id: u64) -> Option<&Project> {
        self.projects.get(&id)
    }
}

/// Hierarchical webhook lookup with global fallback.
pub struct DestinationResolver<'a, H: ProjectHierarchy> {
    hierarchy: &'a H,
    settings: &'a NotificationSettings,
}

impl<'a, H: ProjectHierarchy> DestinationResolver<'a, H> {
    pub fn new(hierarchy: &'a H, settings: &'a NotificationSettings) -> Self {
        Self {
            hierarchy,
            settings,
        }
    }

    /// Resolve the webhook for `project_id`, or for no project at all.
    ///
    /// Returns `None` when neither the hierarchy nor the global default yields
    /// a valid absolute URL.
    pub fn resolve(&self, project_id: Option<u64>) -> Option<Url> {
        let mut visited = HashSet::new();
        let mut current = project_id.and_then(|id| self.hierarchy.project(id));

        while let Some(project) = current {
            if !visited.insert(project.id) {
                tracing::warn!(
                    project_id = project.id,
                    "Cycle in project hierarchy, falling back to default webhook"
                );
                break;
            }
            if visited.len() > MAX_HIERARCHY_DEPTH {
                tracing::warn!(
                    project_id = project.id,
                    max_depth = MAX_HIERARCHY_DEPTH,
                    "Project hierarchy too deep, falling back to default webhook"
                );
                break;
            }

            if let Some(url) = self.project_webhook(project) {
                tracing::debug!(project_id = project.id, url = %url, "Resolved project webhook");
                return Some(url);
            }

            current = project.parent_id.and_then(|id| self.hierarchy.project(id));
        }

        self.default_webhook()
    }

    /// The project's own webhook, if the attribute exists and holds a valid URL.
    fn project_webhook(&self, project: &Project) -> Option<Url> {
        if !self.settings.project_webhook_field {
            return None;
        }

        let raw = project.webhook_url.as_deref()?;
        match parse_absolute(raw) {
            Some(url) => Some(url),
            None => {
                tracing::debug!(
                    project_id = project.id,
                    value = raw,
                    "Ignoring invalid project webhook"
                );
                None
            }
        }
    }

    fn default_webhook(&self) -> Option<Url> {
        let raw = self.settings.default_webhook_url.as_deref()?;
        let url = parse_absolute(raw);
        if url.is_none() {
            tracing::warn!(value = raw, "Default webhook is not a valid URL");
        }
        url
    }
}

/// Parse a configured value as an absolute URI.
pub fn parse_absolute(raw: &str) -> Option<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Url::parse(trimmed).ok()
}
