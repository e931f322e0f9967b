//! Message formatter — renders an issue into the chat backend's text markup.
//!
//! The layout is consumed verbatim by the chat client (`*bold*`, `<url|label>`
//! links and triple-backtick blocks), so line order and delimiters must not
//! change.

use threadline_common::types::{Issue, NotificationPayload};

/// Separator placed between the description and the notes.
const NOTES_SEPARATOR_WIDTH: usize = 37;

/// Fence opening and closing the preformatted block.
const FENCE: &str = "```";

/// Localized labels used in the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub updated_on: String,
    pub subject: String,
    /// Template with `{id}` and `{author}` placeholders.
    pub issue_updated: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            updated_on: "Updated".to_string(),
            subject: "Subject".to_string(),
            issue_updated: "Issue {id} has been updated by {author}.".to_string(),
        }
    }
}

impl Labels {
    fn issue_updated(&self, issue: &Issue) -> String {
        self.issue_updated
            .replace("{id}", &format!("#{}", issue.id))
            .replace("{author}", &issue.author)
    }
}

pub struct MessageFormatter {
    labels: Labels,
}

impl MessageFormatter {
    pub fn new(labels: Labels) -> Self {
        Self { labels }
    }

    pub fn format(&self, issue: &Issue) -> NotificationPayload {
        let subject = issue.subject.trim_end();
        let updated_on = issue.updated_on.format("%Y-%m-%d %H:%M:%S UTC");

        let mut text = format!("*{}:{}*", self.labels.updated_on, updated_on);
        text.push_str(&format!(
            "\n*{}:<{}|[{} - {} #{}] {}>*",
            self.labels.subject, issue.url, issue.project.name, issue.tracker, issue.id, subject
        ));
        text.push_str(&format!("\n*URL:* {}", issue.url));
        text.push_str(&format!("\n{}{}", FENCE, self.labels.issue_updated(issue)));
        text.push_str(&format!(
            "\n{}\n",
            issue.description.as_deref().unwrap_or_default()
        ));

        if let Some(notes) = issue.notes.as_deref()
            && !notes.trim().is_empty()
        {
            text.push_str(&format!(
                "\n{}\n{}",
                "-".repeat(NOTES_SEPARATOR_WIDTH),
                notes
            ));
        }

        text.push_str(&format!("\n{}", FENCE));

        NotificationPayload { text }
    }
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new(Labels::default())
    }
}
