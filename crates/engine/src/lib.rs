//! Notification engine: eligibility, destination resolution, thread keys,
//! message rendering and the pipeline tying them together.

pub mod formatter;
pub mod gate;
pub mod pipeline;
pub mod resolver;
pub mod thread_key;

#[cfg(test)]
mod test_support;

pub use formatter::{Labels, MessageFormatter};
pub use gate::{EligibilityGate, SuppressReason};
pub use pipeline::{AbortReason, NotificationPipeline, PipelineOutcome, WebhookSender};
pub use resolver::{DestinationResolver, ProjectHierarchy, ProjectTree};
pub use thread_key::{WebhookDestination, derive_thread_key, is_deliverable};
