//! Outbound delivery of chat notifications over HTTP webhooks.

pub mod dispatcher;

pub use dispatcher::{DeliveryError, WebhookDispatcher};
