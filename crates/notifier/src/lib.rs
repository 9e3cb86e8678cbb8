//! Build notification delivery.
//!
//! `Dispatcher` turns one build event into one webhook POST per configured
//! recipient. Delivery is best-effort: at most once, no retry, failures are
//! logged and isolated per recipient.

pub mod client;
pub mod dispatcher;

pub use client::{DeliveryError, WebhookClient, WebhookSender};
pub use dispatcher::{ConfigResolver, DispatchSummary, Dispatcher, PropertyResolver};
