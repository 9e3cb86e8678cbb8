//! Delivery dispatcher.
//!
//! For one build event:
//! 1. Validates the event once (a malformed event is logged and dropped)
//! 2. Resolves each recipient's config via the injected `ConfigResolver`
//! 3. Skips recipients without a webhook URL
//! 4. Formats and sends one message per recipient, concurrently
//!
//! Every delivery has its own failure boundary: errors are logged with the
//! recipient and build context and never reach the caller or sibling
//! deliveries. No retries, no persistence.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::Instrument;
use uuid::Uuid;

use chime_common::types::{BuildEvent, EventCategory, Recipient, RecipientConfig};
use chime_engine::MessageFormatter;

use crate::client::WebhookSender;

/// Looks up a recipient's notification settings.
pub trait ConfigResolver: Send + Sync {
    fn resolve(&self, recipient: &Recipient) -> RecipientConfig;
}

impl<F> ConfigResolver for F
where
    F: Fn(&Recipient) -> RecipientConfig + Send + Sync,
{
    fn resolve(&self, recipient: &Recipient) -> RecipientConfig {
        self(recipient)
    }
}

/// Resolver over raw user property maps, as stored by the build server.
#[derive(Debug, Clone, Default)]
pub struct PropertyResolver {
    properties: HashMap<Recipient, HashMap<String, String>>,
}

impl PropertyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, recipient: Recipient, properties: HashMap<String, String>) {
        self.properties.insert(recipient, properties);
    }
}

impl ConfigResolver for PropertyResolver {
    fn resolve(&self, recipient: &Recipient) -> RecipientConfig {
        self.properties
            .get(recipient)
            .map(RecipientConfig::from_properties)
            .unwrap_or_default()
    }
}

/// Per-recipient result of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Skipped,
    Delivered,
    Failed,
}

/// Counts for one notify cycle. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub notification_id: Uuid,
    pub delivered: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl DispatchSummary {
    fn new(notification_id: Uuid) -> Self {
        Self {
            notification_id,
            delivered: 0,
            failed: 0,
            skipped: 0,
        }
    }

    /// Recipients for which a webhook call was made.
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Fans a build event out to every subscribed recipient's webhook.
#[derive(Clone)]
pub struct Dispatcher {
    formatter: MessageFormatter,
    sender: Arc<dyn WebhookSender>,
}

impl Dispatcher {
    pub fn new(formatter: MessageFormatter, sender: Arc<dyn WebhookSender>) -> Self {
        Self { formatter, sender }
    }

    pub fn formatter(&self) -> &MessageFormatter {
        &self.formatter
    }

    /// Notify `recipients` about `event`.
    ///
    /// Never fails; the returned summary only reports what happened.
    pub async fn notify(
        &self,
        event: &BuildEvent,
        category: EventCategory,
        recipients: &[Recipient],
        resolver: &dyn ConfigResolver,
    ) -> DispatchSummary {
        let notification_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "notify",
            notification_id = %notification_id,
            category = %category,
            build_type_id = %event.build_type_id,
            build_number = %event.build_number,
        );

        async move {
            let mut summary = DispatchSummary::new(notification_id);

            if let Err(reason) = event.validate() {
                tracing::error!(
                    build = %event.full_name,
                    reason = %reason,
                    "Malformed build event, notification dropped"
                );
                return summary;
            }

            let deliveries = recipients
                .iter()
                .map(|recipient| self.deliver(event, category, recipient, resolver));

            for outcome in join_all(deliveries).await {
                match outcome {
                    Outcome::Delivered => summary.delivered += 1,
                    Outcome::Failed => summary.failed += 1,
                    Outcome::Skipped => summary.skipped += 1,
                }
            }

            tracing::info!(
                delivered = summary.delivered,
                failed = summary.failed,
                skipped = summary.skipped,
                "Build notification dispatched"
            );

            summary
        }
        .instrument(span)
        .await
    }

    /// Deliver to a single recipient. All failures end here.
    async fn deliver(
        &self,
        event: &BuildEvent,
        category: EventCategory,
        recipient: &Recipient,
        resolver: &dyn ConfigResolver,
    ) -> Outcome {
        let config = resolver.resolve(recipient);

        let Some(url) = config.webhook() else {
            tracing::debug!(recipient = %recipient, "No webhook configured, skipping recipient");
            return Outcome::Skipped;
        };

        let message = self.formatter.format(event, category, config.verbose);

        match self.sender.send(url, &message).await {
            Ok(()) => {
                tracing::debug!(recipient = %recipient, "Notification delivered");
                Outcome::Delivered
            }
            Err(e) => {
                tracing::error!(
                    recipient = %recipient,
                    build = %event.full_name,
                    error = %e,
                    "Error sending notification"
                );
                Outcome::Failed
            }
        }
    }
}
