//! Shared application state for the Axum API server.

use std::sync::Arc;

use chime_common::config::AppConfig;
use chime_engine::MessageFormatter;
use chime_notifier::{Dispatcher, WebhookClient};

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub config: AppConfig,
}

impl AppState {
    /// Build state with a real `reqwest` webhook client.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let client = WebhookClient::from_config(&config)?;
        let dispatcher = Dispatcher::new(
            MessageFormatter::new(config.root_url.clone()),
            Arc::new(client),
        );
        Ok(Self::with_dispatcher(dispatcher, config))
    }

    pub fn with_dispatcher(dispatcher: Dispatcher, config: AppConfig) -> Self {
        Self { dispatcher, config }
    }
}
