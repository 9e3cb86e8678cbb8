//! Build event intake.
//!
//! The build server posts one request per lifecycle event, carrying the
//! build snapshot and the subscribed recipients with their stored user
//! properties. Delivery results are only logged; the caller always gets
//! `202 Accepted` for a well-formed event.

use std::collections::{HashMap, HashSet};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use chime_common::error::AppError;
use chime_common::types::{BuildEvent, EventCategory, Recipient};
use chime_notifier::PropertyResolver;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub category: EventCategory,
    pub build: BuildEvent,
    #[serde(default)]
    pub recipients: Vec<RecipientEntry>,
}

/// A subscribed user and their notificator properties.
#[derive(Debug, Deserialize)]
pub struct RecipientEntry {
    pub id: Recipient,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/notify", post(notify))
}

/// POST /api/notify — Dispatch a build lifecycle event.
async fn notify(
    State(state): State<AppState>,
    Json(request): Json<NotifyRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    request.build.validate().map_err(AppError::Validation)?;

    let mut resolver = PropertyResolver::new();
    let mut seen = HashSet::new();
    let mut recipients = Vec::with_capacity(request.recipients.len());
    for entry in request.recipients {
        if seen.insert(entry.id.clone()) {
            recipients.push(entry.id.clone());
        }
        resolver.insert(entry.id, entry.properties);
    }
    let recipient_count = recipients.len();

    let dispatcher = state.dispatcher.clone();
    let build = request.build;
    let category = request.category;

    // Run on its own task so a panic in one dispatch cannot take down the handler.
    let summary = tokio::spawn(async move {
        dispatcher
            .notify(&build, category, &recipients, &resolver)
            .await
    })
    .await
    .map_err(|e| {
        tracing::error!(category = %category, error = %e, "Dispatch task failed");
        AppError::Internal(format!("Dispatch task failed: {e}"))
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "notification_id": summary.notification_id,
            "recipients": recipient_count,
        })),
    ))
}
