//! Notificator registration info.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use chime_common::types::{
    NOTIFICATOR_DISPLAY_NAME, NOTIFICATOR_TYPE, PropertyInfo, user_properties,
};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct NotificatorInfo {
    #[serde(rename = "type")]
    pub notificator_type: &'static str,
    pub display_name: &'static str,
    pub properties: Vec<PropertyInfo>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/notificator", get(notificator_info))
}

/// GET /api/notificator — Describe the user properties the build server should collect.
async fn notificator_info() -> Json<NotificatorInfo> {
    Json(NotificatorInfo {
        notificator_type: NOTIFICATOR_TYPE,
        display_name: NOTIFICATOR_DISPLAY_NAME,
        properties: user_properties(),
    })
}
