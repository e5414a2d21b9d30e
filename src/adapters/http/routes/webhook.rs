//! Inbound billing notification route.

use std::collections::HashMap;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::post,
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::{adapters::http::app_state::AppState, app_error::AppResult};

pub const WEBHOOK_NAMESPACE: &str = "mywebhook/v1";
pub const WEBHOOK_ROUTE: &str = "create-user";

/// Request parameter that carries the JSON-encoded notification.
const DATA_PARAM: &str = "data";

#[derive(Serialize)]
struct WebhookResponse {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<Uuid>,
}

/// POST /{prefix}/mywebhook/v1/create-user
/// Creates, updates, or deactivates the account named in the notification.
async fn create_user(
    State(app_state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let data = extract_data_param(&query, &headers, &body);

    let outcome = app_state.webhook_use_cases.handle(data.as_ref()).await?;

    Ok((
        StatusCode::OK,
        Json(WebhookResponse {
            message: outcome.message(),
            user_id: outcome.account_id(),
        }),
    ))
}

/// Looks up `data` in the body first (JSON or form encoded), then in the query string.
fn extract_data_param(
    query: &HashMap<String, String>,
    headers: &HeaderMap,
    body: &[u8],
) -> Option<JsonValue> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let from_body = if body.is_empty() {
        None
    } else if content_type.starts_with("application/json") {
        serde_json::from_slice::<JsonValue>(body)
            .ok()
            .and_then(|mut v| v.get_mut(DATA_PARAM).map(JsonValue::take))
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        url::form_urlencoded::parse(body)
            .find(|(key, _)| key == DATA_PARAM)
            .map(|(_, value)| JsonValue::String(value.into_owned()))
    } else {
        None
    };

    from_body.or_else(|| query.get(DATA_PARAM).cloned().map(JsonValue::String))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new().route(&format!("/{WEBHOOK_ROUTE}"), post(create_user))
}
