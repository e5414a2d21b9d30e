pub mod admin;
pub mod webhook;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest(&format!("/{}", webhook::WEBHOOK_NAMESPACE), webhook::router())
        .nest("/admin/mywebhook", admin::router())
}
