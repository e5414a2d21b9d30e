//! Read-only admin dashboard.

use axum::{
    Json, Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
};

use crate::{
    adapters::http::{app_state::AppState, middleware::AdminGuard},
    app_error::AppResult,
    application::use_cases::dashboard::WebhookStats,
};

/// GET /{prefix}/admin/mywebhook
/// Renders the webhook URL and counters as an HTML page.
async fn admin_page(
    _guard: AdminGuard,
    State(app_state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = app_state.dashboard_use_cases.stats().await?;
    Ok(Html(render_admin_page(&app_state.config.webhook_url(), &stats)))
}

/// GET /{prefix}/admin/mywebhook/stats
async fn admin_stats(
    _guard: AdminGuard,
    State(app_state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = app_state.dashboard_use_cases.stats().await?;
    Ok(Json(stats))
}

fn render_admin_page(webhook_url: &str, stats: &WebhookStats) -> String {
    let rows = [
        ("New users (created by the webhook)", stats.new_users as i64),
        ("Active users (subscriber)", stats.active_users as i64),
        ("Inactive users", stats.inactive_users as i64),
        (
            "Invalid requests (missing parameter, bad JSON, ...)",
            stats.invalid_requests,
        ),
    ]
    .iter()
    .map(|(label, value)| {
        format!(
            "<tr><td><strong>{}:</strong></td><td>{}</td></tr>",
            escape_html(label),
            value
        )
    })
    .collect::<Vec<_>>()
    .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Webhook Settings</title></head>
<body>
<div class="wrap">
<h1>Webhook Settings</h1>
<h2>Webhook URL</h2>
<p>Copy this URL into your billing provider so payment notifications arrive here.</p>
<input type="text" readonly style="width: 100%;" value="{url}" />
<hr />
<h2>Statistics</h2>
<table class="widefat" style="max-width:500px;">
<tbody>
{rows}
</tbody>
</table>
</div>
</body>
</html>
"#,
        url = escape_html(webhook_url),
        rows = rows,
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_page))
        .route("/stats", get(admin_stats))
}
