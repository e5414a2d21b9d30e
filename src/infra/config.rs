use std::net::SocketAddr;

use chrono::FixedOffset;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use url::Url;

use crate::adapters::http::routes::webhook::{WEBHOOK_NAMESPACE, WEBHOOK_ROUTE};

pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Public base URL of the service, used to render the webhook URL.
    pub site_url: Url,
    /// Path prefix every route is mounted under (e.g. "api").
    pub rest_prefix: String,
    /// Bearer token required by the admin page.
    pub admin_token: SecretString,
    pub sweep_interval_secs: u64,
    /// Offset used to decide what "today" is for the expiration sweep.
    pub site_offset: FixedOffset,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url: String = get_env("DATABASE_URL");
        let bind_addr: SocketAddr =
            get_env_default("BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3001)));
        let site_url: Url = get_env_default(
            "SITE_URL",
            Url::parse("http://localhost:3001").expect("default SITE_URL is valid"),
        );
        let rest_prefix: String = get_env_default("REST_PREFIX", "api".to_string());
        let admin_token: SecretString = SecretString::new(get_env::<String>("ADMIN_TOKEN").into());
        let sweep_interval_secs: u64 = get_env_default("SWEEP_INTERVAL_SECS", 86_400);
        let site_utc_offset_minutes: i32 = get_env_default("SITE_UTC_OFFSET_MINUTES", 0);
        let site_offset = FixedOffset::east_opt(site_utc_offset_minutes * 60)
            .expect("SITE_UTC_OFFSET_MINUTES must be within +/- 24 hours");

        assert!(sweep_interval_secs > 0, "SWEEP_INTERVAL_SECS must be positive");

        Self {
            database_url,
            bind_addr,
            site_url,
            rest_prefix: normalize_prefix(&rest_prefix),
            admin_token,
            sweep_interval_secs,
            site_offset,
        }
    }

    /// Mount path for the router, e.g. "/api". Empty when no prefix is configured.
    pub fn mount_path(&self) -> String {
        if self.rest_prefix.is_empty() {
            String::new()
        } else {
            format!("/{}", self.rest_prefix)
        }
    }

    /// Full URL the billing provider must post notifications to.
    pub fn webhook_url(&self) -> String {
        format!(
            "{}{}/{}/{}",
            self.site_url.as_str().trim_end_matches('/'),
            self.mount_path(),
            WEBHOOK_NAMESPACE,
            WEBHOOK_ROUTE
        )
    }
}

fn normalize_prefix(raw: &str) -> String {
    raw.trim().trim_matches('/').to_string()
}
