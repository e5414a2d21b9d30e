use crate::{
    adapters::http::app_state::AppState,
    infra::{InfraError, config::AppConfig, postgres_persistence, scheduler::Scheduler},
    use_cases::{
        account::{AccountRepo, AccountUseCases},
        dashboard::DashboardUseCases,
        expiration::ExpirationUseCases,
        options::OptionStore,
        webhook::WebhookUseCases,
    },
};
use env_helpers::get_env_default;
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);

    let account_repo_arc = postgres_arc.clone() as Arc<dyn AccountRepo>;
    let option_store_arc = postgres_arc.clone() as Arc<dyn OptionStore>;

    let account_use_cases = Arc::new(AccountUseCases::new(account_repo_arc));

    let webhook_use_cases =
        WebhookUseCases::new(account_use_cases.clone(), option_store_arc.clone());

    let dashboard_use_cases =
        DashboardUseCases::new(account_use_cases.clone(), option_store_arc);

    let expiration_use_cases = ExpirationUseCases::new(account_use_cases, config.site_offset);

    Ok(AppState {
        config: Arc::new(config),
        webhook_use_cases: Arc::new(webhook_use_cases),
        dashboard_use_cases: Arc::new(dashboard_use_cases),
        expiration_use_cases: Arc::new(expiration_use_cases),
        scheduler: Arc::new(Scheduler::new()),
    })
}

pub fn init_tracing() -> Result<(), InfraError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "member_webhook=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don't show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs)
    let path: String = get_env_default("LOG_FILE", "app.log".to_string());
    let file = File::create(&path).map_err(|source| InfraError::LogFile { path, source })?;
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    Ok(())
}
