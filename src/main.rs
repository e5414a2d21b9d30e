use dotenvy::dotenv;
use tracing::info;

use member_webhook::infra::{
    InfraError,
    app::create_app,
    scheduler::{schedule_daily_sweep, unschedule_daily_sweep},
    setup::{init_app_state, init_tracing},
};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let app_state = init_app_state().await?;

    let bind_addr = app_state.config.bind_addr;
    let sweep_every = Duration::from_secs(app_state.config.sweep_interval_secs);

    schedule_daily_sweep(
        &app_state.scheduler,
        app_state.expiration_use_cases.clone(),
        sweep_every,
    );

    let app = create_app(app_state.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(InfraError::TcpBind)?;

    info!("Backend listening at {}", &listener.local_addr()?);
    info!("Webhook URL: {}", app_state.config.webhook_url());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(InfraError::Server)?;

    unschedule_daily_sweep(&app_state.scheduler);
    info!("Shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
