use std::sync::Arc;

use crate::{
    infra::{config::AppConfig, scheduler::Scheduler},
    use_cases::{
        dashboard::DashboardUseCases, expiration::ExpirationUseCases, webhook::WebhookUseCases,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub webhook_use_cases: Arc<WebhookUseCases>,
    pub dashboard_use_cases: Arc<DashboardUseCases>,
    pub expiration_use_cases: Arc<ExpirationUseCases>,
    pub scheduler: Arc<Scheduler>,
}
