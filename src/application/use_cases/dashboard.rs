use std::sync::Arc;

use serde::Serialize;

use crate::app_error::AppResult;
use crate::application::use_cases::account::AccountUseCases;
use crate::application::use_cases::options::{INVALID_REQUESTS_COUNT, OptionStore};
use crate::domain::entities::account::AccountStatus;

/// Counters shown on the admin page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WebhookStats {
    /// Accounts created by the webhook.
    pub new_users: usize,
    pub active_users: usize,
    pub inactive_users: usize,
    pub invalid_requests: i64,
}

#[derive(Clone)]
pub struct DashboardUseCases {
    accounts: Arc<AccountUseCases>,
    options: Arc<dyn OptionStore>,
}

impl DashboardUseCases {
    pub fn new(accounts: Arc<AccountUseCases>, options: Arc<dyn OptionStore>) -> Self {
        Self { accounts, options }
    }

    pub async fn stats(&self) -> AppResult<WebhookStats> {
        let managed = self.accounts.managed_accounts().await?;

        let count = |status: AccountStatus| managed.iter().filter(|a| a.status() == status).count();

        Ok(WebhookStats {
            new_users: managed.len(),
            active_users: count(AccountStatus::Active),
            inactive_users: count(AccountStatus::Inactive),
            invalid_requests: self.options.get_int(INVALID_REQUESTS_COUNT).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::application::use_cases::webhook::WebhookUseCases;
    use crate::test_utils::{InMemoryAccountRepo, InMemoryOptionStore, create_test_account};

    #[tokio::test]
    async fn counts_follow_webhook_events() {
        let outsider = create_test_account(|a| a.email = "admin@example.com".into());
        let repo = Arc::new(InMemoryAccountRepo::with_accounts(vec![outsider]));
        let options = Arc::new(InMemoryOptionStore::new());
        let accounts = Arc::new(AccountUseCases::new(repo));
        let webhook = WebhookUseCases::new(accounts.clone(), options.clone());
        let dashboard = DashboardUseCases::new(accounts, options);

        for email in ["a@example.com", "b@example.com", "c@example.com"] {
            let data = json!(json!({ "status": true, "email": email }).to_string());
            webhook.handle(Some(&data)).await.unwrap();
        }
        let cancel = json!(json!({ "status": "cancel", "email": "b@example.com" }).to_string());
        webhook.handle(Some(&cancel)).await.unwrap();
        webhook.handle(Some(&json!("garbage"))).await.unwrap_err();

        let stats = dashboard.stats().await.unwrap();

        assert_eq!(
            stats,
            WebhookStats {
                new_users: 3,
                active_users: 2,
                inactive_users: 1,
                invalid_requests: 1,
            }
        );
    }

    #[tokio::test]
    async fn empty_store_reports_zeroes() {
        let repo = Arc::new(InMemoryAccountRepo::new());
        let options = Arc::new(InMemoryOptionStore::new());
        let dashboard = DashboardUseCases::new(Arc::new(AccountUseCases::new(repo)), options);

        let stats = dashboard.stats().await.unwrap();

        assert_eq!(stats.new_users, 0);
        assert_eq!(stats.active_users, 0);
        assert_eq!(stats.inactive_users, 0);
        assert_eq!(stats.invalid_requests, 0);
    }
}
