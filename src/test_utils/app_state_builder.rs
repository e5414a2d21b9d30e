//! Test app state builder for HTTP-level integration testing.
//!
//! This module provides `TestAppStateBuilder` which creates a minimal `AppState`
//! with in-memory mocks for testing HTTP endpoints.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::FixedOffset;
use secrecy::SecretString;
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::{
        account::{AccountProfile, AccountUseCases},
        dashboard::DashboardUseCases,
        expiration::ExpirationUseCases,
        webhook::WebhookUseCases,
    },
    infra::{config::AppConfig, scheduler::Scheduler},
    test_utils::{InMemoryAccountRepo, InMemoryOptionStore},
};

/// Bearer token accepted by the admin routes in tests.
pub const TEST_ADMIN_TOKEN: &str = "test_admin_token_12345678";

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// # Example
///
/// ```ignore
/// let account = create_test_account(|a| a.email = "jane@example.com".into());
///
/// let (app_state, accounts, options) = TestAppStateBuilder::new()
///     .with_account(account)
///     .build_with_mocks();
/// ```
pub struct TestAppStateBuilder {
    accounts: Vec<AccountProfile>,
    rest_prefix: String,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            accounts: vec![],
            rest_prefix: "api".to_string(),
        }
    }

    /// Add an account to the test state.
    pub fn with_account(mut self, account: AccountProfile) -> Self {
        self.accounts.push(account);
        self
    }

    /// Set the route prefix (for app-level mounting tests).
    pub fn with_rest_prefix(mut self, rest_prefix: &str) -> Self {
        self.rest_prefix = rest_prefix.to_string();
        self
    }

    /// Build the AppState and hand back the stores for test assertions.
    pub fn build_with_mocks(
        self,
    ) -> (AppState, Arc<InMemoryAccountRepo>, Arc<InMemoryOptionStore>) {
        let account_repo = Arc::new(InMemoryAccountRepo::with_accounts(self.accounts));
        let option_store = Arc::new(InMemoryOptionStore::new());

        let account_use_cases = Arc::new(AccountUseCases::new(account_repo.clone()));
        let site_offset = FixedOffset::east_opt(0).unwrap();

        let webhook_use_cases = Arc::new(WebhookUseCases::new(
            account_use_cases.clone(),
            option_store.clone(),
        ));
        let dashboard_use_cases = Arc::new(DashboardUseCases::new(
            account_use_cases.clone(),
            option_store.clone(),
        ));
        let expiration_use_cases =
            Arc::new(ExpirationUseCases::new(account_use_cases, site_offset));

        // Create minimal config for testing
        let config = Arc::new(AppConfig {
            database_url: String::new(),
            bind_addr: "127.0.0.1:3001".parse::<SocketAddr>().unwrap(),
            site_url: Url::parse("http://localhost:3001").unwrap(),
            rest_prefix: self.rest_prefix,
            admin_token: SecretString::new(TEST_ADMIN_TOKEN.into()),
            sweep_interval_secs: 86_400,
            site_offset,
        });

        let app_state = AppState {
            config,
            webhook_use_cases,
            dashboard_use_cases,
            expiration_use_cases,
            scheduler: Arc::new(Scheduler::new()),
        };

        (app_state, account_repo, option_store)
    }

    pub fn build(self) -> AppState {
        self.build_with_mocks().0
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
