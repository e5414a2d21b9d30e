use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Utc};
use tracing::instrument;

use crate::app_error::AppResult;
use crate::application::use_cases::account::AccountUseCases;

/// Deactivates accounts whose stored expiration date has passed.
#[derive(Clone)]
pub struct ExpirationUseCases {
    accounts: Arc<AccountUseCases>,
    site_offset: FixedOffset,
}

impl ExpirationUseCases {
    pub fn new(accounts: Arc<AccountUseCases>, site_offset: FixedOffset) -> Self {
        Self {
            accounts,
            site_offset,
        }
    }

    /// Current calendar date in the site's timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.site_offset).date_naive()
    }

    pub async fn run(&self) -> AppResult<usize> {
        self.deactivate_expired(self.today()).await
    }

    /// Deactivates every account that expired strictly before `today`.
    /// Returns how many accounts actually lost their roles.
    #[instrument(skip(self))]
    pub async fn deactivate_expired(&self, today: NaiveDate) -> AppResult<usize> {
        let expired = self.accounts.expired_before(today).await?;
        let mut deactivated = 0;

        for account_id in &expired {
            match self.accounts.set_inactive(*account_id).await {
                Ok(true) => deactivated += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(account_id = %account_id, error = ?e, "Failed to deactivate expired account");
                }
            }
        }

        tracing::info!(
            matched = expired.len(),
            deactivated,
            "Expiration sweep finished"
        );
        Ok(deactivated)
    }
}
