use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::domain::entities::account::{
    AccountStatus, EXPIRATION_DATE_FORMAT, META_CREATED_BY_PLUGIN, META_EXPIRATION,
    SUBSCRIBER_ROLE,
};
use crate::infra::password::{generate_password, hash_password};

/// Length of the random password given to accounts created by the webhook.
pub const GENERATED_PASSWORD_LEN: usize = 12;

// ============================================================================
// Repository Trait
// ============================================================================

#[async_trait]
pub trait AccountRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<AccountProfile>>;

    async fn get_by_email(&self, email: &str) -> AppResult<Option<AccountProfile>>;

    /// Inserts the account together with its names and metadata. Nothing is
    /// stored when any part fails.
    async fn create(&self, account: &NewAccount<'_>) -> AppResult<AccountProfile>;

    async fn update_names(&self, id: Uuid, display_name: &str, nickname: &str) -> AppResult<()>;

    /// Replaces the whole role set in one write.
    async fn set_roles(&self, id: Uuid, roles: &[&str]) -> AppResult<()>;

    async fn set_meta(&self, id: Uuid, key: &str, value: &str) -> AppResult<()>;

    async fn list_by_meta(&self, key: &str, value: &str) -> AppResult<Vec<AccountProfile>>;

    /// Ids of accounts whose `key` metadata sorts strictly before `before`.
    async fn list_ids_with_meta_before(&self, key: &str, before: &str) -> AppResult<Vec<Uuid>>;
}

// ============================================================================
// Profile Types
// ============================================================================

/// Everything written when an account is created.
#[derive(Debug, Clone, Copy)]
pub struct NewAccount<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub display_name: &'a str,
    pub nickname: &'a str,
    pub meta: &'a [(&'a str, &'a str)],
}

#[derive(Debug, Clone)]
pub struct AccountProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub nickname: String,
    pub roles: Vec<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl AccountProfile {
    pub fn status(&self) -> AccountStatus {
        AccountStatus::from_roles(&self.roles)
    }
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct AccountUseCases {
    repo: Arc<dyn AccountRepo>,
}

impl AccountUseCases {
    pub fn new(repo: Arc<dyn AccountRepo>) -> Self {
        Self { repo }
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<AccountProfile>> {
        self.repo.get_by_email(email).await
    }

    /// Creates an account owned by the webhook, with a throwaway random password.
    /// Store failures come back as `AccountCreation` carrying the store's message.
    #[instrument(skip(self))]
    pub async fn create_managed(&self, email: &str, name: &str) -> AppResult<AccountProfile> {
        let password = generate_password(GENERATED_PASSWORD_LEN);
        let password_hash = hash_password(&password)?;

        let account = self
            .repo
            .create(&NewAccount {
                username: email,
                email,
                password_hash: &password_hash,
                display_name: name,
                nickname: name,
                meta: &[(META_CREATED_BY_PLUGIN, "1")],
            })
            .await
            .map_err(creation_error)?;

        tracing::info!(account_id = %account.id, email = %email, "Created account");
        Ok(account)
    }

    pub async fn rename(&self, id: Uuid, name: &str) -> AppResult<()> {
        self.repo
            .update_names(id, name, name)
            .await
            .map_err(store_failure)
    }

    pub async fn set_expiration(&self, id: Uuid, date: NaiveDate) -> AppResult<()> {
        let value = date.format(EXPIRATION_DATE_FORMAT).to_string();
        self.repo
            .set_meta(id, META_EXPIRATION, &value)
            .await
            .map_err(store_failure)
    }

    /// Drops every role and grants the subscriber role.
    /// Returns `false` when the account does not exist.
    pub async fn set_active(&self, id: Uuid) -> AppResult<bool> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Ok(false);
        }
        self.repo
            .set_roles(id, &[SUBSCRIBER_ROLE])
            .await
            .map_err(store_failure)?;
        Ok(true)
    }

    /// Drops every role. Returns `true` only when something was removed.
    pub async fn set_inactive(&self, id: Uuid) -> AppResult<bool> {
        let Some(account) = self.repo.get_by_id(id).await? else {
            return Ok(false);
        };
        if account.roles.is_empty() {
            return Ok(false);
        }
        self.repo.set_roles(id, &[]).await.map_err(store_failure)?;
        Ok(true)
    }

    pub async fn expired_before(&self, today: NaiveDate) -> AppResult<Vec<Uuid>> {
        let cutoff = today.format(EXPIRATION_DATE_FORMAT).to_string();
        self.repo
            .list_ids_with_meta_before(META_EXPIRATION, &cutoff)
            .await
    }

    /// Accounts that carry the created-by-webhook flag.
    pub async fn managed_accounts(&self) -> AppResult<Vec<AccountProfile>> {
        self.repo.list_by_meta(META_CREATED_BY_PLUGIN, "1").await
    }
}

fn creation_error(err: AppError) -> AppError {
    match err {
        AppError::InvalidInput(msg) | AppError::Database(msg) | AppError::Internal(msg) => {
            AppError::AccountCreation(msg)
        }
        other => AppError::AccountCreation(other.to_string()),
    }
}

/// Constraint rejections on an existing account are server-side failures,
/// not bad requests.
fn store_failure(err: AppError) -> AppError {
    match err {
        AppError::InvalidInput(msg) => AppError::Database(msg),
        other => other,
    }
}
