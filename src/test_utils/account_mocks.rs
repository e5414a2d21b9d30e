//! In-memory mock implementations for the account and option stores.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::{
        account::{AccountProfile, AccountRepo, NewAccount},
        options::OptionStore,
    },
};

// ============================================================================
// InMemoryAccountRepo
// ============================================================================

/// In-memory implementation of AccountRepo for testing.
#[derive(Default)]
pub struct InMemoryAccountRepo {
    pub accounts: Mutex<HashMap<Uuid, AccountProfile>>,
    pub meta: Mutex<HashMap<(Uuid, String), String>>,
    pub password_hashes: Mutex<HashMap<Uuid, String>>,
    create_error: Mutex<Option<String>>,
    update_error: Mutex<Option<String>>,
}

impl InMemoryAccountRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repo with initial accounts for testing.
    pub fn with_accounts(accounts: Vec<AccountProfile>) -> Self {
        let map: HashMap<Uuid, AccountProfile> = accounts.into_iter().map(|a| (a.id, a)).collect();
        Self {
            accounts: Mutex::new(map),
            ..Self::default()
        }
    }

    /// Make every subsequent `create` fail with this message.
    pub fn fail_creates_with(&self, message: &str) {
        *self.create_error.lock().unwrap() = Some(message.to_string());
    }

    /// Make every subsequent write to an existing account fail with this message.
    pub fn fail_updates_with(&self, message: &str) {
        *self.update_error.lock().unwrap() = Some(message.to_string());
    }

    fn check_update(&self) -> AppResult<()> {
        match self.update_error.lock().unwrap().clone() {
            Some(message) => Err(AppError::InvalidInput(message)),
            None => Ok(()),
        }
    }

    pub fn seed_meta(&self, id: Uuid, key: &str, value: &str) {
        self.meta
            .lock()
            .unwrap()
            .insert((id, key.to_string()), value.to_string());
    }

    pub fn get(&self, id: Uuid) -> Option<AccountProfile> {
        self.accounts.lock().unwrap().get(&id).cloned()
    }

    /// Get all accounts (for test assertions).
    pub fn get_all(&self) -> Vec<AccountProfile> {
        self.accounts.lock().unwrap().values().cloned().collect()
    }

    pub fn meta_value(&self, id: Uuid, key: &str) -> Option<String> {
        self.meta
            .lock()
            .unwrap()
            .get(&(id, key.to_string()))
            .cloned()
    }

    pub fn password_hash(&self, id: Uuid) -> Option<String> {
        self.password_hashes.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl AccountRepo for InMemoryAccountRepo {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<AccountProfile>> {
        Ok(self.get(id))
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<AccountProfile>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, new: &NewAccount<'_>) -> AppResult<AccountProfile> {
        if let Some(message) = self.create_error.lock().unwrap().clone() {
            return Err(AppError::InvalidInput(message));
        }

        let mut accounts = self.accounts.lock().unwrap();

        if accounts
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(new.email))
        {
            return Err(AppError::InvalidInput(
                "Sorry, that email address is already used!".into(),
            ));
        }
        if accounts.values().any(|a| a.username == new.username) {
            return Err(AppError::InvalidInput(
                "Sorry, that username already exists!".into(),
            ));
        }

        let now = chrono::Utc::now().naive_utc();
        let profile = AccountProfile {
            id: Uuid::new_v4(),
            username: new.username.to_string(),
            email: new.email.to_lowercase(),
            display_name: new.display_name.to_string(),
            nickname: new.nickname.to_string(),
            roles: vec![],
            created_at: Some(now),
            updated_at: Some(now),
        };

        accounts.insert(profile.id, profile.clone());
        drop(accounts);

        self.password_hashes
            .lock()
            .unwrap()
            .insert(profile.id, new.password_hash.to_string());
        for (key, value) in new.meta {
            self.seed_meta(profile.id, key, value);
        }
        Ok(profile)
    }

    async fn update_names(&self, id: Uuid, display_name: &str, nickname: &str) -> AppResult<()> {
        self.check_update()?;
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.get_mut(&id).ok_or(AppError::NotFound)?;

        account.display_name = display_name.to_string();
        account.nickname = nickname.to_string();
        account.updated_at = Some(chrono::Utc::now().naive_utc());
        Ok(())
    }

    async fn set_roles(&self, id: Uuid, roles: &[&str]) -> AppResult<()> {
        self.check_update()?;
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.get_mut(&id).ok_or(AppError::NotFound)?;

        account.roles = roles.iter().map(|r| r.to_string()).collect();
        account.updated_at = Some(chrono::Utc::now().naive_utc());
        Ok(())
    }

    async fn set_meta(&self, id: Uuid, key: &str, value: &str) -> AppResult<()> {
        self.check_update()?;
        if !self.accounts.lock().unwrap().contains_key(&id) {
            return Err(AppError::InvalidInput("Referenced record not found".into()));
        }
        self.seed_meta(id, key, value);
        Ok(())
    }

    async fn list_by_meta(&self, key: &str, value: &str) -> AppResult<Vec<AccountProfile>> {
        let meta = self.meta.lock().unwrap();
        let accounts = self.accounts.lock().unwrap();

        let mut matched: Vec<AccountProfile> = meta
            .iter()
            .filter(|((_, k), v)| k == key && v.as_str() == value)
            .filter_map(|((id, _), _)| accounts.get(id).cloned())
            .collect();
        matched.sort_by_key(|a| a.created_at);
        Ok(matched)
    }

    async fn list_ids_with_meta_before(&self, key: &str, before: &str) -> AppResult<Vec<Uuid>> {
        Ok(self
            .meta
            .lock()
            .unwrap()
            .iter()
            .filter(|((_, k), v)| k == key && v.as_str() < before)
            .map(|((id, _), _)| *id)
            .collect())
    }
}

// ============================================================================
// InMemoryOptionStore
// ============================================================================

/// In-memory implementation of OptionStore for testing.
#[derive(Default)]
pub struct InMemoryOptionStore {
    pub values: Mutex<HashMap<String, i64>>,
}

impl InMemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, name: &str, value: i64) {
        self.values.lock().unwrap().insert(name.to_string(), value);
    }

    /// Current value, 0 when unset.
    pub fn value(&self, name: &str) -> i64 {
        self.values
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl OptionStore for InMemoryOptionStore {
    async fn get_int(&self, name: &str) -> AppResult<i64> {
        Ok(self.value(name))
    }

    async fn increment(&self, name: &str) -> AppResult<i64> {
        let mut values = self.values.lock().unwrap();
        let entry = values.entry(name.to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }
}
