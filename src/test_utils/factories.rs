//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::{
    application::use_cases::account::AccountProfile, domain::entities::account::SUBSCRIBER_ROLE,
};

/// Create a test account with sensible defaults: an active subscriber.
pub fn create_test_account(overrides: impl FnOnce(&mut AccountProfile)) -> AccountProfile {
    let id = Uuid::new_v4();
    let email = format!("user-{}@example.com", id.simple());
    let mut account = AccountProfile {
        id,
        username: email.clone(),
        email,
        display_name: "Test User".to_string(),
        nickname: "Test User".to_string(),
        roles: vec![SUBSCRIBER_ROLE.to_string()],
        created_at: Some(test_datetime()),
        updated_at: Some(test_datetime()),
    };
    overrides(&mut account);
    account
}

/// Fixed timestamp so fixtures compare deterministically.
pub fn test_datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}
