use async_trait::async_trait;

use crate::app_error::AppResult;

/// Option holding the number of rejected webhook calls.
pub const INVALID_REQUESTS_COUNT: &str = "mywebhook_invalid_requests_count";

/// Process-wide persisted key/value store for small counters and settings.
#[async_trait]
pub trait OptionStore: Send + Sync {
    /// Reads an integer option; absent options read as 0.
    async fn get_int(&self, name: &str) -> AppResult<i64>;

    /// Increments an integer option and returns the new value.
    async fn increment(&self, name: &str) -> AppResult<i64>;
}
