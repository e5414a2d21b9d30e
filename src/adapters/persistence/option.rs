use async_trait::async_trait;
use sqlx::Row;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::options::OptionStore,
};

#[async_trait]
impl OptionStore for PostgresPersistence {
    async fn get_int(&self, name: &str) -> AppResult<i64> {
        let row = sqlx::query("SELECT value FROM options WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        let Some(row) = row else {
            return Ok(0);
        };
        let raw: String = row.get("value");
        Ok(raw.trim().parse().unwrap_or_else(|err| {
            tracing::warn!(option = name, raw = %raw, error = %err, "Non-integer option, reading as 0");
            0
        }))
    }

    async fn increment(&self, name: &str) -> AppResult<i64> {
        // Atomic upsert; never read-modify-write.
        let row = sqlx::query(
            r#"
            INSERT INTO options (name, value)
            VALUES ($1, '1')
            ON CONFLICT (name) DO UPDATE SET
                value = (COALESCE(NULLIF(options.value, '')::BIGINT, 0) + 1)::TEXT
            RETURNING value
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        let raw: String = row.get("value");
        raw.parse()
            .map_err(|e| AppError::Internal(format!("option {name} is not an integer: {e}")))
    }
}
