use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::account::{AccountProfile, AccountRepo, NewAccount},
};

const ACCOUNT_COLUMNS: &str =
    "a.id, a.username, a.email, a.display_name, a.nickname, a.roles, a.created_at, a.updated_at";

fn row_to_profile(row: sqlx::postgres::PgRow) -> AccountProfile {
    AccountProfile {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        display_name: row.get("display_name"),
        nickname: row.get("nickname"),
        roles: row.get("roles"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl AccountRepo for PostgresPersistence {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<AccountProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts a WHERE a.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(row_to_profile))
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<AccountProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts a WHERE lower(a.email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(row_to_profile))
    }

    async fn create(&self, new: &NewAccount<'_>) -> AppResult<AccountProfile> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        let row = sqlx::query(
            r#"
            INSERT INTO accounts AS a (id, username, email, password_hash, display_name, nickname)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING a.id, a.username, a.email, a.display_name, a.nickname, a.roles, a.created_at, a.updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.username)
        .bind(new.email.to_lowercase())
        .bind(new.password_hash)
        .bind(new.display_name)
        .bind(new.nickname)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let constraint = db_err.constraint().unwrap_or_default();
                if constraint.contains("username") {
                    AppError::InvalidInput("Sorry, that username already exists!".into())
                } else {
                    AppError::InvalidInput("Sorry, that email address is already used!".into())
                }
            }
            _ => AppError::from(e),
        })?;
        let profile = row_to_profile(row);

        for (key, value) in new.meta {
            sqlx::query(
                "INSERT INTO account_meta (account_id, meta_key, meta_value) VALUES ($1, $2, $3)",
            )
            .bind(profile.id)
            .bind(*key)
            .bind(*value)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;
        }

        tx.commit().await.map_err(AppError::from)?;
        Ok(profile)
    }

    async fn update_names(&self, id: Uuid, display_name: &str, nickname: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE accounts SET display_name = $2, nickname = $3, updated_at = CURRENT_TIMESTAMP WHERE id = $1",
        )
        .bind(id)
        .bind(display_name)
        .bind(nickname)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn set_roles(&self, id: Uuid, roles: &[&str]) -> AppResult<()> {
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        sqlx::query("UPDATE accounts SET roles = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1")
            .bind(id)
            .bind(&roles)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    async fn set_meta(&self, id: Uuid, key: &str, value: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO account_meta (account_id, meta_key, meta_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (account_id, meta_key) DO UPDATE SET
                meta_value = EXCLUDED.meta_value
            "#,
        )
        .bind(id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn list_by_meta(&self, key: &str, value: &str) -> AppResult<Vec<AccountProfile>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM accounts a
            JOIN account_meta m ON m.account_id = a.id
            WHERE m.meta_key = $1 AND m.meta_value = $2
            ORDER BY a.created_at
            "#
        ))
        .bind(key)
        .bind(value)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.into_iter().map(row_to_profile).collect())
    }

    async fn list_ids_with_meta_before(&self, key: &str, before: &str) -> AppResult<Vec<Uuid>> {
        // Dates are stored as zero-padded YYYY-MM-DD, so byte order is date order.
        let rows = sqlx::query(
            r#"
            SELECT account_id
            FROM account_meta
            WHERE meta_key = $1 AND meta_value COLLATE "C" < $2
            "#,
        )
        .bind(key)
        .bind(before)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.into_iter().map(|r| r.get("account_id")).collect())
    }
}
