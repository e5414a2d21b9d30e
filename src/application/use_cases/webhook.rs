use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value as JsonValue;
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::account::AccountUseCases;
use crate::application::use_cases::options::{INVALID_REQUESTS_COUNT, OptionStore};
use crate::application::validators::{sanitize_email, sanitize_text_field};
use crate::domain::entities::account::EXPIRATION_DATE_FORMAT;
use crate::domain::entities::webhook_status::WebhookStatus;

// ============================================================================
// Payload
// ============================================================================

/// A validated notification. `status` stays raw until branching so that an
/// unknown value is only reported once the required fields are known good.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookPayload {
    pub status: JsonValue,
    pub email: String,
    pub name: Option<String>,
    pub recdate: Option<NaiveDate>,
}

impl WebhookPayload {
    /// Decodes and validates the `data` request parameter.
    ///
    /// `data` is normally a JSON document in a string; an object that was
    /// already decoded by the transport is accepted as is.
    pub fn parse(data: Option<&JsonValue>) -> AppResult<Self> {
        let decoded = match data {
            None | Some(JsonValue::Null) => return Err(AppError::MissingPayload),
            Some(JsonValue::String(raw)) if raw.trim().is_empty() => {
                return Err(AppError::MissingPayload);
            }
            Some(JsonValue::String(raw)) => {
                serde_json::from_str::<JsonValue>(raw).map_err(|_| AppError::InvalidJson)?
            }
            Some(JsonValue::Object(map)) if map.is_empty() => {
                return Err(AppError::MissingPayload);
            }
            Some(other) => other.clone(),
        };

        let status = match decoded.get("status") {
            None | Some(JsonValue::Null) => return Err(AppError::MissingStatus),
            Some(status) => status.clone(),
        };

        let email = decoded
            .get("email")
            .and_then(JsonValue::as_str)
            .and_then(sanitize_email)
            .ok_or(AppError::MissingEmail)?;

        let name = text_field(&decoded, "name");

        let recdate = text_field(&decoded, "recdate").and_then(|raw| {
            match NaiveDate::parse_from_str(&raw, EXPIRATION_DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    tracing::warn!(recdate = %raw, "Ignoring unparsable recdate");
                    None
                }
            }
        });

        Ok(Self {
            status,
            email,
            name,
            recdate,
        })
    }
}

fn text_field(decoded: &JsonValue, key: &str) -> Option<String> {
    decoded
        .get(key)
        .and_then(JsonValue::as_str)
        .map(sanitize_text_field)
        .filter(|s| !s.is_empty())
}

// ============================================================================
// Outcome
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Canceled,
    CancelIgnored,
    PaymentFailed,
    Upserted { account_id: Uuid, created: bool },
}

impl WebhookOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            WebhookOutcome::Canceled => "User canceled and set to inactive.",
            WebhookOutcome::CancelIgnored => "User does not exist, no action taken.",
            WebhookOutcome::PaymentFailed => "Payment not successful or pending.",
            WebhookOutcome::Upserted { .. } => "User created/updated successfully.",
        }
    }

    pub fn account_id(&self) -> Option<Uuid> {
        match self {
            WebhookOutcome::Upserted { account_id, .. } => Some(*account_id),
            _ => None,
        }
    }
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct WebhookUseCases {
    accounts: Arc<AccountUseCases>,
    options: Arc<dyn OptionStore>,
}

impl WebhookUseCases {
    pub fn new(accounts: Arc<AccountUseCases>, options: Arc<dyn OptionStore>) -> Self {
        Self { accounts, options }
    }

    /// Processes one inbound notification. Rejected calls bump the invalid
    /// request counter before the error is returned.
    #[instrument(skip(self, data))]
    pub async fn handle(&self, data: Option<&JsonValue>) -> AppResult<WebhookOutcome> {
        match self.process(data).await {
            Err(err) if err.is_invalid_request() => {
                self.record_invalid_request(&err).await;
                Err(err)
            }
            other => other,
        }
    }

    async fn process(&self, data: Option<&JsonValue>) -> AppResult<WebhookOutcome> {
        let payload = WebhookPayload::parse(data)?;
        let status = WebhookStatus::from_json(&payload.status).ok_or(AppError::UnknownStatus)?;

        tracing::info!(email = %payload.email, status = %status, "Webhook received");

        match status {
            WebhookStatus::Cancel => self.cancel(&payload).await,
            // Failed charges leave the account untouched; the sweeper catches
            // expired subscriptions instead.
            WebhookStatus::Failure => Ok(WebhookOutcome::PaymentFailed),
            WebhookStatus::Success => self.activate(&payload).await,
        }
    }

    async fn cancel(&self, payload: &WebhookPayload) -> AppResult<WebhookOutcome> {
        match self.accounts.find_by_email(&payload.email).await? {
            Some(account) => {
                self.accounts.set_inactive(account.id).await?;
                tracing::info!(account_id = %account.id, "Subscription canceled");
                Ok(WebhookOutcome::Canceled)
            }
            None => Ok(WebhookOutcome::CancelIgnored),
        }
    }

    async fn activate(&self, payload: &WebhookPayload) -> AppResult<WebhookOutcome> {
        let (account_id, created) = match self.accounts.find_by_email(&payload.email).await? {
            Some(existing) => {
                let name = payload.name.as_deref().unwrap_or(&payload.email);
                self.accounts.rename(existing.id, name).await?;
                (existing.id, false)
            }
            None => {
                let name = payload.name.as_deref().unwrap_or_default();
                let account = self.accounts.create_managed(&payload.email, name).await?;
                (account.id, true)
            }
        };

        if let Some(recdate) = payload.recdate {
            self.accounts.set_expiration(account_id, recdate).await?;
        }

        self.accounts.set_active(account_id).await?;

        Ok(WebhookOutcome::Upserted {
            account_id,
            created,
        })
    }

    async fn record_invalid_request(&self, err: &AppError) {
        match self.options.increment(INVALID_REQUESTS_COUNT).await {
            Ok(count) => {
                tracing::warn!(error = %err, invalid_requests = count, "Rejected webhook call")
            }
            Err(e) => tracing::error!(
                error = %err,
                counter_error = ?e,
                "Rejected webhook call and failed to update counter"
            ),
        }
    }
}
