use serde_json::Value as JsonValue;

/// Payment outcome carried in the `status` field of an inbound notification.
///
/// The sender transmits a JSON boolean for the payment result and the string
/// literal `"cancel"` when the subscription was cancelled. Anything else is
/// unknown and rejected by the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookStatus {
    Success,
    Failure,
    Cancel,
}

impl WebhookStatus {
    pub const CANCEL_LITERAL: &'static str = "cancel";

    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Bool(true) => Some(WebhookStatus::Success),
            JsonValue::Bool(false) => Some(WebhookStatus::Failure),
            JsonValue::String(s) if s == Self::CANCEL_LITERAL => Some(WebhookStatus::Cancel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookStatus::Success => "success",
            WebhookStatus::Failure => "failure",
            WebhookStatus::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for WebhookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
