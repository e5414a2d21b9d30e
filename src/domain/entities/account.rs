/// Role label granted to accounts with a paid-up subscription.
pub const SUBSCRIBER_ROLE: &str = "subscriber";

/// Metadata flag marking accounts that were created by the webhook.
pub const META_CREATED_BY_PLUGIN: &str = "mywebhook_created_by_plugin";

/// Metadata key holding the next-charge date (`YYYY-MM-DD`).
pub const META_EXPIRATION: &str = "mywebhook_expiration";

pub const EXPIRATION_DATE_FORMAT: &str = "%Y-%m-%d";

/// Subscription state derived from an account's role labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    /// Holds the subscriber role.
    Active,
    /// Holds no role at all.
    Inactive,
    /// Holds roles this service does not manage (e.g. an administrator).
    Other,
}

impl AccountStatus {
    pub fn from_roles(roles: &[String]) -> Self {
        if roles.iter().any(|r| r == SUBSCRIBER_ROLE) {
            AccountStatus::Active
        } else if roles.is_empty() {
            AccountStatus::Inactive
        } else {
            AccountStatus::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Other => "other",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
