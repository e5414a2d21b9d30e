use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing data parameter.")]
    MissingPayload,

    #[error("Invalid JSON data.")]
    InvalidJson,

    #[error("Status is missing.")]
    MissingStatus,

    #[error("Email is missing.")]
    MissingEmail,

    #[error("Unknown status value.")]
    UnknownStatus,

    #[error("{0}")]
    AccountCreation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is a rejected webhook call that must be counted.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            AppError::MissingPayload
                | AppError::InvalidJson
                | AppError::MissingStatus
                | AppError::MissingEmail
                | AppError::UnknownStatus
                | AppError::AccountCreation(_)
        )
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::MissingPayload => ErrorCode::MissingPayload,
            AppError::InvalidJson => ErrorCode::InvalidJson,
            AppError::MissingStatus => ErrorCode::MissingStatus,
            AppError::MissingEmail => ErrorCode::MissingEmail,
            AppError::UnknownStatus => ErrorCode::UnknownStatus,
            AppError::AccountCreation(_) => ErrorCode::AccountCreation,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::Unauthorized => ErrorCode::Unauthorized,
            AppError::NotFound => ErrorCode::NotFound,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    MissingPayload,
    InvalidJson,
    MissingStatus,
    MissingEmail,
    UnknownStatus,
    AccountCreation,
    InvalidInput,
    Unauthorized,
    NotFound,
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MissingPayload => "MISSING_PAYLOAD",
            ErrorCode::InvalidJson => "INVALID_JSON",
            ErrorCode::MissingStatus => "MISSING_STATUS",
            ErrorCode::MissingEmail => "MISSING_EMAIL",
            ErrorCode::UnknownStatus => "UNKNOWN_STATUS",
            ErrorCode::AccountCreation => "ACCOUNT_CREATION_FAILED",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
