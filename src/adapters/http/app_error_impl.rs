use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        match self {
            AppError::MissingPayload
            | AppError::InvalidJson
            | AppError::MissingStatus
            | AppError::MissingEmail
            | AppError::UnknownStatus
            | AppError::AccountCreation(_) => {
                tracing::warn!(error = %self, "Webhook rejected");
                error_resp(StatusCode::BAD_REQUEST, code, Some(self.to_string()))
            }
            AppError::InvalidInput(msg) => {
                tracing::warn!(error = %msg, "Invalid input");
                error_resp(StatusCode::BAD_REQUEST, code, Some(msg))
            }
            AppError::Unauthorized => {
                tracing::warn!("Unauthorized admin request");
                error_resp(StatusCode::UNAUTHORIZED, code, None)
            }
            AppError::NotFound => error_resp(StatusCode::NOT_FOUND, code, None),
            AppError::Database(_) | AppError::Internal(_) => {
                // Log the error before it gets converted into a status response.
                tracing::error!(error = ?self, "Request failed");
                error_resp(StatusCode::INTERNAL_SERVER_ERROR, code, None)
            }
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: Option<String>) -> Response {
    let body = match message {
        Some(msg) => serde_json::json!({ "code": code.as_str(), "error": msg }),
        None => serde_json::json!({ "code": code.as_str() }),
    };
    (status, Json(body)).into_response()
}
