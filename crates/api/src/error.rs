//! Maps domain errors to JSON error responses.
//!
//! Every failure is rendered as `{ "error": <code>, "message": <text> }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bursar_core::catalog::CatalogError;
use bursar_core::payment::PaymentError;
use bursar_core::reports::ReportError;
use bursar_db::repositories::{CatalogRepoError, EnrollmentError};
use bursar_shared::AppError;
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

/// An error ready to be sent to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Creates an error from its parts.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    fn from_parts(status: u16, code: &'static str, message: String) -> Self {
        Self::new(
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, message = %self.message, "Request failed");
        }
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let message = match &err {
            AppError::Database(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
            _ => err.to_string(),
        };
        if matches!(err, AppError::Database(_) | AppError::Internal(_)) {
            error!(error = %err, "Internal error");
        }
        Self::from_parts(err.status_code(), err.error_code(), message)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        AppError::Database(err.to_string()).into()
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self::from_parts(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self::from_parts(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<CatalogRepoError> for ApiError {
    fn from(err: CatalogRepoError) -> Self {
        match err {
            CatalogRepoError::Catalog(e) => e.into(),
            CatalogRepoError::Database(e) => e.into(),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        Self::from_parts(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<EnrollmentError> for ApiError {
    fn from(err: EnrollmentError) -> Self {
        match err {
            EnrollmentError::Database(e) => e.into(),
            other => AppError::NotFound(other.to_string()).into(),
        }
    }
}
