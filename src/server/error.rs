//! Request-level API errors and their JSON responses.

use crate::store::StoreError;
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors that abort a request. Everything scoped to a single snapshot or
/// record is handled inside the pipeline and never reaches the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing {0} parameter")]
    MissingParameter(&'static str),

    #[error("{0}")]
    InvalidQuery(String),

    #[error("Reports not found")]
    ReportsNotFound,

    #[error("Invalid report_path")]
    InvalidReportPath,

    #[error("Report not found")]
    ReportNotFound,

    #[error("Malformed report")]
    MalformedReport,

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_)
            | ApiError::InvalidQuery(_)
            | ApiError::InvalidReportPath => StatusCode::BAD_REQUEST,
            ApiError::ReportsNotFound | ApiError::ReportNotFound => StatusCode::NOT_FOUND,
            ApiError::MalformedReport => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::ReportsNotFound,
            StoreError::InvalidPath(_) => ApiError::InvalidReportPath,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref detail) = self {
            error!("Request failed: {}", detail);
        }

        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ApiError::MissingParameter("website_id").to_string(),
            "Missing website_id parameter"
        );
        assert_eq!(ApiError::ReportsNotFound.to_string(), "Reports not found");
        assert_eq!(
            ApiError::Internal("disk on fire".to_string()).to_string(),
            "Internal server error"
        );
    }

    #[test]
    fn test_store_error_mapping() {
        let err = ApiError::from(StoreError::NotFound("site".to_string()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = ApiError::from(StoreError::InvalidPath("../x".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
