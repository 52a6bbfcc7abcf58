//! JSON envelope shared by every API response, and the error type that maps
//! onto it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::sources::SourceError;

/// `{ data, success, message }`, the shape the dashboard UI consumes.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub success: bool,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            data: Some(data),
            success: true,
            message: message.into(),
        })
    }

    pub fn failure(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            data: None,
            success: false,
            message: message.into(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Metrics source unavailable: {0}")]
    Upstream(#[from] SourceError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Upstream(e) => tracing::error!(error = %e, "Metrics source failed"),
        }

        (self.status(), ApiResponse::<()>::failure(self.to_string())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope() {
        let response = ApiResponse::success(vec![1, 2], "ok");
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "ok");
    }

    #[test]
    fn failure_envelope() {
        let response = ApiResponse::<()>::failure("backend down");
        let json = serde_json::to_value(&response.0).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "backend down");
    }

    #[test]
    fn upstream_errors_map_to_bad_gateway() {
        let err: AppError = SourceError::Status(500).into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            err.to_string(),
            "Metrics source unavailable: metrics backend returned HTTP 500"
        );
    }

    #[test]
    fn upstream_error_response_carries_failure_status() {
        let response = AppError::from(SourceError::Rejected("quota".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
