//! Response types for the Daily Payment Engine API.
//!
//! This module defines the error response structures and the mapping from
//! engine errors to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, code: &str, error: &EngineError, details: &str) -> Self {
        Self {
            status,
            error: ApiError::with_details(code, error.to_string(), details),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let (status, code, details) = match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "The tenant configuration could not be loaded",
            ),
            EngineError::PersonNotFound { .. } => (
                StatusCode::NOT_FOUND,
                "PERSON_NOT_FOUND",
                "The person is not on the roster",
            ),
            EngineError::RecordNotFound { .. } => (
                StatusCode::NOT_FOUND,
                "RECORD_NOT_FOUND",
                "The referenced record does not exist",
            ),
            EngineError::InvalidPaymentRule { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_PAYMENT_RULE",
                "The payment rule contains invalid information",
            ),
            EngineError::InvalidHourOverride { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_HOUR_OVERRIDE",
                "The hour override contains invalid information",
            ),
            EngineError::InvalidTimeEntry { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_TIME_ENTRY",
                "The time entry contains invalid information",
            ),
            EngineError::InvalidShift { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_SHIFT",
                "The shift data contains invalid information",
            ),
            EngineError::InvalidAdjustment { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_ADJUSTMENT",
                "The adjustment contains invalid information",
            ),
            EngineError::DayLocked { .. } => (
                StatusCode::CONFLICT,
                "DAY_LOCKED",
                "Reopen the day before changing it",
            ),
            EngineError::DayNotClosed { .. } => (
                StatusCode::CONFLICT,
                "DAY_NOT_CLOSED",
                "Only an active closure of exactly this scope can be reopened",
            ),
            EngineError::ReopenReasonRequired { .. } => (
                StatusCode::BAD_REQUEST,
                "REOPEN_REASON_REQUIRED",
                "Provide a non-empty reason",
            ),
            EngineError::StateIo { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STATE_IO_ERROR",
                "The ledger state file could not be read or written",
            ),
            EngineError::CalculationError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CALCULATION_ERROR",
                "Calculation failed",
            ),
        };
        ApiErrorResponse::new(status, code, &error, details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_day_locked_is_conflict() {
        let api_error: ApiErrorResponse = EngineError::DayLocked {
            date: test_date(),
            scope: "all".to_string(),
            closure_id: "closure_1".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::CONFLICT);
        assert_eq!(api_error.error.code, "DAY_LOCKED");
        assert!(api_error.error.message.contains("closure_1"));
    }

    #[test]
    fn test_day_not_closed_is_conflict() {
        let api_error: ApiErrorResponse = EngineError::DayNotClosed {
            date: test_date(),
            scope: "unit:ward_a".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_not_found_errors_are_404() {
        let api_error: ApiErrorResponse = EngineError::PersonNotFound {
            person_id: "p_9".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);

        let api_error: ApiErrorResponse = EngineError::RecordNotFound {
            kind: "adjustment".to_string(),
            id: "adj_1".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.error.message, "adjustment not found: adj_1");
    }

    #[test]
    fn test_validation_errors_are_400() {
        let api_error: ApiErrorResponse = EngineError::InvalidHourOverride {
            person_id: "p_1".to_string(),
            date: test_date(),
            message: "hours -1 cannot be negative".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_HOUR_OVERRIDE");
    }

    #[test]
    fn test_state_io_is_500() {
        let api_error: ApiErrorResponse = EngineError::StateIo {
            path: "/tmp/ledger.json".to_string(),
            message: "permission denied".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
