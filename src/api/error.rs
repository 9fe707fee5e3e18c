//! Structured API error responses with error codes.
//!
//! Every endpoint reports failures through one error shape with a
//! machine-readable code and a human-readable message, so the dashboard can
//! explain *why* ("cannot delete a verified submission") instead of showing
//! a generic failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::infra::CoreError;

// ============================================================================
// Error Codes
// ============================================================================

/// Error codes for API responses.
///
/// These codes are stable and can be used by clients for programmatic error
/// handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication / authorization (1xxx)
    /// No authentication credentials provided
    AuthRequired,
    /// Invalid or revoked token
    InvalidToken,
    /// Insufficient permissions for this operation
    InsufficientPermissions,
    /// Account is suspended; mutations are denied
    AccountSuspended,

    // Validation (2xxx)
    /// Request body is malformed
    InvalidRequestBody,
    /// Field value is invalid
    InvalidFieldValue,

    // Resources (3xxx)
    /// Requested resource not found (or not visible to the caller)
    ResourceNotFound,

    // Lifecycle state (4xxx)
    /// Attempted transition out of a terminal state
    InvalidStateTransition,
    /// Attempted delete of a submission that is not deletable
    NotDeletable,

    // Infrastructure (5xxx)
    /// Database operation failed
    DatabaseError,
    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn numeric_code(&self) -> u32 {
        match self {
            ErrorCode::AuthRequired => 1001,
            ErrorCode::InvalidToken => 1002,
            ErrorCode::InsufficientPermissions => 1003,
            ErrorCode::AccountSuspended => 1004,

            ErrorCode::InvalidRequestBody => 2001,
            ErrorCode::InvalidFieldValue => 2002,

            ErrorCode::ResourceNotFound => 3001,

            ErrorCode::InvalidStateTransition => 4001,
            ErrorCode::NotDeletable => 4002,

            ErrorCode::DatabaseError => 5001,
            ErrorCode::InternalError => 5999,
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::AuthRequired | ErrorCode::InvalidToken => StatusCode::UNAUTHORIZED,
            ErrorCode::InsufficientPermissions | ErrorCode::AccountSuspended => {
                StatusCode::FORBIDDEN
            }

            ErrorCode::InvalidRequestBody | ErrorCode::InvalidFieldValue => {
                StatusCode::BAD_REQUEST
            }

            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,

            ErrorCode::InvalidStateTransition | ErrorCode::NotDeletable => StatusCode::CONFLICT,

            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code_str = match self {
            ErrorCode::AuthRequired => "AUTH_REQUIRED",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            ErrorCode::AccountSuspended => "ACCOUNT_SUSPENDED",
            ErrorCode::InvalidRequestBody => "INVALID_REQUEST_BODY",
            ErrorCode::InvalidFieldValue => "INVALID_FIELD_VALUE",
            ErrorCode::ResourceNotFound => "RESOURCE_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::NotDeletable => "NOT_DELETABLE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", code_str)
    }
}

// ============================================================================
// Structured Error Response
// ============================================================================

/// Structured error response for API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error details
    pub error: ErrorDetails,
}

/// Detailed error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Numeric error code for easy categorization
    pub numeric_code: u32,

    /// Human-readable error message
    pub message: String,

    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// Related resource ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetails {
                code,
                numeric_code: code.numeric_code(),
                message: message.into(),
                details: None,
                resource_id: None,
            },
        }
    }

    /// Set additional details
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }

    /// Set related resource ID
    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.error.resource_id = Some(id.into());
        self
    }

    /// Get the HTTP status code
    pub fn status(&self) -> StatusCode {
        self.error.code.http_status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code_str = self.error.code.to_string();
        let mut response = (status, Json(self)).into_response();

        // Error code header for easier debugging
        if let Ok(code_value) = axum::http::HeaderValue::from_str(&code_str) {
            response.headers_mut().insert(
                axum::http::header::HeaderName::from_static("x-error-code"),
                code_value,
            );
        }

        response
    }
}

// ============================================================================
// Conversion from CoreError
// ============================================================================

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { field, message } => {
                ApiError::new(ErrorCode::InvalidFieldValue, message).with_details(
                    serde_json::json!({
                        "field": field,
                    }),
                )
            }
            CoreError::Authorization(message) => {
                ApiError::new(ErrorCode::InsufficientPermissions, message)
            }
            CoreError::Suspended => ApiError::new(
                ErrorCode::AccountSuspended,
                "account is suspended; contact an administrator",
            ),
            CoreError::NotFound { kind, id } => {
                ApiError::new(ErrorCode::ResourceNotFound, format!("{} not found: {}", kind, id))
                    .with_resource_id(id.to_string())
            }
            CoreError::InvalidTransition { id, from, to } => ApiError::new(
                ErrorCode::InvalidStateTransition,
                format!("cannot move submission from {} to {}", from, to),
            )
            .with_resource_id(id.to_string())
            .with_details(serde_json::json!({
                "from_status": from,
                "to_status": to,
            })),
            CoreError::NotDeletable { id, status } => ApiError::new(
                ErrorCode::NotDeletable,
                format!("cannot delete a {} submission", status),
            )
            .with_resource_id(id.to_string()),
            CoreError::Database(e) => {
                ApiError::new(ErrorCode::DatabaseError, format!("database error: {}", e))
            }
            CoreError::Internal(message) => ApiError::new(ErrorCode::InternalError, message),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Create a validation error with field details
pub fn validation_error(field: &str, message: impl Into<String>) -> ApiError {
    ApiError::new(ErrorCode::InvalidFieldValue, message.into()).with_details(serde_json::json!({
        "field": field,
    }))
}

/// Create a forbidden error
pub fn forbidden(message: impl Into<String>) -> ApiError {
    ApiError::new(ErrorCode::InsufficientPermissions, message.into())
}

/// Create a not found error for a specific resource type
pub fn not_found(resource_type: &str, id: impl std::fmt::Display) -> ApiError {
    ApiError::new(
        ErrorCode::ResourceNotFound,
        format!("{} not found: {}", resource_type, id),
    )
    .with_resource_id(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SubmissionStatus;
    use uuid::Uuid;

    #[test]
    fn test_error_code_numeric() {
        assert_eq!(ErrorCode::AuthRequired.numeric_code(), 1001);
        assert_eq!(ErrorCode::AccountSuspended.numeric_code(), 1004);
        assert_eq!(ErrorCode::InvalidFieldValue.numeric_code(), 2002);
        assert_eq!(ErrorCode::ResourceNotFound.numeric_code(), 3001);
        assert_eq!(ErrorCode::InvalidStateTransition.numeric_code(), 4001);
        assert_eq!(ErrorCode::InternalError.numeric_code(), 5999);
    }

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::AuthRequired.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ErrorCode::InsufficientPermissions.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ErrorCode::InvalidFieldValue.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::InvalidStateTransition.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn core_error_mapping_keeps_the_reason_visible() {
        let id = Uuid::new_v4();
        let err = ApiError::from(CoreError::NotDeletable {
            id,
            status: SubmissionStatus::Verified,
        });
        assert_eq!(err.error.code, ErrorCode::NotDeletable);
        assert!(err.error.message.contains("verified"));
        assert_eq!(err.error.resource_id, Some(id.to_string()));

        let err = ApiError::from(CoreError::Suspended);
        assert_eq!(err.error.code, ErrorCode::AccountSuspended);
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_error_serialization() {
        let error = ApiError::new(ErrorCode::ResourceNotFound, "submission not found");
        let json = serde_json::to_string(&error).unwrap();

        assert!(json.contains("RESOURCE_NOT_FOUND"));
        assert!(json.contains("submission not found"));
        assert!(json.contains("3001"));
    }
}
