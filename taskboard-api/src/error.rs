/// Error handling for the API server
///
/// All handlers return `Result<T, ApiError>`, which converts to a status
/// code and a JSON body of the form `{error, message, details?}`.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::AppState, error::ApiResult};
/// use taskboard_shared::{auth::middleware::Actor, service::boards::{self, BoardOverview}};
/// use axum::{extract::State, Json};
///
/// async fn handler(
///     State(state): State<AppState>,
///     Actor(actor): Actor,
/// ) -> ApiResult<Json<Vec<BoardOverview>>> {
///     Ok(Json(boards::list_boards(state.store(), actor).await?))
/// }
/// ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskboard_shared::{
    auth::jwt::JwtError,
    rules::{FieldErrors, RuleError},
};
use validator::ValidationErrors;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email
    Conflict(String),

    /// Bad request (400) with per-field details
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "validation_error", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Field errors, for validation failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::ValidationError(
            errors
                .iter()
                .map(|e| ValidationErrorDetail {
                    field: e.field.clone(),
                    message: e.message.clone(),
                })
                .collect(),
        )
    }
}

/// Convert request validation errors to API errors
impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        FieldErrors::from(errors).into()
    }
}

/// Convert JSON body rejections to API errors
///
/// Every rejection is a 400. Type errors inside the body are reported under
/// the top-level field that failed; anything else is reported under `body`.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = match rejection {
            JsonRejection::JsonDataError(err) => data_error_detail(&err.body_text()),
            other => ValidationErrorDetail {
                field: "body".to_string(),
                message: other.body_text(),
            },
        };
        ApiError::ValidationError(vec![detail])
    }
}

/// Splits axum's data error text (`...target type: <path>: <reason>`) into
/// the top-level field and serde's reason
fn data_error_detail(text: &str) -> ValidationErrorDetail {
    let detail = |field: &str, message: &str| ValidationErrorDetail {
        field: field.to_string(),
        message: message.to_string(),
    };

    let reason = text
        .split_once("target type: ")
        .map(|(_, reason)| reason)
        .unwrap_or(text);
    let reason = reason.split(" at line ").next().unwrap_or(reason);

    if let Some((path, message)) = reason.split_once(": ") {
        if !path.is_empty() && !path.contains(char::is_whitespace) {
            let field = path.split(['.', '[']).next().unwrap_or(path);
            return detail(field, message);
        }
    }

    let quoted = |prefix: &str| {
        reason
            .strip_prefix(prefix)
            .and_then(|rest| rest.split('`').next())
    };
    if let Some(field) = quoted("missing field `") {
        return detail(field, "This field is required.");
    }
    if let Some(field) = quoted("unknown field `") {
        return detail(field, "Unknown field.");
    }

    detail("body", reason)
}

/// Convert rule errors to API errors
impl From<RuleError> for ApiError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::NotFound(entity) => ApiError::NotFound(format!("{} not found", entity)),
            RuleError::Forbidden(reason) => ApiError::Forbidden(reason),
            RuleError::Unauthenticated => {
                ApiError::Unauthorized("Authentication credentials were not provided.".to_string())
            }
            RuleError::InvalidField(errors) => errors.into(),
            RuleError::Conflict(msg) => ApiError::Conflict(msg),
            e @ RuleError::InvalidCredentials => ApiError::Unauthorized(e.to_string()),
            RuleError::Store(e) => ApiError::InternalError(format!("Store error: {}", e)),
            RuleError::Password(e) => {
                ApiError::InternalError(format!("Password operation failed: {}", e))
            }
        }
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => {
                ApiError::InternalError(format!("Token creation failed: {}", msg))
            }
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer => ApiError::Unauthorized("Invalid token issuer".to_string()),
            other => ApiError::Unauthorized(format!("Invalid token: {}", other)),
        }
    }
}
