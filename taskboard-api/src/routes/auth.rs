/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/registration` - Register a new user and get tokens
/// - `POST /api/auth/login` - Login and get tokens
/// - `POST /api/auth/refresh` - Exchange a refresh token for an access token

use crate::{app::AppState, error::ApiResult, extract::Payload};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::jwt,
    models::user::User,
    rules::account::Registration,
    service::accounts,
};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: String,
}

/// Returned by registration and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,

    pub user_id: String,
    pub email: String,
    pub fullname: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

fn auth_response(user: &User, secret: &str) -> ApiResult<AuthResponse> {
    let (access_token, refresh_token) = jwt::issue_token_pair(user.id, secret)?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        user_id: user.id.to_string(),
        email: user.email.clone(),
        fullname: user.fullname.clone(),
    })
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/registration
/// Content-Type: application/json
///
/// {
///   "fullname": "Ada Lovelace",
///   "email": "ada@example.com",
///   "password": "engine-1843",
///   "repeated_password": "engine-1843"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Invalid fields or passwords do not match
/// - `409 Conflict`: Email already in use
pub async fn registration(
    State(state): State<AppState>,
    Payload(req): Payload<Registration>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let user = accounts::register(state.store(), req).await?;
    let response = auth_response(&user, state.jwt_secret())?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login endpoint
///
/// # Errors
///
/// - `400 Bad Request`: Malformed email or empty password
/// - `401 Unauthorized`: Unknown email or wrong password, with the same
///   message for both
pub async fn login(
    State(state): State<AppState>,
    Payload(req): Payload<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = accounts::verify_credentials(state.store(), &req.email, &req.password).await?;

    Ok(Json(auth_response(&user, state.jwt_secret())?))
}

/// Token refresh endpoint
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token, or an access token
pub async fn refresh(
    State(state): State<AppState>,
    Payload(req): Payload<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
