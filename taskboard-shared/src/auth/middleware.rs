/// Authentication middleware and actor extraction for Axum
///
/// Bearer tokens are optional at this layer: a request without an
/// `Authorization` header passes through as anonymous, and the services
/// decide whether an actor is required. A header that is present but
/// malformed, expired, or signed with another key is rejected here with 401.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use taskboard_shared::auth::middleware::{create_jwt_middleware, Actor};
///
/// async fn whoami(Actor(user_id): Actor) -> String {
///     format!("{:?}", user_id)
/// }
///
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(create_jwt_middleware("secret")));
/// ```

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, future::Future, pin::Pin};
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};

/// Authenticated caller, inserted into request extensions by the middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
}

/// The acting user of a request, or `None` for anonymous requests
///
/// Never rejects; pair it with `rules::require_actor` in the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub Option<Uuid>);

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Actor(
            parts.extensions.get::<AuthContext>().map(|ctx| ctx.user_id),
        ))
    }
}

/// Authentication errors
#[derive(Debug)]
pub enum AuthError {
    /// Authorization header is not `Bearer <token>`
    InvalidFormat(String),

    /// Token failed validation
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::InvalidFormat(msg) | AuthError::InvalidToken(msg) => msg,
        };

        let body = Json(serde_json::json!({
            "error": "unauthorized",
            "message": message,
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Resolves an optional bearer token into an [`AuthContext`]
///
/// # Errors
///
/// Returns `AuthError` if a header is present but is not a valid access token.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .map_err(|_| AuthError::InvalidFormat("Authorization header is not valid text".to_string()))?
            .to_string(),
        None => return Ok(next.run(req).await),
    };

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_access_token(token, &secret).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        match e {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            _ => AuthError::InvalidToken("Invalid token".to_string()),
        }
    })?;

    req.extensions_mut().insert(AuthContext { user_id: claims.sub });

    Ok(next.run(req).await)
}

type MiddlewareFuture = Pin<Box<dyn Future<Output = Result<Response, AuthError>> + Send>>;

/// Builds a closure usable with `axum::middleware::from_fn`
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(Request, Next) -> MiddlewareFuture + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}
