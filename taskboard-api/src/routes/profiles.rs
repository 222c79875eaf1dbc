/// Profile endpoints
///
/// - `GET /api/profiles` - Every profile
/// - `POST /api/profiles` - Create the caller's profile
/// - `GET|PATCH|DELETE /api/profiles/:user_id` - Profile of a user; only its
///   owner may change or delete it

use crate::{app::AppState, error::ApiResult, extract::Payload};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use taskboard_shared::{
    auth::middleware::Actor,
    rules::profile::ProfileInput,
    service::profiles::{self, ProfileView},
};
use uuid::Uuid;

pub async fn list_profiles(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> ApiResult<Json<Vec<ProfileView>>> {
    Ok(Json(profiles::list_profiles(state.store(), actor).await?))
}

/// Create the caller's profile
///
/// ```text
/// POST /api/profiles
///
/// { "bio": "Runs the release train", "location": "Lisbon" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Location longer than 100 characters
/// - `409 Conflict`: The caller already has a profile
pub async fn create_profile(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Payload(input): Payload<ProfileInput>,
) -> ApiResult<(StatusCode, Json<ProfileView>)> {
    let profile = profiles::create_profile(state.store(), actor, input).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ProfileView>> {
    Ok(Json(profiles::get_profile(state.store(), actor, user_id).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(user_id): Path<Uuid>,
    Payload(input): Payload<ProfileInput>,
) -> ApiResult<Json<ProfileView>> {
    Ok(Json(
        profiles::update_profile(state.store(), actor, user_id, input).await?,
    ))
}

pub async fn delete_profile(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(user_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    profiles::delete_profile(state.store(), actor, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
