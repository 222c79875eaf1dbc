/// Board endpoints
///
/// - `GET /api/boards` - Boards the caller owns or belongs to
/// - `POST /api/boards` - Create a board owned by the caller
/// - `GET /api/boards/email-check?email=` - Resolve an email to a user
/// - `GET|PATCH|DELETE /api/boards/:board_id`

use crate::{app::AppState, error::ApiResult, extract::Payload};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskboard_shared::{
    auth::middleware::Actor,
    models::user::UserSummary,
    rules::board::BoardInput,
    service::{
        accounts,
        boards::{self, BoardDetail, BoardOverview},
    },
};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct EmailCheckQuery {
    pub email: Option<String>,
}

pub async fn list_boards(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> ApiResult<Json<Vec<BoardOverview>>> {
    Ok(Json(boards::list_boards(state.store(), actor).await?))
}

/// Create a board
///
/// ```text
/// POST /api/boards
///
/// { "title": "Launch", "members": ["<user uuid>", ...] }
/// ```
pub async fn create_board(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Payload(input): Payload<BoardInput>,
) -> ApiResult<(StatusCode, Json<BoardDetail>)> {
    let board = boards::create_board(state.store(), actor, input).await?;
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn get_board(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Json<BoardDetail>> {
    Ok(Json(boards::get_board(state.store(), actor, board_id).await?))
}

/// Partial update; `members` replaces the whole member set when present
pub async fn update_board(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(board_id): Path<Uuid>,
    Payload(input): Payload<BoardInput>,
) -> ApiResult<Json<BoardDetail>> {
    Ok(Json(
        boards::update_board(state.store(), actor, board_id, input).await?,
    ))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(board_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    boards::delete_board(state.store(), actor, board_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn email_check(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<EmailCheckQuery>,
) -> ApiResult<Json<UserSummary>> {
    Ok(Json(
        accounts::find_user_by_email(state.store(), actor, query.email.as_deref()).await?,
    ))
}
