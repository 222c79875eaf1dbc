/// Comment endpoints, nested under a task
///
/// - `GET|POST /api/tasks/:task_id/comments`
/// - `GET|PATCH|DELETE /api/tasks/:task_id/comments/:comment_id`

use crate::{app::AppState, error::ApiResult, extract::Payload};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use taskboard_shared::{
    auth::middleware::Actor,
    rules::comment::CommentInput,
    service::comments::{self, CommentView},
};
use uuid::Uuid;

pub async fn list_comments(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<CommentView>>> {
    Ok(Json(comments::list_comments(state.store(), actor, task_id).await?))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(task_id): Path<Uuid>,
    Payload(input): Payload<CommentInput>,
) -> ApiResult<(StatusCode, Json<CommentView>)> {
    let comment = comments::create_comment(state.store(), actor, task_id, input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((task_id, comment_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<CommentView>> {
    Ok(Json(
        comments::get_comment(state.store(), actor, task_id, comment_id).await?,
    ))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((task_id, comment_id)): Path<(Uuid, Uuid)>,
    Payload(input): Payload<CommentInput>,
) -> ApiResult<Json<CommentView>> {
    Ok(Json(
        comments::update_comment(state.store(), actor, task_id, comment_id, input).await?,
    ))
}

/// Only the author may delete a comment
pub async fn delete_comment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((task_id, comment_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    comments::delete_comment(state.store(), actor, task_id, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
