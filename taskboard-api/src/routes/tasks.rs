/// Task endpoints
///
/// - `POST /api/tasks` - Create a task on the board named in the payload
/// - `GET /api/tasks/assigned-to-me` - Tasks the caller is assignee or reviewer of
/// - `GET /api/tasks/reviewing` - Tasks the caller reviews
/// - `GET|PATCH|DELETE /api/tasks/:task_id`

use crate::{app::AppState, error::ApiResult, extract::Payload};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use taskboard_shared::{
    auth::middleware::Actor,
    rules::task::TaskInput,
    service::tasks::{self, TaskView},
};
use uuid::Uuid;

/// Create a task
///
/// ```text
/// POST /api/tasks
///
/// {
///   "board": "<board uuid>",
///   "title": "Write release notes",
///   "status": "to-do",
///   "priority": "high",
///   "assignee_id": "<user uuid>",
///   "due_date": "2025-03-01"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing board, invalid fields, or an assignee or
///   reviewer outside the board
/// - `403 Forbidden`: Caller is not owner or member of the board
/// - `404 Not Found`: Board does not exist
pub async fn create_task(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Payload(input): Payload<TaskInput>,
) -> ApiResult<(StatusCode, Json<TaskView>)> {
    let task = tasks::create_task(state.store(), actor, input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn assigned_to_me(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> ApiResult<Json<Vec<TaskView>>> {
    Ok(Json(tasks::list_assigned_to_me(state.store(), actor).await?))
}

pub async fn reviewing(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> ApiResult<Json<Vec<TaskView>>> {
    Ok(Json(tasks::list_reviewing(state.store(), actor).await?))
}

pub async fn get_task(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<TaskView>> {
    Ok(Json(tasks::get_task(state.store(), actor, task_id).await?))
}

/// Partial update; `null` clears assignee, reviewer or due date
pub async fn update_task(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(task_id): Path<Uuid>,
    Payload(input): Payload<TaskInput>,
) -> ApiResult<Json<TaskView>> {
    Ok(Json(
        tasks::update_task(state.store(), actor, task_id, input).await?,
    ))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(task_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tasks::delete_task(state.store(), actor, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
