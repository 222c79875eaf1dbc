/// Task operations
///
/// Create runs its checks in this order, stopping at the first failure:
/// board reference present, board exists, actor belongs to the board, field
/// values valid, assignee/reviewer belong to the board. Only then is the
/// task written.

use serde::Serialize;
use uuid::Uuid;

use super::{comments::CommentView, load_board, load_task};
use crate::{
    models::{
        task::{Task, TaskRelation},
        user::{User, UserSummary},
    },
    rules::{
        require_actor,
        task::{
            authorize_create, authorize_delete, authorize_edit, authorize_editor_membership,
            authorize_view, reject_board_change, require_board_ref, touched_refs,
            validate_cross_refs, validate_fields, validate_new_task, TaskInput,
        },
        Entity, RuleError,
    },
    store::EntityStore,
};

/// Task with resolved assignee/reviewer and its comments, oldest first
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub assignee: Option<UserSummary>,
    pub reviewer: Option<UserSummary>,
    pub comments_count: usize,
    pub comments: Vec<CommentView>,
}

/// Builds views for a batch of tasks with a single user lookup
///
/// The lookup covers assignees, reviewers and comment authors alike.
pub(crate) async fn task_views(
    store: &dyn EntityStore,
    tasks: Vec<Task>,
) -> Result<Vec<TaskView>, RuleError> {
    let mut comments = Vec::with_capacity(tasks.len());
    for task in &tasks {
        comments.push(store.list_comments(task.id).await?);
    }

    let mut user_ids: Vec<Uuid> = tasks
        .iter()
        .flat_map(|t| [t.assignee_id, t.reviewer_id])
        .flatten()
        .chain(comments.iter().flatten().map(|c| c.author_id))
        .collect();
    user_ids.sort();
    user_ids.dedup();

    let users = if user_ids.is_empty() {
        Vec::new()
    } else {
        store.get_users(&user_ids).await?
    };
    let summary = |id: Option<Uuid>, users: &[User]| {
        id.and_then(|id| users.iter().find(|u| u.id == id))
            .map(UserSummary::from)
    };

    Ok(tasks
        .into_iter()
        .zip(comments)
        .map(|(task, comments)| TaskView {
            assignee: summary(task.assignee_id, &users),
            reviewer: summary(task.reviewer_id, &users),
            comments_count: comments.len(),
            comments: comments
                .into_iter()
                .map(|c| CommentView::new(c, &users))
                .collect(),
            task,
        })
        .collect())
}

async fn task_view(store: &dyn EntityStore, task: Task) -> Result<TaskView, RuleError> {
    task_views(store, vec![task])
        .await?
        .pop()
        .ok_or(RuleError::NotFound(Entity::Task))
}

/// Creates a task on the board named in the payload
///
/// # Errors
///
/// - `Unauthenticated` without an actor
/// - `InvalidField("board")` if no board is named
/// - `NotFound(Board)` if the board does not exist
/// - `Forbidden` if the actor is not owner or member of the board
/// - `InvalidField` for bad title/status/priority, or an assignee/reviewer
///   outside the board
pub async fn create_task(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    input: TaskInput,
) -> Result<TaskView, RuleError> {
    let actor = require_actor(actor)?;

    let board_id = require_board_ref(&input)?;
    let board = load_board(store, board_id).await?;

    if let Err(e) = authorize_create(actor, &board).into_result() {
        tracing::warn!(board_id = %board_id, user_id = %actor, "Task create denied");
        return Err(e);
    }

    let fields = validate_new_task(board_id, &input)?;
    validate_cross_refs(&board, fields.assignee_id, fields.reviewer_id)?;

    let task = store.create_task(fields.into_create(actor)).await?;

    tracing::info!(task_id = %task.id, board_id = %board_id, user_id = %actor, "Task created");
    task_view(store, task).await
}

/// Returns a task to owners and members of its board
pub async fn get_task(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    task_id: Uuid,
) -> Result<TaskView, RuleError> {
    let actor = require_actor(actor)?;
    let task = load_task(store, task_id).await?;
    let board = load_board(store, task.board_id).await?;

    authorize_view(actor, &board).into_result()?;

    task_view(store, task).await
}

/// Applies a partial update
///
/// Only fields present in the payload are validated and written; assignee
/// and reviewer are checked against the board only when newly set. The
/// board reference cannot change.
pub async fn update_task(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    task_id: Uuid,
    input: TaskInput,
) -> Result<TaskView, RuleError> {
    let actor = require_actor(actor)?;
    let task = load_task(store, task_id).await?;

    authorize_edit(actor, &task).into_result()?;
    reject_board_change(&input, &task)?;
    let changes = validate_fields(&input)?;

    let board = load_board(store, task.board_id).await?;
    if let Err(e) = authorize_editor_membership(actor, &board).into_result() {
        tracing::warn!(task_id = %task_id, user_id = %actor, "Task update denied");
        return Err(e);
    }

    let (assignee, reviewer) = touched_refs(&changes);
    validate_cross_refs(&board, assignee, reviewer)?;

    let task = store
        .update_task(task_id, changes)
        .await?
        .ok_or(RuleError::NotFound(Entity::Task))?;

    tracing::info!(task_id = %task_id, user_id = %actor, "Task updated");
    task_view(store, task).await
}

/// Deletes a task; its creator or the board owner only
pub async fn delete_task(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    task_id: Uuid,
) -> Result<(), RuleError> {
    let actor = require_actor(actor)?;
    let task = load_task(store, task_id).await?;
    let board = load_board(store, task.board_id).await?;

    if let Err(e) = authorize_delete(actor, &task, &board).into_result() {
        tracing::warn!(task_id = %task_id, user_id = %actor, "Task delete denied");
        return Err(e);
    }

    store.delete_task(task_id).await?;

    tracing::info!(task_id = %task_id, user_id = %actor, "Task deleted");
    Ok(())
}

/// Tasks where the actor is assignee or reviewer
pub async fn list_assigned_to_me(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
) -> Result<Vec<TaskView>, RuleError> {
    list_related(store, actor, TaskRelation::Assigned).await
}

/// Tasks where the actor is reviewer
pub async fn list_reviewing(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
) -> Result<Vec<TaskView>, RuleError> {
    list_related(store, actor, TaskRelation::Reviewing).await
}

async fn list_related(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    relation: TaskRelation,
) -> Result<Vec<TaskView>, RuleError> {
    let actor = require_actor(actor)?;
    let tasks = store.list_tasks_for_user(actor, relation).await?;
    task_views(store, tasks).await
}
