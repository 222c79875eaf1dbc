/// Board operations

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{load_board, tasks::task_views, tasks::TaskView};
use crate::{
    models::{
        board::{Board, CreateBoard},
        task::{TaskPriority, TaskStatus},
        user::UserSummary,
    },
    rules::{
        board::{
            authorize, check_members_exist, validate_board_changes, validate_new_board,
            BoardAction, BoardInput,
        },
        require_actor, Entity, RuleError,
    },
    store::EntityStore,
};

/// Board as shown in the board list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardOverview {
    pub id: Uuid,
    pub title: String,
    pub owner_id: Uuid,
    pub member_count: usize,
    pub ticket_count: usize,
    pub tasks_to_do_count: usize,
    pub tasks_high_prio_count: usize,
}

/// Board with its members and tasks
#[derive(Debug, Clone, Serialize)]
pub struct BoardDetail {
    pub id: Uuid,
    pub title: String,
    pub owner_id: Uuid,
    pub members: Vec<UserSummary>,
    pub tasks: Vec<TaskView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

async fn detail(store: &dyn EntityStore, board: Board) -> Result<BoardDetail, RuleError> {
    let members = store
        .get_users(&board.member_ids)
        .await?
        .iter()
        .map(UserSummary::from)
        .collect();
    let tasks = store.list_tasks_for_board(board.id).await?;
    let tasks = task_views(store, tasks).await?;

    Ok(BoardDetail {
        id: board.id,
        title: board.title,
        owner_id: board.owner_id,
        members,
        tasks,
        created_at: board.created_at,
        updated_at: board.updated_at,
    })
}

async fn ensure_members_exist(store: &dyn EntityStore, requested: &[Uuid]) -> Result<(), RuleError> {
    if requested.is_empty() {
        return Ok(());
    }
    let found = store.get_users(requested).await?;
    check_members_exist(requested, &found)?;
    Ok(())
}

/// Lists the boards the actor owns or belongs to, with task statistics
pub async fn list_boards(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
) -> Result<Vec<BoardOverview>, RuleError> {
    let actor = require_actor(actor)?;

    let boards = store.list_boards_for_user(actor).await?;
    let mut overviews = Vec::with_capacity(boards.len());

    for board in boards {
        let tasks = store.list_tasks_for_board(board.id).await?;
        overviews.push(BoardOverview {
            id: board.id,
            title: board.title,
            owner_id: board.owner_id,
            member_count: board.member_ids.len(),
            ticket_count: tasks.len(),
            tasks_to_do_count: tasks.iter().filter(|t| t.status == TaskStatus::ToDo).count(),
            tasks_high_prio_count: tasks
                .iter()
                .filter(|t| t.priority == TaskPriority::High)
                .count(),
        });
    }

    tracing::debug!(user_id = %actor, count = overviews.len(), "Listed boards");
    Ok(overviews)
}

/// Creates a board owned by the actor
pub async fn create_board(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    input: BoardInput,
) -> Result<BoardDetail, RuleError> {
    let actor = require_actor(actor)?;

    let fields = validate_new_board(&input)?;
    ensure_members_exist(store, &fields.member_ids).await?;

    let board = store
        .create_board(CreateBoard {
            title: fields.title,
            owner_id: actor,
            member_ids: fields.member_ids,
        })
        .await?;

    tracing::info!(board_id = %board.id, owner_id = %actor, "Board created");
    detail(store, board).await
}

/// Returns a board with members and tasks, for owners and members
pub async fn get_board(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    board_id: Uuid,
) -> Result<BoardDetail, RuleError> {
    let actor = require_actor(actor)?;
    let board = load_board(store, board_id).await?;

    authorize(actor, &board, BoardAction::View).into_result()?;

    detail(store, board).await
}

/// Partially updates title and/or member set; the owner never changes
pub async fn update_board(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    board_id: Uuid,
    input: BoardInput,
) -> Result<BoardDetail, RuleError> {
    let actor = require_actor(actor)?;
    let board = load_board(store, board_id).await?;

    if let Err(e) = authorize(actor, &board, BoardAction::Edit).into_result() {
        tracing::warn!(board_id = %board_id, user_id = %actor, "Board update denied");
        return Err(e);
    }

    let changes = validate_board_changes(&input)?;
    if let Some(member_ids) = &changes.member_ids {
        ensure_members_exist(store, member_ids).await?;
    }

    let board = store
        .update_board(board_id, changes)
        .await?
        .ok_or(RuleError::NotFound(Entity::Board))?;

    tracing::info!(board_id = %board_id, user_id = %actor, "Board updated");
    detail(store, board).await
}

/// Deletes a board; owner only
pub async fn delete_board(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    board_id: Uuid,
) -> Result<(), RuleError> {
    let actor = require_actor(actor)?;
    let board = load_board(store, board_id).await?;

    if let Err(e) = authorize(actor, &board, BoardAction::Delete).into_result() {
        tracing::warn!(board_id = %board_id, user_id = %actor, "Board delete denied");
        return Err(e);
    }

    store.delete_board(board_id).await?;

    tracing::info!(board_id = %board_id, user_id = %actor, "Board deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fixtures;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_create_board_sets_owner_and_validates_members() {
        let store = MemoryStore::new();
        let ann = fixtures::user(&store, "Ann").await;
        let bob = fixtures::user(&store, "Bob").await;

        let board = create_board(
            &store,
            Some(ann.id),
            BoardInput {
                title: Some("Launch".to_string()),
                members: Some(vec![bob.id]),
            },
        )
        .await
        .unwrap();

        assert_eq!(board.owner_id, ann.id);
        assert_eq!(board.members.len(), 1);
        assert_eq!(board.members[0].id, bob.id);

        let writes = store.write_count();
        let result = create_board(
            &store,
            Some(ann.id),
            BoardInput {
                title: Some("Ghosts".to_string()),
                members: Some(vec![fixtures::unknown()]),
            },
        )
        .await;

        match result {
            Err(RuleError::InvalidField(errors)) => assert!(errors.contains("members")),
            other => panic!("expected InvalidField, got {:?}", other.map(|b| b.id)),
        }
        assert_eq!(store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_anonymous_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            list_boards(&store, None).await,
            Err(RuleError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_view_edit_delete_rights() {
        let store = MemoryStore::new();
        let owner = fixtures::user(&store, "Owner").await;
        let member = fixtures::user(&store, "Member").await;
        let stranger = fixtures::user(&store, "Stranger").await;
        let board = fixtures::board(&store, &owner, &[&member]).await;

        assert!(get_board(&store, Some(member.id), board.id).await.is_ok());
        assert!(matches!(
            get_board(&store, Some(stranger.id), board.id).await,
            Err(RuleError::Forbidden(_))
        ));

        let renamed = update_board(
            &store,
            Some(member.id),
            board.id,
            BoardInput {
                title: Some("Renamed".to_string()),
                members: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.title, "Renamed");
        assert_eq!(renamed.owner_id, owner.id);

        assert!(matches!(
            delete_board(&store, Some(member.id), board.id).await,
            Err(RuleError::Forbidden(_))
        ));
        delete_board(&store, Some(owner.id), board.id).await.unwrap();
        assert!(matches!(
            get_board(&store, Some(owner.id), board.id).await,
            Err(RuleError::NotFound(Entity::Board))
        ));
    }

    #[tokio::test]
    async fn test_list_boards_counts() {
        let store = MemoryStore::new();
        let owner = fixtures::user(&store, "Owner").await;
        let member = fixtures::user(&store, "Member").await;
        let board = fixtures::board(&store, &owner, &[&member]).await;
        fixtures::task(&store, &board, &owner).await;
        fixtures::task(&store, &board, &member).await;

        let boards = list_boards(&store, Some(member.id)).await.unwrap();
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].member_count, 1);
        assert_eq!(boards[0].ticket_count, 2);
        assert_eq!(boards[0].tasks_to_do_count, 2);
        assert_eq!(boards[0].tasks_high_prio_count, 0);
    }
}
