/// Comment operations
///
/// Every operation resolves the task first, then the comment under that
/// task, then checks rights against the task's board. A comment id that
/// exists under another task is reported as not found.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{load_board, load_task};
use crate::{
    models::{
        comment::{Comment, CreateComment},
        user::User,
    },
    rules::{
        comment::{
            authorize_create, authorize_delete, authorize_edit, authorize_view, validate_content,
            CommentInput,
        },
        require_actor, Entity, RuleError,
    },
    store::EntityStore,
};

/// Comment with its author's display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub task_id: Uuid,
    pub author_id: Uuid,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl CommentView {
    pub(crate) fn new(comment: Comment, authors: &[User]) -> Self {
        let author = authors
            .iter()
            .find(|u| u.id == comment.author_id)
            .map(|u| u.fullname.clone())
            .unwrap_or_default();

        Self {
            id: comment.id,
            task_id: comment.task_id,
            author_id: comment.author_id,
            author,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

async fn views(store: &dyn EntityStore, comments: Vec<Comment>) -> Result<Vec<CommentView>, RuleError> {
    let mut author_ids: Vec<Uuid> = comments.iter().map(|c| c.author_id).collect();
    author_ids.sort();
    author_ids.dedup();

    let authors = if author_ids.is_empty() {
        Vec::new()
    } else {
        store.get_users(&author_ids).await?
    };

    Ok(comments
        .into_iter()
        .map(|c| CommentView::new(c, &authors))
        .collect())
}

async fn view(store: &dyn EntityStore, comment: Comment) -> Result<CommentView, RuleError> {
    views(store, vec![comment])
        .await?
        .pop()
        .ok_or(RuleError::NotFound(Entity::Comment))
}

async fn load_comment(
    store: &dyn EntityStore,
    task_id: Uuid,
    comment_id: Uuid,
) -> Result<Comment, RuleError> {
    store
        .get_comment(comment_id, task_id)
        .await?
        .ok_or(RuleError::NotFound(Entity::Comment))
}

/// Lists the comments of a task, oldest first
pub async fn list_comments(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    task_id: Uuid,
) -> Result<Vec<CommentView>, RuleError> {
    let actor = require_actor(actor)?;
    let task = load_task(store, task_id).await?;
    let board = load_board(store, task.board_id).await?;

    authorize_view(actor, &board).into_result()?;

    let comments = store.list_comments(task_id).await?;
    views(store, comments).await
}

/// Adds a comment authored by the actor
pub async fn create_comment(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    task_id: Uuid,
    input: CommentInput,
) -> Result<CommentView, RuleError> {
    let actor = require_actor(actor)?;
    let task = load_task(store, task_id).await?;
    let board = load_board(store, task.board_id).await?;

    if let Err(e) = authorize_create(actor, &board).into_result() {
        tracing::warn!(task_id = %task_id, user_id = %actor, "Comment create denied");
        return Err(e);
    }

    let content = validate_content(&input)?;
    let comment = store
        .create_comment(CreateComment {
            task_id,
            author_id: actor,
            content,
        })
        .await?;

    tracing::info!(comment_id = %comment.id, task_id = %task_id, user_id = %actor, "Comment created");
    view(store, comment).await
}

pub async fn get_comment(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    task_id: Uuid,
    comment_id: Uuid,
) -> Result<CommentView, RuleError> {
    let actor = require_actor(actor)?;
    let task = load_task(store, task_id).await?;
    let comment = load_comment(store, task_id, comment_id).await?;
    let board = load_board(store, task.board_id).await?;

    authorize_view(actor, &board).into_result()?;

    view(store, comment).await
}

/// Replaces the content of a comment; any owner or member of the board may
pub async fn update_comment(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    task_id: Uuid,
    comment_id: Uuid,
    input: CommentInput,
) -> Result<CommentView, RuleError> {
    let actor = require_actor(actor)?;
    let task = load_task(store, task_id).await?;
    load_comment(store, task_id, comment_id).await?;
    let board = load_board(store, task.board_id).await?;

    if let Err(e) = authorize_edit(actor, &board).into_result() {
        tracing::warn!(comment_id = %comment_id, user_id = %actor, "Comment update denied");
        return Err(e);
    }

    let content = validate_content(&input)?;
    let comment = store
        .update_comment(comment_id, content)
        .await?
        .ok_or(RuleError::NotFound(Entity::Comment))?;

    tracing::info!(comment_id = %comment_id, user_id = %actor, "Comment updated");
    view(store, comment).await
}

/// Deletes a comment; its author only, the board owner has no override
pub async fn delete_comment(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    task_id: Uuid,
    comment_id: Uuid,
) -> Result<(), RuleError> {
    let actor = require_actor(actor)?;
    load_task(store, task_id).await?;
    let comment = load_comment(store, task_id, comment_id).await?;

    if let Err(e) = authorize_delete(actor, &comment).into_result() {
        tracing::warn!(comment_id = %comment_id, user_id = %actor, "Comment delete denied");
        return Err(e);
    }

    store.delete_comment(comment_id).await?;

    tracing::info!(comment_id = %comment_id, user_id = %actor, "Comment deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fixtures;
    use crate::store::MemoryStore;

    fn content(text: &str) -> CommentInput {
        CommentInput {
            content: Some(text.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_requires_membership() {
        let store = MemoryStore::new();
        let alice = fixtures::user(&store, "Alice").await;
        let bob = fixtures::user(&store, "Bob").await;
        let carol = fixtures::user(&store, "Carol").await;
        let board = fixtures::board(&store, &alice, &[&bob]).await;
        let task = fixtures::task(&store, &board, &bob).await;

        assert!(matches!(
            create_comment(&store, Some(carol.id), task.id, content("hi")).await,
            Err(RuleError::Forbidden(_))
        ));

        let by_bob = create_comment(&store, Some(bob.id), task.id, content("on it"))
            .await
            .unwrap();
        assert_eq!(by_bob.author_id, bob.id);
        assert_eq!(by_bob.author, "Bob");

        let by_alice = create_comment(&store, Some(alice.id), task.id, content("thanks"))
            .await
            .unwrap();
        assert_eq!(by_alice.author_id, alice.id);

        let listed = list_comments(&store, Some(bob.id), task.id).await.unwrap();
        assert_eq!(
            listed.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![by_bob.id, by_alice.id]
        );
    }

    #[tokio::test]
    async fn test_blank_content_rejected() {
        let store = MemoryStore::new();
        let alice = fixtures::user(&store, "Alice").await;
        let board = fixtures::board(&store, &alice, &[]).await;
        let task = fixtures::task(&store, &board, &alice).await;
        let writes = store.write_count();

        match create_comment(&store, Some(alice.id), task.id, content("   ")).await {
            Err(RuleError::InvalidField(errors)) => assert!(errors.contains("content")),
            other => panic!("expected InvalidField, got {:?}", other.map(|c| c.id)),
        }
        assert_eq!(store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_owner_cannot_delete_others_comment() {
        let store = MemoryStore::new();
        let alice = fixtures::user(&store, "Alice").await;
        let bob = fixtures::user(&store, "Bob").await;
        let board = fixtures::board(&store, &alice, &[&bob]).await;
        let task = fixtures::task(&store, &board, &bob).await;
        let comment = create_comment(&store, Some(bob.id), task.id, content("mine"))
            .await
            .unwrap();

        assert!(matches!(
            delete_comment(&store, Some(alice.id), task.id, comment.id).await,
            Err(RuleError::Forbidden(_))
        ));

        // editing is open to the whole board
        let edited = update_comment(&store, Some(alice.id), task.id, comment.id, content("edited"))
            .await
            .unwrap();
        assert_eq!(edited.content, "edited");
        assert_eq!(edited.author_id, bob.id);

        delete_comment(&store, Some(bob.id), task.id, comment.id)
            .await
            .unwrap();
        assert!(matches!(
            get_comment(&store, Some(bob.id), task.id, comment.id).await,
            Err(RuleError::NotFound(Entity::Comment))
        ));
    }

    #[tokio::test]
    async fn test_comment_scoped_to_task() {
        let store = MemoryStore::new();
        let alice = fixtures::user(&store, "Alice").await;
        let board = fixtures::board(&store, &alice, &[]).await;
        let first = fixtures::task(&store, &board, &alice).await;
        let second = fixtures::task(&store, &board, &alice).await;
        let comment = create_comment(&store, Some(alice.id), first.id, content("here"))
            .await
            .unwrap();

        assert!(matches!(
            get_comment(&store, Some(alice.id), second.id, comment.id).await,
            Err(RuleError::NotFound(Entity::Comment))
        ));
        assert!(matches!(
            get_comment(&store, Some(alice.id), fixtures::unknown(), comment.id).await,
            Err(RuleError::NotFound(Entity::Task))
        ));
        assert!(matches!(
            delete_comment(&store, Some(alice.id), second.id, comment.id).await,
            Err(RuleError::NotFound(Entity::Comment))
        ));
    }

    #[tokio::test]
    async fn test_missing_comment_reported_before_forbidden() {
        let store = MemoryStore::new();
        let alice = fixtures::user(&store, "Alice").await;
        let carol = fixtures::user(&store, "Carol").await;
        let board = fixtures::board(&store, &alice, &[]).await;
        let task = fixtures::task(&store, &board, &alice).await;

        assert!(matches!(
            update_comment(&store, Some(carol.id), task.id, fixtures::unknown(), content("x")).await,
            Err(RuleError::NotFound(Entity::Comment))
        ));
        assert!(matches!(
            list_comments(&store, Some(carol.id), task.id).await,
            Err(RuleError::Forbidden(_))
        ));
    }
}
