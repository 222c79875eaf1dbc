/// Entity store abstraction
///
/// Everything the services read or write goes through [`EntityStore`]. Two
/// implementations exist:
///
/// - [`postgres::PgStore`]: the production store, backed by the sqlx models
/// - [`memory::MemoryStore`]: an in-process store for tests and local runs
///
/// Lookups return `Ok(None)` for absent records; only infrastructure problems
/// and unique-constraint violations are errors.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    board::{Board, CreateBoard, UpdateBoard},
    comment::{Comment, CreateComment},
    profile::{CreateProfile, Profile, UpdateProfile},
    task::{CreateTask, Task, TaskRelation, UpdateTask},
    user::{CreateUser, User},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write; carries the constraint name
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// Any other failure of the underlying storage
    #[error("Storage backend failure: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return StoreError::Conflict(constraint);
            }
        }

        StoreError::Backend(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract for users, profiles, boards, tasks and comments
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Returns the users among `ids` that exist, ordered by display name
    async fn get_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;

    /// Case-insensitive lookup
    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fails with `StoreError::Conflict` if the email is taken
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn get_board(&self, id: Uuid) -> StoreResult<Option<Board>>;

    /// Boards the user owns or is a member of, ordered by title
    async fn list_boards_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Board>>;

    async fn create_board(&self, data: CreateBoard) -> StoreResult<Board>;

    async fn update_board(&self, id: Uuid, changes: UpdateBoard) -> StoreResult<Option<Board>>;

    /// Removes the board with its tasks and their comments
    async fn delete_board(&self, id: Uuid) -> StoreResult<bool>;

    async fn get_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Tasks of a board, oldest first
    async fn list_tasks_for_board(&self, board_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Tasks related to a user, oldest first
    async fn list_tasks_for_user(
        &self,
        user_id: Uuid,
        relation: TaskRelation,
    ) -> StoreResult<Vec<Task>>;

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    async fn update_task(&self, id: Uuid, changes: UpdateTask) -> StoreResult<Option<Task>>;

    /// Removes the task and its comments
    async fn delete_task(&self, id: Uuid) -> StoreResult<bool>;

    /// Looks a comment up under a specific task only
    async fn get_comment(&self, id: Uuid, task_id: Uuid) -> StoreResult<Option<Comment>>;

    /// Comments of a task, oldest first
    async fn list_comments(&self, task_id: Uuid) -> StoreResult<Vec<Comment>>;

    async fn create_comment(&self, data: CreateComment) -> StoreResult<Comment>;

    async fn update_comment(&self, id: Uuid, content: String) -> StoreResult<Option<Comment>>;

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool>;

    async fn get_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>>;

    /// Every profile, ordered by the owning user's display name
    async fn list_profiles(&self) -> StoreResult<Vec<Profile>>;

    /// Fails with `StoreError::Conflict` if the user already has a profile
    async fn create_profile(&self, data: CreateProfile) -> StoreResult<Profile>;

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: UpdateProfile,
    ) -> StoreResult<Option<Profile>>;

    async fn delete_profile(&self, user_id: Uuid) -> StoreResult<bool>;

    /// Checks that the store is reachable
    async fn ping(&self) -> StoreResult<()>;
}
