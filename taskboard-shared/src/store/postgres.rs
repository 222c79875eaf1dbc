/// PostgreSQL-backed entity store
///
/// A thin adapter from [`EntityStore`] onto the sqlx model operations.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{EntityStore, StoreResult};
use crate::{
    db::pool::health_check,
    models::{
        board::{Board, CreateBoard, UpdateBoard},
        comment::{Comment, CreateComment},
        profile::{CreateProfile, Profile, UpdateProfile},
        task::{CreateTask, Task, TaskRelation, UpdateTask},
        user::{CreateUser, User},
    },
};

/// Entity store over a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn get_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(User::find_by_ids(&self.pool, ids).await?)
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn get_board(&self, id: Uuid) -> StoreResult<Option<Board>> {
        Ok(Board::find_by_id(&self.pool, id).await?)
    }

    async fn list_boards_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Board>> {
        Ok(Board::list_for_user(&self.pool, user_id).await?)
    }

    async fn create_board(&self, data: CreateBoard) -> StoreResult<Board> {
        Ok(Board::create(&self.pool, data).await?)
    }

    async fn update_board(&self, id: Uuid, changes: UpdateBoard) -> StoreResult<Option<Board>> {
        Ok(Board::update(&self.pool, id, changes).await?)
    }

    async fn delete_board(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Board::delete(&self.pool, id).await?)
    }

    async fn get_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks_for_board(&self, board_id: Uuid) -> StoreResult<Vec<Task>> {
        Ok(Task::list_by_board(&self.pool, board_id).await?)
    }

    async fn list_tasks_for_user(
        &self,
        user_id: Uuid,
        relation: TaskRelation,
    ) -> StoreResult<Vec<Task>> {
        Ok(Task::list_for_user(&self.pool, user_id, relation).await?)
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn update_task(&self, id: Uuid, changes: UpdateTask) -> StoreResult<Option<Task>> {
        if changes.is_empty() {
            return Ok(Task::find_by_id(&self.pool, id).await?);
        }
        Ok(Task::update(&self.pool, id, changes).await?)
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn get_comment(&self, id: Uuid, task_id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(Comment::find_by_id_and_task(&self.pool, id, task_id).await?)
    }

    async fn list_comments(&self, task_id: Uuid) -> StoreResult<Vec<Comment>> {
        Ok(Comment::list_by_task(&self.pool, task_id).await?)
    }

    async fn create_comment(&self, data: CreateComment) -> StoreResult<Comment> {
        Ok(Comment::create(&self.pool, data).await?)
    }

    async fn update_comment(&self, id: Uuid, content: String) -> StoreResult<Option<Comment>> {
        Ok(Comment::update_content(&self.pool, id, &content).await?)
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Comment::delete(&self.pool, id).await?)
    }

    async fn get_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        Ok(Profile::find_by_user(&self.pool, user_id).await?)
    }

    async fn list_profiles(&self) -> StoreResult<Vec<Profile>> {
        Ok(Profile::list(&self.pool).await?)
    }

    async fn create_profile(&self, data: CreateProfile) -> StoreResult<Profile> {
        Ok(Profile::create(&self.pool, data).await?)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: UpdateProfile,
    ) -> StoreResult<Option<Profile>> {
        if changes.is_empty() {
            return Ok(Profile::find_by_user(&self.pool, user_id).await?);
        }
        Ok(Profile::update(&self.pool, user_id, changes).await?)
    }

    async fn delete_profile(&self, user_id: Uuid) -> StoreResult<bool> {
        Ok(Profile::delete(&self.pool, user_id).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }
}
