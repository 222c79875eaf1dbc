/// In-memory entity store
///
/// Keeps every table in insertion order behind a single `RwLock`, which makes
/// email uniqueness atomic and keeps listings deterministic. Successful writes
/// are counted so callers can check that a rejected operation left the store
/// untouched.
///
/// # Example
///
/// ```
/// use taskboard_shared::models::user::CreateUser;
/// use taskboard_shared::store::{EntityStore, MemoryStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = MemoryStore::new();
/// store.create_user(CreateUser {
///     email: "ada@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     fullname: "Ada".to_string(),
/// }).await.unwrap();
///
/// assert!(store.get_user_by_email("ADA@example.com").await.unwrap().is_some());
/// assert_eq!(store.write_count(), 1);
/// # }
/// ```

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EntityStore, StoreError, StoreResult};
use crate::models::{
    board::{Board, CreateBoard, UpdateBoard},
    comment::{Comment, CreateComment},
    profile::{CreateProfile, Profile, UpdateProfile},
    task::{CreateTask, Task, TaskRelation, UpdateTask},
    user::{CreateUser, User},
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    profiles: Vec<Profile>,
    boards: Vec<Board>,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
}

/// Entity store held entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    writes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

fn dedup_members(member_ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut member_ids = member_ids;
    member_ids.sort();
    member_ids.dedup();
    member_ids
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.fullname.cmp(&b.fullname));
        Ok(users)
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = email.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        let email = data.email.to_lowercase();
        if tables.users.iter().any(|u| u.email.to_lowercase() == email) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            password_hash: data.password_hash,
            fullname: data.fullname,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        self.record_write();

        Ok(user)
    }

    async fn get_board(&self, id: Uuid) -> StoreResult<Option<Board>> {
        let tables = self.tables.read().await;
        Ok(tables.boards.iter().find(|b| b.id == id).cloned())
    }

    async fn list_boards_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Board>> {
        let tables = self.tables.read().await;
        let mut boards: Vec<Board> = tables
            .boards
            .iter()
            .filter(|b| b.owner_id == user_id || b.member_ids.contains(&user_id))
            .cloned()
            .collect();
        // stable sort keeps insertion order between equal titles
        boards.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(boards)
    }

    async fn create_board(&self, data: CreateBoard) -> StoreResult<Board> {
        let mut tables = self.tables.write().await;

        let now = Utc::now();
        let board = Board {
            id: Uuid::new_v4(),
            title: data.title,
            owner_id: data.owner_id,
            member_ids: dedup_members(data.member_ids),
            created_at: now,
            updated_at: now,
        };
        tables.boards.push(board.clone());
        self.record_write();

        Ok(board)
    }

    async fn update_board(&self, id: Uuid, changes: UpdateBoard) -> StoreResult<Option<Board>> {
        let mut tables = self.tables.write().await;

        let Some(board) = tables.boards.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            board.title = title;
        }
        if let Some(member_ids) = changes.member_ids {
            board.member_ids = dedup_members(member_ids);
        }
        board.updated_at = Utc::now();
        let updated = board.clone();
        self.record_write();

        Ok(Some(updated))
    }

    async fn delete_board(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        let before = tables.boards.len();
        tables.boards.retain(|b| b.id != id);
        if tables.boards.len() == before {
            return Ok(false);
        }

        let task_ids: Vec<Uuid> = tables
            .tasks
            .iter()
            .filter(|t| t.board_id == id)
            .map(|t| t.id)
            .collect();
        tables.tasks.retain(|t| t.board_id != id);
        tables.comments.retain(|c| !task_ids.contains(&c.task_id));
        self.record_write();

        Ok(true)
    }

    async fn get_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks_for_board(&self, board_id: Uuid) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .filter(|t| t.board_id == board_id)
            .cloned()
            .collect())
    }

    async fn list_tasks_for_user(
        &self,
        user_id: Uuid,
        relation: TaskRelation,
    ) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .filter(|t| relation.matches(user_id, t))
            .cloned()
            .collect())
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;

        if !tables.boards.iter().any(|b| b.id == data.board_id) {
            return Err(StoreError::Backend(format!(
                "board {} does not exist",
                data.board_id
            )));
        }

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            board_id: data.board_id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            assignee_id: data.assignee_id,
            reviewer_id: data.reviewer_id,
            due_date: data.due_date,
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.push(task.clone());
        self.record_write();

        Ok(task)
    }

    async fn update_task(&self, id: Uuid, changes: UpdateTask) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;

        let Some(task) = tables.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if changes.is_empty() {
            return Ok(Some(task.clone()));
        }

        changes.apply_to(task);
        task.updated_at = Utc::now();
        let updated = task.clone();
        self.record_write();

        Ok(Some(updated))
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != id);
        if tables.tasks.len() == before {
            return Ok(false);
        }

        tables.comments.retain(|c| c.task_id != id);
        self.record_write();

        Ok(true)
    }

    async fn get_comment(&self, id: Uuid, task_id: Uuid) -> StoreResult<Option<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .find(|c| c.id == id && c.task_id == task_id)
            .cloned())
    }

    async fn list_comments(&self, task_id: Uuid) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect())
    }

    async fn create_comment(&self, data: CreateComment) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;

        if !tables.tasks.iter().any(|t| t.id == data.task_id) {
            return Err(StoreError::Backend(format!(
                "task {} does not exist",
                data.task_id
            )));
        }

        let comment = Comment {
            id: Uuid::new_v4(),
            task_id: data.task_id,
            author_id: data.author_id,
            content: data.content,
            created_at: Utc::now(),
        };
        tables.comments.push(comment.clone());
        self.record_write();

        Ok(comment)
    }

    async fn update_comment(&self, id: Uuid, content: String) -> StoreResult<Option<Comment>> {
        let mut tables = self.tables.write().await;

        let Some(comment) = tables.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        comment.content = content;
        let updated = comment.clone();
        self.record_write();

        Ok(Some(updated))
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        let removed = tables.comments.len() != before;
        if removed {
            self.record_write();
        }

        Ok(removed)
    }

    async fn get_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn list_profiles(&self) -> StoreResult<Vec<Profile>> {
        let tables = self.tables.read().await;

        let mut profiles = tables.profiles.clone();
        profiles.sort_by_cached_key(|p| {
            tables
                .users
                .iter()
                .find(|u| u.id == p.user_id)
                .map(|u| u.fullname.clone())
                .unwrap_or_default()
        });
        Ok(profiles)
    }

    async fn create_profile(&self, data: CreateProfile) -> StoreResult<Profile> {
        let mut tables = self.tables.write().await;

        if !tables.users.iter().any(|u| u.id == data.user_id) {
            return Err(StoreError::Backend(format!(
                "user {} does not exist",
                data.user_id
            )));
        }
        if tables.profiles.iter().any(|p| p.user_id == data.user_id) {
            return Err(StoreError::Conflict("profiles_pkey".to_string()));
        }

        let now = Utc::now();
        let profile = Profile {
            user_id: data.user_id,
            bio: data.bio,
            location: data.location,
            created_at: now,
            updated_at: now,
        };
        tables.profiles.push(profile.clone());
        self.record_write();

        Ok(profile)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: UpdateProfile,
    ) -> StoreResult<Option<Profile>> {
        let mut tables = self.tables.write().await;

        let Some(profile) = tables.profiles.iter_mut().find(|p| p.user_id == user_id) else {
            return Ok(None);
        };

        if changes.is_empty() {
            return Ok(Some(profile.clone()));
        }

        changes.apply_to(profile);
        profile.updated_at = Utc::now();
        let updated = profile.clone();
        self.record_write();

        Ok(Some(updated))
    }

    async fn delete_profile(&self, user_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        let before = tables.profiles.len();
        tables.profiles.retain(|p| p.user_id != user_id);
        let removed = tables.profiles.len() != before;
        if removed {
            self.record_write();
        }

        Ok(removed)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
