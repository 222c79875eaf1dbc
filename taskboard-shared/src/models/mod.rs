/// Database models for Taskboard
///
/// This module contains all database models and their CRUD operations.
/// Higher layers reach them through the `store` module rather than calling
/// the queries directly.
///
/// # Models
///
/// - `user`: Registered accounts
/// - `board`: Boards with an owner and a member set
/// - `task`: Tasks on a board, with status, priority, assignee and reviewer
/// - `comment`: Comments attached to a task
/// - `profile`: Optional per-user profile details
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::board::{Board, CreateBoard};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(owner_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let board = Board::create(&pool, CreateBoard {
///     title: "Launch".to_string(),
///     owner_id,
///     member_ids: vec![],
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod board;
pub mod comment;
pub mod profile;
pub mod task;
pub mod user;
