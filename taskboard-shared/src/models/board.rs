/// Board model and database operations
///
/// A board has exactly one owner and a set of members. Membership rows live in
/// `board_members`; they are folded into `member_ids` whenever a board is loaded,
/// so a `Board` value always carries everything the authorization rules need.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE board_members (
///     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     PRIMARY KEY (board_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Board model with its member set resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    /// Unique board ID
    pub id: Uuid,

    /// Board title
    pub title: String,

    /// User who created the board (immutable)
    pub owner_id: Uuid,

    /// Explicit members; may or may not contain the owner
    pub member_ids: Vec<Uuid>,

    /// When the board was created
    pub created_at: DateTime<Utc>,

    /// When the board was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoard {
    pub title: String,
    pub owner_id: Uuid,
    pub member_ids: Vec<Uuid>,
}

/// Input for updating a board
///
/// `None` leaves the field untouched. `member_ids: Some(..)` replaces the whole
/// member set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBoard {
    pub title: Option<String>,
    pub member_ids: Option<Vec<Uuid>>,
}

const BOARD_COLUMNS: &str = r#"
    SELECT b.id, b.title, b.owner_id, b.created_at, b.updated_at,
           COALESCE(
               ARRAY_AGG(m.user_id ORDER BY m.user_id) FILTER (WHERE m.user_id IS NOT NULL),
               '{}'
           ) AS member_ids
    FROM boards b
    LEFT JOIN board_members m ON m.board_id = b.id
"#;

impl Board {
    /// Creates a board together with its initial members
    ///
    /// Runs in a single transaction so a board never exists without its
    /// member rows.
    ///
    /// # Errors
    ///
    /// Returns an error if a member or owner ID does not reference a user, or
    /// if the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateBoard) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO boards (title, owner_id)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(data.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_members(&mut tx, id, &data.member_ids).await?;

        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Finds a board by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("{} WHERE b.id = $1 GROUP BY b.id", BOARD_COLUMNS);

        let board = sqlx::query_as::<_, Board>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(board)
    }

    /// Lists boards the user owns or is a member of, ordered by title
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"{}
            WHERE b.owner_id = $1
               OR EXISTS (
                   SELECT 1 FROM board_members bm
                   WHERE bm.board_id = b.id AND bm.user_id = $1
               )
            GROUP BY b.id
            ORDER BY b.title ASC, b.created_at ASC
            "#,
            BOARD_COLUMNS
        );

        let boards = sqlx::query_as::<_, Board>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(boards)
    }

    /// Applies a partial update
    ///
    /// Returns `None` if the board does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateBoard,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE boards
            SET title = COALESCE($2, title),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(data.title)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(member_ids) = data.member_ids {
            sqlx::query("DELETE FROM board_members WHERE board_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            Self::insert_members(&mut tx, id, &member_ids).await?;
        }

        tx.commit().await?;

        Self::find_by_id(pool, id).await
    }

    /// Deletes a board
    ///
    /// Tasks, comments and member rows go with it (ON DELETE CASCADE).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_members(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        board_id: Uuid,
        member_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        if member_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO board_members (board_id, user_id)
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(board_id)
        .bind(member_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
