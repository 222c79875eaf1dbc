/// Profile model and database operations
///
/// A profile holds optional details about a user. It is keyed by the user's
/// ID, so each user has at most one profile.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE profiles (
///     user_id UUID PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
///     bio TEXT,
///     location VARCHAR(100),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Profile model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    /// User the profile belongs to
    pub user_id: Uuid,

    pub bio: Option<String>,

    /// Free-form location, at most 100 characters
    pub location: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfile {
    pub user_id: Uuid,
    pub bio: Option<String>,
    pub location: Option<String>,
}

/// Input for updating a profile
///
/// The outer `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub bio: Option<Option<String>>,
    pub location: Option<Option<String>>,
}

impl UpdateProfile {
    pub fn is_empty(&self) -> bool {
        self.bio.is_none() && self.location.is_none()
    }

    /// Applies the changes to an in-memory profile
    pub fn apply_to(self, profile: &mut Profile) {
        if let Some(bio) = self.bio {
            profile.bio = bio;
        }
        if let Some(location) = self.location {
            profile.location = location;
        }
    }
}

impl Profile {
    /// Creates a profile
    ///
    /// # Errors
    ///
    /// Fails with a unique violation (`profiles_pkey`) if the user already has
    /// a profile.
    pub async fn create(pool: &PgPool, data: CreateProfile) -> Result<Self, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, bio, location)
            VALUES ($1, $2, $3)
            RETURNING user_id, bio, location, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.bio)
        .bind(data.location)
        .fetch_one(pool)
        .await?;

        Ok(profile)
    }

    pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, bio, location, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    /// Lists every profile, ordered by the owning user's display name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let profiles = sqlx::query_as::<_, Profile>(
            r#"
            SELECT p.user_id, p.bio, p.location, p.created_at, p.updated_at
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            ORDER BY u.fullname ASC, p.created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(profiles)
    }

    /// Updates the fields present in `changes`
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        changes: UpdateProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET bio = CASE WHEN $2 THEN $3 ELSE bio END,
                location = CASE WHEN $4 THEN $5 ELSE location END,
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING user_id, bio, location, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(changes.bio.is_some())
        .bind(changes.bio.flatten())
        .bind(changes.location.is_some())
        .bind(changes.location.flatten())
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
