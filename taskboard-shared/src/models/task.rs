/// Task model and database operations
///
/// Tasks belong to exactly one board for their whole lifetime. Assignee and
/// reviewer are weak references: removing the user clears the field.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('to-do', 'in-progress', 'review', 'done');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status task_status NOT NULL,
///     priority task_priority NOT NULL,
///     assignee_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     reviewer_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     due_date DATE,
///     created_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{CreateTask, Task, TaskPriority, TaskStatus};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, board_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     board_id,
///     title: "Write release notes".to_string(),
///     description: String::new(),
///     status: TaskStatus::ToDo,
///     priority: TaskPriority::High,
///     assignee_id: Some(user_id),
///     reviewer_id: None,
///     due_date: None,
///     created_by: user_id,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::ToDo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    /// Converts status to its wire/database form
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "to-do",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        }
    }

    /// Parses the wire form; anything else is `None`
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    /// Converts priority to its wire/database form
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    /// Parses the wire form; anything else is `None`
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Board the task belongs to (immutable)
    pub board_id: Uuid,

    /// Short title
    pub title: String,

    /// Free-form description, empty when not given
    pub description: String,

    pub status: TaskStatus,

    pub priority: TaskPriority,

    /// User working on the task
    pub assignee_id: Option<Uuid>,

    /// User reviewing the task
    pub reviewer_id: Option<Uuid>,

    pub due_date: Option<NaiveDate>,

    /// User who created the task (immutable)
    pub created_by: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTask {
    pub board_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee_id: Option<Uuid>,
    pub reviewer_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub created_by: Uuid,
}

/// Input for updating a task
///
/// Outer `None` leaves a field untouched. For the nullable references,
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<Option<Uuid>>,
    pub reviewer_id: Option<Option<Uuid>>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl UpdateTask {
    /// Checks whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        *self == UpdateTask::default()
    }

    /// Applies the changes to an in-memory task
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(assignee_id) = self.assignee_id {
            task.assignee_id = assignee_id;
        }
        if let Some(reviewer_id) = self.reviewer_id {
            task.reviewer_id = reviewer_id;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

/// Relationship between a user and the tasks listed for them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRelation {
    /// User is the assignee or the reviewer
    Assigned,

    /// User is the reviewer
    Reviewing,
}

impl TaskRelation {
    /// Checks whether `task` belongs in this listing for `user_id`
    pub fn matches(&self, user_id: Uuid, task: &Task) -> bool {
        match self {
            TaskRelation::Assigned => {
                task.assignee_id == Some(user_id) || task.reviewer_id == Some(user_id)
            }
            TaskRelation::Reviewing => task.reviewer_id == Some(user_id),
        }
    }
}

const TASK_COLUMNS: &str = "id, board_id, title, description, status, priority, \
    assignee_id, reviewer_id, due_date, created_by, created_at, updated_at";

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error if the board or a referenced user does not exist, or
    /// if the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO tasks (board_id, title, description, status, priority,
                               assignee_id, reviewer_id, due_date, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            TASK_COLUMNS
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(data.board_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .bind(data.priority)
            .bind(data.assignee_id)
            .bind(data.reviewer_id)
            .bind(data.due_date)
            .bind(data.created_by)
            .fetch_one(pool)
            .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Lists the tasks of a board, oldest first
    pub async fn list_by_board(pool: &PgPool, board_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM tasks WHERE board_id = $1 ORDER BY created_at ASC",
            TASK_COLUMNS
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(board_id)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Lists tasks related to a user, oldest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        relation: TaskRelation,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let filter = match relation {
            TaskRelation::Assigned => "assignee_id = $1 OR reviewer_id = $1",
            TaskRelation::Reviewing => "reviewer_id = $1",
        };
        let query = format!(
            "SELECT {} FROM tasks WHERE {} ORDER BY created_at ASC",
            TASK_COLUMNS, filter
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Applies a partial update
    ///
    /// Only the fields present in `data` are written. Returns `None` if the
    /// task does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        let mut push = |column: &str, present: bool| {
            if present {
                bind_count += 1;
                query.push_str(&format!(", {} = ${}", column, bind_count));
            }
        };
        push("title", data.title.is_some());
        push("description", data.description.is_some());
        push("status", data.status.is_some());
        push("priority", data.priority.is_some());
        push("assignee_id", data.assignee_id.is_some());
        push("reviewer_id", data.reviewer_id.is_some());
        push("due_date", data.due_date.is_some());

        query.push_str(&format!(" WHERE id = $1 RETURNING {}", TASK_COLUMNS));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(assignee_id) = data.assignee_id {
            q = q.bind(assignee_id);
        }
        if let Some(reviewer_id) = data.reviewer_id {
            q = q.bind(reviewer_id);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task
    ///
    /// Comments on the task are removed too (ON DELETE CASCADE).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
