/// Task rules
///
/// Covers the rights to create, view, edit and delete tasks, the checks on
/// status, priority and title values, and the requirement that assignee and
/// reviewer belong to the task's board.
///
/// Deletion is allowed for the task's creator and for the board owner, and
/// for nobody else.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{
    check_not_blank, derived_errors, double_option, membership::is_member_or_owner, Decision,
    FieldErrors,
};
use crate::models::{
    board::Board,
    task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
};

/// Task payload for create and partial update
///
/// `assignee_id`, `reviewer_id` and `due_date` distinguish "absent" (outer
/// `None`) from an explicit `null` (`Some(None)`), which clears the value.
/// Status and priority arrive as raw strings; values outside their sets are
/// reported by [`validate_fields`] under the field's own name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TaskInput {
    pub board: Option<Uuid>,
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub reviewer_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

/// Validated fields of a new task, still missing its creator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskFields {
    pub board_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee_id: Option<Uuid>,
    pub reviewer_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
}

impl NewTaskFields {
    pub fn into_create(self, created_by: Uuid) -> CreateTask {
        CreateTask {
            board_id: self.board_id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            assignee_id: self.assignee_id,
            reviewer_id: self.reviewer_id,
            due_date: self.due_date,
            created_by,
        }
    }
}

pub fn can_create(user_id: Uuid, board: &Board) -> bool {
    is_member_or_owner(user_id, board)
}

pub fn can_view(user_id: Uuid, board: &Board) -> bool {
    is_member_or_owner(user_id, board)
}

/// Any authenticated user may attempt an edit
///
/// Field validation still runs on every write, and the update flow requires
/// the editor to belong to the board.
pub fn can_edit(_user_id: Uuid, _task: &Task) -> bool {
    true
}

/// Creator or board owner; other board members are refused
pub fn can_delete(user_id: Uuid, task: &Task, board: &Board) -> bool {
    task.created_by == user_id || board.owner_id == user_id
}

pub fn authorize_create(user_id: Uuid, board: &Board) -> Decision {
    Decision::allow_if(
        can_create(user_id, board),
        "You must be a member of the board to create tasks.",
    )
}

pub fn authorize_view(user_id: Uuid, board: &Board) -> Decision {
    Decision::allow_if(
        can_view(user_id, board),
        "You must be a member of the board to view this task.",
    )
}

pub fn authorize_edit(user_id: Uuid, task: &Task) -> Decision {
    Decision::allow_if(can_edit(user_id, task), "You cannot edit this task.")
}

/// Membership check applied by the update flow once the payload is valid
pub fn authorize_editor_membership(user_id: Uuid, board: &Board) -> Decision {
    Decision::allow_if(
        is_member_or_owner(user_id, board),
        "You must be a member of the board to edit this task.",
    )
}

pub fn authorize_delete(user_id: Uuid, task: &Task, board: &Board) -> Decision {
    Decision::allow_if(
        can_delete(user_id, task, board),
        "Only the task creator or the board owner can delete this task.",
    )
}

/// Extracts the board reference a create payload must carry
pub fn require_board_ref(input: &TaskInput) -> Result<Uuid, FieldErrors> {
    input
        .board
        .ok_or_else(|| FieldErrors::single("board", "This field is required."))
}

/// Rejects update payloads that try to move a task to another board
///
/// Naming the task's current board is accepted, so a client may send a
/// full task representation back.
pub fn reject_board_change(input: &TaskInput, task: &Task) -> Result<(), FieldErrors> {
    match input.board {
        Some(board_id) if board_id != task.board_id => Err(FieldErrors::single(
            "board",
            "The board of a task cannot be changed.",
        )),
        _ => Ok(()),
    }
}

fn check_fields(input: &TaskInput, required: bool) -> (UpdateTask, FieldErrors) {
    let mut errors = derived_errors(input);
    let mut changes = UpdateTask {
        title: input.title.clone(),
        description: input.description.clone(),
        assignee_id: input.assignee_id,
        reviewer_id: input.reviewer_id,
        due_date: input.due_date,
        ..Default::default()
    };

    match &input.title {
        Some(title) => check_not_blank(&mut errors, "title", title),
        None if required => errors.add("title", "This field is required."),
        None => {}
    }

    match input.status.as_deref() {
        Some(raw) => match TaskStatus::parse(raw) {
            Some(status) => changes.status = Some(status),
            None => errors.add(
                "status",
                format!("\"{}\" is not a valid choice. Use to-do, in-progress, review or done.", raw),
            ),
        },
        None if required => errors.add("status", "This field is required."),
        None => {}
    }

    match input.priority.as_deref() {
        Some(raw) => match TaskPriority::parse(raw) {
            Some(priority) => changes.priority = Some(priority),
            None => errors.add(
                "priority",
                format!("\"{}\" is not a valid choice. Use low, medium or high.", raw),
            ),
        },
        None if required => errors.add("priority", "This field is required."),
        None => {}
    }

    (changes, errors)
}

/// Validates the fields present in a payload
///
/// Absent fields are neither checked nor changed. Pure: the same payload
/// always yields the same result.
pub fn validate_fields(input: &TaskInput) -> Result<UpdateTask, FieldErrors> {
    let (changes, errors) = check_fields(input, false);
    errors.into_result(changes)
}

/// Validates a create payload for a task on `board_id`
///
/// Title, status and priority are required; description defaults to empty.
pub fn validate_new_task(board_id: Uuid, input: &TaskInput) -> Result<NewTaskFields, FieldErrors> {
    let (changes, errors) = check_fields(input, true);
    if !errors.is_empty() {
        return Err(errors);
    }

    match (changes.title, changes.status, changes.priority) {
        (Some(title), Some(status), Some(priority)) => Ok(NewTaskFields {
            board_id,
            title,
            description: changes.description.unwrap_or_default(),
            status,
            priority,
            assignee_id: changes.assignee_id.flatten(),
            reviewer_id: changes.reviewer_id.flatten(),
            due_date: changes.due_date.flatten(),
        }),
        _ => Err(errors),
    }
}

/// Checks that a set assignee and reviewer each belong to the board
///
/// Reports the failing role by name: `assignee`, `reviewer`, or both.
pub fn validate_cross_refs(
    board: &Board,
    assignee: Option<Uuid>,
    reviewer: Option<Uuid>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Some(assignee) = assignee {
        if !is_member_or_owner(assignee, board) {
            errors.add("assignee", "The assignee must be a member of the board.");
        }
    }
    if let Some(reviewer) = reviewer {
        if !is_member_or_owner(reviewer, board) {
            errors.add("reviewer", "The reviewer must be a member of the board.");
        }
    }

    errors.into_result(())
}

/// Assignee and reviewer newly set by an update
///
/// Roles that are untouched or cleared need no membership check.
pub fn touched_refs(changes: &UpdateTask) -> (Option<Uuid>, Option<Uuid>) {
    (changes.assignee_id.flatten(), changes.reviewer_id.flatten())
}
