/// Comment rules
///
/// Board owners and members may read, write and edit comments on the board's
/// tasks. Deleting a comment is reserved to its author: unlike tasks, the
/// board owner has no override here.

use serde::Deserialize;
use uuid::Uuid;

use super::{check_not_blank, membership::is_member_or_owner, Decision, FieldErrors};
use crate::models::{board::Board, comment::Comment};

/// Comment payload for create and update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentInput {
    pub content: Option<String>,
}

/// `board` is the board of the comment's task
pub fn can_create(user_id: Uuid, board: &Board) -> bool {
    is_member_or_owner(user_id, board)
}

pub fn can_view(user_id: Uuid, board: &Board) -> bool {
    is_member_or_owner(user_id, board)
}

/// Any owner or member may edit, not only the author
pub fn can_edit(user_id: Uuid, board: &Board) -> bool {
    is_member_or_owner(user_id, board)
}

pub fn can_delete(user_id: Uuid, comment: &Comment) -> bool {
    comment.author_id == user_id
}

pub fn authorize_create(user_id: Uuid, board: &Board) -> Decision {
    Decision::allow_if(
        can_create(user_id, board),
        "You must be a member of the board to comment on this task.",
    )
}

pub fn authorize_view(user_id: Uuid, board: &Board) -> Decision {
    Decision::allow_if(
        can_view(user_id, board),
        "You must be a member of the board to view these comments.",
    )
}

pub fn authorize_edit(user_id: Uuid, board: &Board) -> Decision {
    Decision::allow_if(
        can_edit(user_id, board),
        "You must be a member of the board to edit this comment.",
    )
}

pub fn authorize_delete(user_id: Uuid, comment: &Comment) -> Decision {
    Decision::allow_if(
        can_delete(user_id, comment),
        "Only the author can delete this comment.",
    )
}

/// Content is required and may not be blank
pub fn validate_content(input: &CommentInput) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();

    match &input.content {
        Some(content) => check_not_blank(&mut errors, "content", content),
        None => errors.add("content", "This field is required."),
    }

    errors.into_result(input.content.clone().unwrap_or_default())
}
