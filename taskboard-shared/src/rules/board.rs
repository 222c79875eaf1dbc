/// Board rules
///
/// Owners and members may view and edit a board; only the owner may delete
/// it. Ownership is fixed at creation and never transferred.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{check_not_blank, derived_errors, membership::is_member_or_owner, Decision, FieldErrors};
use crate::models::{
    board::{Board, UpdateBoard},
    user::User,
};

/// Action attempted on a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    View,
    Edit,
    Delete,
}

pub fn can_view(user_id: Uuid, board: &Board) -> bool {
    is_member_or_owner(user_id, board)
}

/// Edit covers partial updates of the title and the member set
pub fn can_edit(user_id: Uuid, board: &Board) -> bool {
    is_member_or_owner(user_id, board)
}

/// Only the owner may delete; members get no say
pub fn can_delete(user_id: Uuid, board: &Board) -> bool {
    board.owner_id == user_id
}

pub fn authorize(
    user_id: Uuid,
    board: &Board,
    action: BoardAction,
) -> Decision {
    match action {
        BoardAction::View => Decision::allow_if(
            can_view(user_id, board),
            "You must be the owner or a member of this board.",
        ),
        BoardAction::Edit => Decision::allow_if(
            can_edit(user_id, board),
            "You must be the owner or a member of this board.",
        ),
        BoardAction::Delete => Decision::allow_if(
            can_delete(user_id, board),
            "Only the board owner can delete this board.",
        ),
    }
}

/// Board payload for create and partial update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BoardInput {
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub title: Option<String>,

    /// Replaces the member set when present
    pub members: Option<Vec<Uuid>>,
}

impl BoardInput {
    /// Every member ID named by the payload, without duplicates
    pub fn requested_members(&self) -> Vec<Uuid> {
        let mut ids = self.members.clone().unwrap_or_default();
        ids.sort();
        ids.dedup();
        ids
    }
}

/// Validated fields of a new board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBoardFields {
    pub title: String,
    pub member_ids: Vec<Uuid>,
}

/// Validates a create payload; the title is required
pub fn validate_new_board(input: &BoardInput) -> Result<NewBoardFields, FieldErrors> {
    let mut errors = derived_errors(input);

    match &input.title {
        Some(title) => check_not_blank(&mut errors, "title", title),
        None => errors.add("title", "This field is required."),
    }

    errors.into_result(NewBoardFields {
        title: input.title.clone().unwrap_or_default(),
        member_ids: input.requested_members(),
    })
}

/// Validates a partial update; only fields present are checked
pub fn validate_board_changes(input: &BoardInput) -> Result<UpdateBoard, FieldErrors> {
    let mut errors = derived_errors(input);

    if let Some(title) = &input.title {
        check_not_blank(&mut errors, "title", title);
    }

    errors.into_result(UpdateBoard {
        title: input.title.clone(),
        member_ids: input.members.as_ref().map(|_| input.requested_members()),
    })
}

/// Checks that every requested member resolved to an existing user
pub fn check_members_exist(requested: &[Uuid], found: &[User]) -> Result<(), FieldErrors> {
    let missing: Vec<String> = requested
        .iter()
        .filter(|id| !found.iter().any(|u| u.id == **id))
        .map(|id| id.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(FieldErrors::single(
            "members",
            format!("Unknown user(s): {}", missing.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::membership::fixtures::board;
    use chrono::Utc;

    fn user(id: Uuid) -> User {
        User {
            id,
            email: format!("{}@example.com", id),
            password_hash: String::new(),
            fullname: "Someone".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_truth_table() {
        let owner = Uuid::new_v4();
        let member = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let b = board(owner, vec![member]);

        // (user, view, edit, delete)
        let cases = [
            (owner, true, true, true),
            (member, true, true, false),
            (stranger, false, false, false),
        ];

        for (user, view, edit, delete) in cases {
            assert_eq!(can_view(user, &b), view);
            assert_eq!(can_edit(user, &b), edit);
            assert_eq!(can_delete(user, &b), delete);
            assert_eq!(authorize(user, &b, BoardAction::View).is_allowed(), view);
            assert_eq!(authorize(user, &b, BoardAction::Edit).is_allowed(), edit);
            assert_eq!(authorize(user, &b, BoardAction::Delete).is_allowed(), delete);
        }
    }

    #[test]
    fn test_owner_in_member_list_can_still_delete() {
        let owner = Uuid::new_v4();
        let b = board(owner, vec![owner]);
        assert!(can_delete(owner, &b));
    }

    #[test]
    fn test_validate_new_board_requires_title() {
        let errors = validate_new_board(&BoardInput::default()).unwrap_err();
        assert!(errors.contains("title"));

        let errors = validate_new_board(&BoardInput {
            title: Some("  ".to_string()),
            members: None,
        })
        .unwrap_err();
        assert!(errors.contains("title"));
    }

    #[test]
    fn test_validate_new_board_dedups_members() {
        let a = Uuid::new_v4();
        let fields = validate_new_board(&BoardInput {
            title: Some("Roadmap".to_string()),
            members: Some(vec![a, a]),
        })
        .unwrap();

        assert_eq!(fields.title, "Roadmap");
        assert_eq!(fields.member_ids, vec![a]);
    }

    #[test]
    fn test_validate_board_changes_only_checks_present_fields() {
        let changes = validate_board_changes(&BoardInput::default()).unwrap();
        assert!(changes.title.is_none());
        assert!(changes.member_ids.is_none());

        let changes = validate_board_changes(&BoardInput {
            title: None,
            members: Some(vec![]),
        })
        .unwrap();
        assert_eq!(changes.member_ids, Some(vec![]));

        let errors = validate_board_changes(&BoardInput {
            title: Some("x".repeat(256)),
            members: None,
        })
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("title"));

        // length counts characters, not bytes
        assert!(validate_board_changes(&BoardInput {
            title: Some("é".repeat(255)),
            members: None,
        })
        .is_ok());
    }

    #[test]
    fn test_check_members_exist() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(check_members_exist(&[a], &[user(a)]).is_ok());

        let errors = check_members_exist(&[a, b], &[user(a)]).unwrap_err();
        assert!(errors.contains("members"));
    }
}
