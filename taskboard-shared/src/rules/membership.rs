/// Board membership resolution
///
/// The owner of a board counts as a member whether or not they appear in the
/// explicit member set. Every rule that asks "does this user belong to this
/// board" goes through [`is_member_or_owner`].

use uuid::Uuid;

use crate::models::board::Board;

/// How a user relates to a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardRole {
    Owner,
    Member,
    Outsider,
}

/// Resolves the user's role on the board; ownership wins over membership
pub fn role_of(user_id: Uuid, board: &Board) -> BoardRole {
    if board.owner_id == user_id {
        BoardRole::Owner
    } else if board.member_ids.contains(&user_id) {
        BoardRole::Member
    } else {
        BoardRole::Outsider
    }
}

/// True iff the user owns the board or is in its member set
pub fn is_member_or_owner(user_id: Uuid, board: &Board) -> bool {
    role_of(user_id, board) != BoardRole::Outsider
}
