/// Profile rules
///
/// Any authenticated user may read profiles. A user creates, edits and
/// deletes only their own profile.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{derived_errors, double_option, Decision, FieldErrors};
use crate::models::profile::{CreateProfile, Profile, UpdateProfile};

/// Profile payload for create and partial update
///
/// `null` clears a field on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProfileInput {
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub location: Option<Option<String>>,
}

pub fn can_edit(user_id: Uuid, profile: &Profile) -> bool {
    profile.user_id == user_id
}

pub fn can_delete(user_id: Uuid, profile: &Profile) -> bool {
    profile.user_id == user_id
}

pub fn authorize_edit(user_id: Uuid, profile: &Profile) -> Decision {
    Decision::allow_if(can_edit(user_id, profile), "You can only edit your own profile.")
}

pub fn authorize_delete(user_id: Uuid, profile: &Profile) -> Decision {
    Decision::allow_if(
        can_delete(user_id, profile),
        "You can only delete your own profile.",
    )
}

/// Validates the fields present in a payload
pub fn validate_profile_changes(input: &ProfileInput) -> Result<UpdateProfile, FieldErrors> {
    derived_errors(input).into_result(UpdateProfile {
        bio: input.bio.clone(),
        location: input.location.clone(),
    })
}

/// Validates a create payload for the acting user's profile
pub fn validate_new_profile(user_id: Uuid, input: &ProfileInput) -> Result<CreateProfile, FieldErrors> {
    derived_errors(input).into_result(CreateProfile {
        user_id,
        bio: input.bio.clone().flatten(),
        location: input.location.clone().flatten(),
    })
}
