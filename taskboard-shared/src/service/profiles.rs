/// Profile operations
///
/// Profiles are addressed by the ID of the user they belong to. Update and
/// delete resolve the profile first, so a missing profile is `NotFound`
/// before any ownership check.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::{
        profile::Profile,
        user::{User, UserSummary},
    },
    rules::{
        profile::{
            authorize_delete, authorize_edit, validate_new_profile, validate_profile_changes,
            ProfileInput,
        },
        require_actor, Entity, RuleError,
    },
    store::{EntityStore, StoreError},
};

/// Profile with its user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    /// ID of the user the profile belongs to
    pub id: Uuid,
    pub user: UserSummary,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileView {
    fn new(profile: Profile, user: &User) -> Self {
        Self {
            id: profile.user_id,
            user: UserSummary::from(user),
            bio: profile.bio,
            location: profile.location,
            updated_at: profile.updated_at,
        }
    }
}

async fn load_profile(store: &dyn EntityStore, user_id: Uuid) -> Result<Profile, RuleError> {
    store
        .get_profile(user_id)
        .await?
        .ok_or(RuleError::NotFound(Entity::Profile))
}

async fn view(store: &dyn EntityStore, profile: Profile) -> Result<ProfileView, RuleError> {
    let user = store
        .get_user(profile.user_id)
        .await?
        .ok_or(RuleError::NotFound(Entity::User))?;
    Ok(ProfileView::new(profile, &user))
}

/// Lists every profile to any authenticated user
pub async fn list_profiles(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
) -> Result<Vec<ProfileView>, RuleError> {
    require_actor(actor)?;

    let profiles = store.list_profiles().await?;
    let user_ids: Vec<Uuid> = profiles.iter().map(|p| p.user_id).collect();
    let users = if user_ids.is_empty() {
        Vec::new()
    } else {
        store.get_users(&user_ids).await?
    };

    Ok(profiles
        .into_iter()
        .filter_map(|p| {
            let user = users.iter().find(|u| u.id == p.user_id)?;
            Some(ProfileView::new(p, user))
        })
        .collect())
}

/// Creates the acting user's profile
///
/// # Errors
///
/// - `Unauthenticated` without an actor
/// - `InvalidField("location")` for a location over 100 characters
/// - `Conflict` if the actor already has a profile
pub async fn create_profile(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    input: ProfileInput,
) -> Result<ProfileView, RuleError> {
    let actor = require_actor(actor)?;
    let data = validate_new_profile(actor, &input)?;

    if store.get_profile(actor).await?.is_some() {
        return Err(RuleError::Conflict("Profile already exists.".to_string()));
    }

    let profile = store
        .create_profile(data)
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => RuleError::Conflict("Profile already exists.".to_string()),
            other => RuleError::Store(other),
        })?;

    tracing::info!(user_id = %actor, "Profile created");
    view(store, profile).await
}

pub async fn get_profile(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    user_id: Uuid,
) -> Result<ProfileView, RuleError> {
    require_actor(actor)?;
    let profile = load_profile(store, user_id).await?;
    view(store, profile).await
}

/// Partial update of the actor's own profile; `null` clears a field
pub async fn update_profile(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    user_id: Uuid,
    input: ProfileInput,
) -> Result<ProfileView, RuleError> {
    let actor = require_actor(actor)?;
    let profile = load_profile(store, user_id).await?;

    if let Err(e) = authorize_edit(actor, &profile).into_result() {
        tracing::warn!(profile_user_id = %user_id, user_id = %actor, "Profile update denied");
        return Err(e);
    }

    let changes = validate_profile_changes(&input)?;
    let profile = store
        .update_profile(user_id, changes)
        .await?
        .ok_or(RuleError::NotFound(Entity::Profile))?;

    tracing::info!(user_id = %actor, "Profile updated");
    view(store, profile).await
}

pub async fn delete_profile(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    user_id: Uuid,
) -> Result<(), RuleError> {
    let actor = require_actor(actor)?;
    let profile = load_profile(store, user_id).await?;

    if let Err(e) = authorize_delete(actor, &profile).into_result() {
        tracing::warn!(profile_user_id = %user_id, user_id = %actor, "Profile delete denied");
        return Err(e);
    }

    store.delete_profile(user_id).await?;

    tracing::info!(user_id = %actor, "Profile deleted");
    Ok(())
}
