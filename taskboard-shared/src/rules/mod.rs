/// Authorization and validation rules
///
/// Every decision about who may view, change or delete a board, task or
/// comment is made here, by plain functions over already-loaded entities.
/// Nothing in this module touches the store; the `service` module loads what
/// the rules need and acts on their verdicts.
///
/// # Modules
///
/// - [`membership`]: owner-or-member resolution shared by every other rule
/// - [`board`]: board view/edit/delete rights and board field checks
/// - [`task`]: task field validation, cross-reference checks and rights
/// - [`comment`]: comment rights and content checks
/// - [`account`]: registration checks
/// - [`profile`]: profile ownership and field checks
///
/// # Example
///
/// ```
/// use taskboard_shared::rules::{board, Decision};
/// # use taskboard_shared::models::board::Board;
/// # use chrono::Utc;
/// # use uuid::Uuid;
/// # let owner = Uuid::new_v4();
/// # let ops = Board {
/// #     id: Uuid::new_v4(), title: "Ops".into(), owner_id: owner,
/// #     member_ids: vec![], created_at: Utc::now(), updated_at: Utc::now(),
/// # };
/// let stranger = Uuid::new_v4();
///
/// assert!(board::can_delete(owner, &ops));
/// assert!(matches!(board::authorize(stranger, &ops, board::BoardAction::View), Decision::Deny(_)));
/// ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{auth::password::PasswordError, store::StoreError};

pub mod account;
pub mod board;
pub mod comment;
pub mod membership;
pub mod profile;
pub mod task;

/// Kind of entity a lookup failed to find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Profile,
    Board,
    Task,
    Comment,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::User => "User",
            Entity::Profile => "Profile",
            Entity::Board => "Board",
            Entity::Task => "Task",
            Entity::Comment => "Comment",
        };
        f.write_str(name)
    }
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Field-level validation failures, in the order the fields were checked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for a single failing field
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks whether any failure concerns `field`
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(value)` when no failures were recorded
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.iter().map(|e| e.field.as_str()).collect();
        write!(f, "{}", fields.join(", "))
    }
}

/// Errors produced by rule checks and the services built on them
///
/// Each variant is a distinct kind that the web layer maps to its own
/// response class.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("{0} not found")]
    NotFound(Entity),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid fields: {0}")]
    InvalidField(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Same value for an unknown email and a wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<FieldErrors> for RuleError {
    fn from(errors: FieldErrors) -> Self {
        RuleError::InvalidField(errors)
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

impl Decision {
    /// Allows when `allowed` holds, otherwise denies with `reason`
    pub fn allow_if(allowed: bool, reason: &'static str) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny(reason)
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Converts a denial into `RuleError::Forbidden`
    pub fn into_result(self) -> Result<(), RuleError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(RuleError::Forbidden(reason.to_string())),
        }
    }
}

/// Returns the acting user, or `Unauthenticated` for anonymous requests
pub fn require_actor(actor: Option<Uuid>) -> Result<Uuid, RuleError> {
    actor.ok_or(RuleError::Unauthenticated)
}

/// Deserializes a nullable field so that an explicit `null` (`Some(None)`)
/// differs from an absent one (`None`, via `#[serde(default)]`)
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Records a failure for `field` when `value` is empty or whitespace only
pub(crate) fn check_not_blank(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "This field may not be blank.");
    }
}

/// Runs the derived `validator` checks of a payload
///
/// Returns the failures as `FieldErrors` (empty when the payload passes), so
/// callers can append their own checks in a fixed order.
pub(crate) fn derived_errors<T: Validate>(input: &T) -> FieldErrors {
    match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => errors.into(),
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut by_field: Vec<(String, String)> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    (
                        field.to_string(),
                        error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "Validation failed".to_string()),
                    )
                })
            })
            .collect();
        by_field.sort();

        let mut field_errors = FieldErrors::new();
        for (field, message) in by_field {
            field_errors.add(&field, message);
        }
        field_errors
    }
}
