/// Registration checks
///
/// Runs in a fixed order: field formats, then password confirmation, then
/// email availability. None of these checks write anything; the store's
/// unique index remains the final word on duplicate emails.

use serde::Deserialize;
use validator::Validate;

use super::{FieldErrors, RuleError};
use crate::models::user::User;

/// Registration payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Registration {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Full name must be 1 to 255 characters"))]
    pub fullname: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub repeated_password: String,
}

/// Checks field formats and that both passwords match
pub fn check_registration_fields(registration: &Registration) -> Result<(), RuleError> {
    registration
        .validate()
        .map_err(|e| RuleError::InvalidField(e.into()))?;

    if registration.fullname.trim().is_empty() {
        return Err(FieldErrors::single("fullname", "This field may not be blank.").into());
    }

    if registration.password != registration.repeated_password {
        return Err(FieldErrors::single("repeated_password", "Passwords must match.").into());
    }

    Ok(())
}

/// Fails with `Conflict` when a user already holds the email
pub fn check_email_available(existing: Option<&User>) -> Result<(), RuleError> {
    match existing {
        Some(_) => Err(RuleError::Conflict("Email is already in use.".to_string())),
        None => Ok(()),
    }
}

/// Full registration check against the user currently holding the email
pub fn validate_registration(
    registration: &Registration,
    existing: Option<&User>,
) -> Result<(), RuleError> {
    check_registration_fields(registration)?;
    check_email_available(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn registration(password: &str, repeated: &str) -> Registration {
        Registration {
            fullname: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            password: password.to_string(),
            repeated_password: repeated.to_string(),
        }
    }

    fn existing_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "grace@example.com".to_string(),
            password_hash: String::new(),
            fullname: "Grace".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&registration("longenough", "longenough"), None).is_ok());
    }

    #[test]
    fn test_password_mismatch() {
        match validate_registration(&registration("longenough", "different1"), None) {
            Err(RuleError::InvalidField(errors)) => assert!(errors.contains("repeated_password")),
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_password_mismatch_reported_before_conflict() {
        let user = existing_user();
        let result = validate_registration(&registration("longenough", "different1"), Some(&user));
        assert!(matches!(result, Err(RuleError::InvalidField(_))));
    }

    #[test]
    fn test_email_conflict() {
        let user = existing_user();
        let result = validate_registration(&registration("longenough", "longenough"), Some(&user));
        assert!(matches!(result, Err(RuleError::Conflict(_))));
    }

    #[test]
    fn test_field_formats() {
        let mut reg = registration("short", "short");
        reg.email = "not-an-email".to_string();

        match check_registration_fields(&reg) {
            Err(RuleError::InvalidField(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["email", "password"]);
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_fullname() {
        let mut reg = registration("longenough", "longenough");
        reg.fullname = "   ".to_string();

        match check_registration_fields(&reg) {
            Err(RuleError::InvalidField(errors)) => assert!(errors.contains("fullname")),
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }
}
