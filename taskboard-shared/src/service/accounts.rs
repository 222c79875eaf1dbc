/// Account operations: registration, login and email lookup

use uuid::Uuid;
use validator::ValidateEmail;

use crate::{
    auth::password::{hash_password, verify_against_dummy, verify_password},
    models::user::{CreateUser, User, UserSummary},
    rules::{
        account::{check_email_available, check_registration_fields, Registration},
        require_actor, Entity, FieldErrors, RuleError,
    },
    store::{EntityStore, StoreError},
};

/// Registers a new user
///
/// The password confirmation is checked before the store is consulted, and
/// the email check before anything is written. A duplicate that slips past
/// the pre-check is still reported as `Conflict` by the store.
///
/// # Errors
///
/// - `InvalidField` for malformed fields or mismatched passwords
/// - `Conflict` if the email is already registered
pub async fn register(
    store: &dyn EntityStore,
    registration: Registration,
) -> Result<User, RuleError> {
    check_registration_fields(&registration)?;

    let existing = store.get_user_by_email(&registration.email).await?;
    if let Err(e) = check_email_available(existing.as_ref()) {
        tracing::warn!(email = %registration.email, "Registration rejected: email in use");
        return Err(e);
    }

    let password_hash = hash_password(&registration.password)?;

    let user = store
        .create_user(CreateUser {
            email: registration.email,
            password_hash,
            fullname: registration.fullname,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => RuleError::Conflict("Email is already in use.".to_string()),
            other => RuleError::Store(other),
        })?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok(user)
}

/// Checks an email/password pair
///
/// An unknown email and a wrong password take different paths internally
/// but both end in `InvalidCredentials`.
pub async fn verify_credentials(
    store: &dyn EntityStore,
    email: &str,
    password: &str,
) -> Result<User, RuleError> {
    let Some(user) = store.get_user_by_email(email).await? else {
        verify_against_dummy(password);
        tracing::debug!("Login failed: unknown email");
        return Err(RuleError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login failed: wrong password");
        return Err(RuleError::InvalidCredentials);
    }

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(user)
}

/// Resolves an email to a user, for adding members to a board
///
/// # Errors
///
/// - `Unauthenticated` without an actor
/// - `InvalidField("email")` for a missing or malformed address
/// - `NotFound(User)` if nobody uses the address
pub async fn find_user_by_email(
    store: &dyn EntityStore,
    actor: Option<Uuid>,
    email: Option<&str>,
) -> Result<UserSummary, RuleError> {
    require_actor(actor)?;

    let email = match email.map(str::trim) {
        Some(email) if !email.is_empty() => email,
        _ => return Err(FieldErrors::single("email", "This field is required.").into()),
    };
    if !email.validate_email() {
        return Err(FieldErrors::single("email", "Invalid email format").into());
    }

    store
        .get_user_by_email(email)
        .await?
        .map(|user| UserSummary::from(&user))
        .ok_or(RuleError::NotFound(Entity::User))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn registration(email: &str, password: &str, repeated: &str) -> Registration {
        Registration {
            fullname: "Linus".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            repeated_password: repeated.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let store = MemoryStore::new();
        let user = register(&store, registration("linus@example.com", "password1", "password1"))
            .await
            .unwrap();

        assert_eq!(user.fullname, "Linus");
        assert!(user.password_hash.starts_with("$argon2id$"));

        let logged_in = verify_credentials(&store, "LINUS@example.com", "password1")
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_password_mismatch_writes_nothing() {
        let store = MemoryStore::new();
        let result = register(&store, registration("a@example.com", "password1", "password2")).await;

        assert!(matches!(result, Err(RuleError::InvalidField(_))));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_without_write() {
        let store = MemoryStore::new();
        register(&store, registration("dup@example.com", "password1", "password1"))
            .await
            .unwrap();
        let writes = store.write_count();

        let result = register(&store, registration("Dup@Example.com", "password1", "password1")).await;

        assert!(matches!(result, Err(RuleError::Conflict(_))));
        assert_eq!(store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let store = MemoryStore::new();
        register(&store, registration("known@example.com", "password1", "password1"))
            .await
            .unwrap();

        let unknown = verify_credentials(&store, "nobody@example.com", "password1")
            .await
            .unwrap_err();
        let wrong = verify_credentials(&store, "known@example.com", "wrong-password")
            .await
            .unwrap_err();

        assert!(matches!(unknown, RuleError::InvalidCredentials));
        assert!(matches!(wrong, RuleError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_find_user_by_email() {
        let store = MemoryStore::new();
        let user = store
            .create_user(CreateUser {
                email: "found@example.com".to_string(),
                password_hash: "unused".to_string(),
                fullname: "Found".to_string(),
            })
            .await
            .unwrap();
        let actor = Some(Uuid::new_v4());

        let summary = find_user_by_email(&store, actor, Some("found@example.com"))
            .await
            .unwrap();
        assert_eq!(summary.id, user.id);

        assert!(matches!(
            find_user_by_email(&store, actor, Some("missing@example.com")).await,
            Err(RuleError::NotFound(Entity::User))
        ));
        assert!(matches!(
            find_user_by_email(&store, actor, Some("not-an-email")).await,
            Err(RuleError::InvalidField(_))
        ));
        assert!(matches!(
            find_user_by_email(&store, actor, None).await,
            Err(RuleError::InvalidField(_))
        ));
        assert!(matches!(
            find_user_by_email(&store, None, Some("found@example.com")).await,
            Err(RuleError::Unauthenticated)
        ));
    }
}
