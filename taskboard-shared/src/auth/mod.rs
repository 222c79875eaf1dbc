/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Access/refresh token generation and validation
/// - [`middleware`]: Optional bearer-token middleware and the `Actor` extractor
///
/// Authorization (who may do what to which board, task or comment) is not
/// here; see the `rules` module.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::jwt::issue_token_pair;
/// use taskboard_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let (access, refresh) = issue_token_pair(Uuid::new_v4(), "a-secret-of-at-least-32-bytes!!!")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
