/// API route handlers
///
/// Handlers are thin: they extract the actor, path and payload, call the
/// matching operation in `taskboard_shared::service`, and map the result.
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login and token refresh
/// - `boards`: Boards and email lookup
/// - `tasks`: Tasks and personal task listings
/// - `comments`: Comments on a task
/// - `profiles`: Per-user profiles

pub mod auth;
pub mod boards;
pub mod comments;
pub mod health;
pub mod profiles;
pub mod tasks;
