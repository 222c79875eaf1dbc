/// Request-level operations
///
/// Each function here is one API operation: it resolves the actor, loads what
/// the rules need from the [`EntityStore`], applies the rules in a fixed
/// order, and only then writes. The first failing step ends the operation
/// with its own [`RuleError`] kind.
///
/// # Modules
///
/// - [`accounts`]: registration, credential checks, email lookup
/// - [`boards`]: board listing, detail, create, update, delete
/// - [`tasks`]: task create, view, update, delete and personal listings
/// - [`comments`]: comment listing, create, view, update, delete
/// - [`profiles`]: per-user profile listing, create, view, update, delete

use uuid::Uuid;

use crate::{
    models::{board::Board, task::Task},
    rules::{Entity, RuleError},
    store::EntityStore,
};

pub mod accounts;
pub mod boards;
pub mod comments;
pub mod profiles;
pub mod tasks;

pub(crate) async fn load_board(store: &dyn EntityStore, id: Uuid) -> Result<Board, RuleError> {
    store
        .get_board(id)
        .await?
        .ok_or(RuleError::NotFound(Entity::Board))
}

pub(crate) async fn load_task(store: &dyn EntityStore, id: Uuid) -> Result<Task, RuleError> {
    store
        .get_task(id)
        .await?
        .ok_or(RuleError::NotFound(Entity::Task))
}
