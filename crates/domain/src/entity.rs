//! Core entity trait.

use common::EntityId;
use serde::Serialize;

/// Trait for entities stored behind a [`Repository`](crate::Repository).
///
/// An entity has a server-assigned id once persisted. Before that the id
/// is `None`, and the store assigns one on `create`.
pub trait Entity: Serialize + Clone + Send + Sync + 'static {
    /// Returns the entity type name.
    ///
    /// Used in log fields, metric labels and not-found messages.
    fn entity_type() -> &'static str;

    /// Returns the entity's identifier, if it has been persisted.
    fn id(&self) -> Option<EntityId>;

    /// Sets the identifier. Called by the store on `create`.
    fn assign_id(&mut self, id: EntityId);

    /// Copies the fields an update is allowed to change from `other`.
    ///
    /// The identifier is never copied.
    fn merge_from(&mut self, other: Self);
}
