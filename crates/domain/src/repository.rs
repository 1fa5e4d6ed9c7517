//! Persistence port used by the service layer.

use async_trait::async_trait;
use common::EntityId;
use thiserror::Error;

use crate::entity::Entity;
use crate::order::Order;
use crate::product::Product;
use crate::user::User;

/// Errors a store adapter can report.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No row with the given id.
    #[error("Entity not found: {0}")]
    NotFound(EntityId),

    /// A foreign-key style constraint rejected the write.
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    /// The backend could not be reached or timed out.
    #[error("Transient failure: {0}")]
    Transient(String),

    /// Any other backend failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for persistence port operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Core trait for store implementations, one instance per entity type.
///
/// All implementations must be thread-safe (Send + Sync). Returned
/// entities are owned copies; mutating them does not touch the store.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Lists every stored entity in id order.
    async fn list(&self) -> Result<Vec<E>>;

    /// Retrieves one entity. Returns None if the id is unknown.
    async fn get(&self, id: EntityId) -> Result<Option<E>>;

    /// Stores a new entity and returns it with its assigned id.
    ///
    /// Any id already present on `entity` is ignored.
    async fn create(&self, entity: E) -> Result<E>;

    /// Replaces the stored state of `id`.
    ///
    /// Fails with `NotFound` if the id is unknown.
    async fn update(&self, id: EntityId, entity: E) -> Result<E>;

    /// Removes an entity.
    ///
    /// Fails with `NotFound` if the id is unknown and with
    /// `IntegrityViolation` if other entities still reference it.
    async fn delete(&self, id: EntityId) -> Result<()>;
}

/// A backend that stores every entity type of the shop.
///
/// Implemented automatically for any type that provides all three
/// repositories; the HTTP layer is generic over it.
pub trait ShopRepository:
    Repository<User> + Repository<Product> + Repository<Order> + Clone + 'static
{
}

impl<T> ShopRepository for T where
    T: Repository<User> + Repository<Product> + Repository<Order> + Clone + 'static
{
}
