//! Service layer: one use-case facade per entity type.

use std::marker::PhantomData;

use common::EntityId;

use crate::entity::Entity;
use crate::error::DomainError;
use crate::order::Order;
use crate::product::Product;
use crate::repository::{Repository, RepositoryError};
use crate::user::User;

/// Service for users.
pub type UserService<R> = EntityService<User, R>;

/// Service for products.
pub type ProductService<R> = EntityService<Product, R>;

/// Service for orders.
pub type OrderService<R> = EntityService<Order, R>;

/// CRUD facade over a [`Repository`].
///
/// This is the only place persistence port errors are translated into
/// [`DomainError`].
pub struct EntityService<E, R>
where
    E: Entity,
    R: Repository<E>,
{
    repository: R,
    _phantom: PhantomData<E>,
}

impl<E, R> EntityService<E, R>
where
    E: Entity,
    R: Repository<E>,
{
    /// Creates a new service backed by the given repository.
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Returns every stored entity.
    #[tracing::instrument(skip(self), fields(entity_type = E::entity_type()))]
    pub async fn find_all(&self) -> Result<Vec<E>, DomainError> {
        record_operation::<E>("find_all");
        self.repository.list().await.map_err(Self::translate)
    }

    /// Returns the entity with `id`, or `NotFound`.
    #[tracing::instrument(skip(self), fields(entity_type = E::entity_type()))]
    pub async fn find_by_id(&self, id: EntityId) -> Result<E, DomainError> {
        record_operation::<E>("find_by_id");
        self.repository
            .get(id)
            .await
            .map_err(Self::translate)?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Stores a new entity and returns it with its assigned id.
    #[tracing::instrument(skip(self, entity), fields(entity_type = E::entity_type()))]
    pub async fn insert(&self, entity: E) -> Result<E, DomainError> {
        record_operation::<E>("insert");
        let created = self
            .repository
            .create(entity)
            .await
            .map_err(Self::translate)?;
        tracing::info!(id = ?created.id(), "entity created");
        Ok(created)
    }

    /// Applies the updatable fields of `entity` to the stored entity `id`.
    ///
    /// The id inside `entity` is ignored.
    #[tracing::instrument(skip(self, entity), fields(entity_type = E::entity_type()))]
    pub async fn update(&self, id: EntityId, entity: E) -> Result<E, DomainError> {
        record_operation::<E>("update");
        let mut stored = self
            .repository
            .get(id)
            .await
            .map_err(Self::translate)?
            .ok_or_else(|| Self::not_found(id))?;

        stored.merge_from(entity);

        self.repository
            .update(id, stored)
            .await
            .map_err(Self::translate)
    }

    /// Deletes the entity `id`.
    #[tracing::instrument(skip(self), fields(entity_type = E::entity_type()))]
    pub async fn delete(&self, id: EntityId) -> Result<(), DomainError> {
        record_operation::<E>("delete");
        self.repository.delete(id).await.map_err(Self::translate)?;
        tracing::info!(%id, "entity deleted");
        Ok(())
    }

    fn not_found(id: EntityId) -> DomainError {
        let err = DomainError::NotFound {
            entity_type: E::entity_type(),
            id: id.to_string(),
        };
        record_error::<E>(&err);
        err
    }

    fn translate(err: RepositoryError) -> DomainError {
        let err = DomainError::from_repository(E::entity_type(), err);
        match &err {
            DomainError::Transient(msg) | DomainError::Internal(msg) => {
                tracing::error!(error = %msg, kind = err.kind(), "store failure");
            }
            _ => tracing::debug!(error = %err, "store rejected operation"),
        }
        record_error::<E>(&err);
        err
    }
}

fn record_operation<E: Entity>(operation: &'static str) {
    metrics::counter!(
        "service_operations_total",
        "entity" => E::entity_type(),
        "operation" => operation
    )
    .increment(1);
}

fn record_error<E: Entity>(err: &DomainError) {
    metrics::counter!(
        "service_errors_total",
        "entity" => E::entity_type(),
        "kind" => err.kind()
    )
    .increment(1);
}
