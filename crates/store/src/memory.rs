//! In-memory store adapter.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::EntityId;
use domain::repository::Result;
use domain::{Entity, Order, OrderItem, OrderStatus, Product, Repository, RepositoryError, User};
use tokio::sync::RwLock;

/// In-memory store implementation.
///
/// Rows are kept normalized the way the PostgreSQL schema keeps them:
/// orders point at their client by id and line items are keyed by
/// `(order, product)`. Orders are rebuilt from those rows on every read,
/// so a renamed user or repriced product shows up in the orders that
/// reference them.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<EntityId, User>,
    products: BTreeMap<EntityId, Product>,
    orders: BTreeMap<EntityId, OrderRow>,
    order_items: BTreeMap<(EntityId, EntityId), OrderItemRow>,
    last_user_id: i64,
    last_product_id: i64,
    last_order_id: i64,
}

struct OrderRow {
    moment: DateTime<Utc>,
    order_status: OrderStatus,
    client_id: EntityId,
}

struct OrderItemRow {
    quantity: u32,
    price: f64,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored order lines across all orders.
    pub async fn order_item_count(&self) -> usize {
        self.tables.read().await.order_items.len()
    }

    /// Removes every row and resets the id sequences.
    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }
}

impl Tables {
    fn next_id(counter: &mut i64) -> EntityId {
        *counter += 1;
        EntityId::new(*counter)
    }

    fn hydrate_order(&self, id: EntityId) -> Result<Option<Order>> {
        let Some(row) = self.orders.get(&id) else {
            return Ok(None);
        };
        let client = self.users.get(&row.client_id).cloned().ok_or_else(|| {
            RepositoryError::Backend(format!(
                "order {id} references missing user {}",
                row.client_id
            ))
        })?;

        let mut order = Order::new(row.moment, row.order_status, client);
        order.assign_id(id);

        let lines = (id, EntityId::new(i64::MIN))..=(id, EntityId::new(i64::MAX));
        for ((_, product_id), line) in self.order_items.range(lines) {
            let product = self.products.get(product_id).cloned().ok_or_else(|| {
                RepositoryError::Backend(format!(
                    "order {id} references missing product {product_id}"
                ))
            })?;
            order.add_item(OrderItem::new(id, product, line.quantity, line.price));
        }

        Ok(Some(order))
    }

    fn stored_order(&self, id: EntityId) -> Result<Order> {
        self.hydrate_order(id)?.ok_or(RepositoryError::NotFound(id))
    }

    /// Validates the references of `order` and writes its rows under `id`.
    fn write_order(&mut self, id: EntityId, order: &Order) -> Result<()> {
        let client_id = order.client.id.ok_or_else(|| {
            RepositoryError::IntegrityViolation("order client has no id".to_string())
        })?;
        if !self.users.contains_key(&client_id) {
            tracing::debug!(
                order_id = %id,
                client_id = %client_id,
                "rejected order for unknown client"
            );
            return Err(RepositoryError::IntegrityViolation(format!(
                "order client {client_id} does not exist"
            )));
        }

        let mut lines = Vec::with_capacity(order.item_count());
        for item in order.items() {
            let product_id = item.product().and_then(|p| p.id).ok_or_else(|| {
                RepositoryError::IntegrityViolation("order item has no product id".to_string())
            })?;
            if !self.products.contains_key(&product_id) {
                tracing::debug!(
                    order_id = %id,
                    product_id = %product_id,
                    "rejected order line for unknown product"
                );
                return Err(RepositoryError::IntegrityViolation(format!(
                    "order item product {product_id} does not exist"
                )));
            }
            if lines.iter().any(|(existing, _)| *existing == product_id) {
                return Err(RepositoryError::IntegrityViolation(format!(
                    "order {id} has more than one line for product {product_id}"
                )));
            }
            lines.push((
                product_id,
                OrderItemRow {
                    quantity: item.quantity(),
                    price: item.price(),
                },
            ));
        }

        self.remove_order_items(id);
        self.orders.insert(
            id,
            OrderRow {
                moment: order.moment,
                order_status: order.order_status,
                client_id,
            },
        );
        for (product_id, line) in lines {
            self.order_items.insert((id, product_id), line);
        }
        Ok(())
    }

    fn remove_order_items(&mut self, order_id: EntityId) {
        self.order_items.retain(|(owner, _), _| *owner != order_id);
    }
}

#[async_trait]
impl Repository<User> for InMemoryStore {
    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn get(&self, id: EntityId) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create(&self, mut entity: User) -> Result<User> {
        let mut tables = self.tables.write().await;
        let id = Tables::next_id(&mut tables.last_user_id);
        entity.assign_id(id);
        tables.users.insert(id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: EntityId, mut entity: User) -> Result<User> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .users
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound(id))?;
        entity.assign_id(id);
        *slot = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, id: EntityId) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Err(RepositoryError::NotFound(id));
        }
        if let Some(order_id) = tables
            .orders
            .iter()
            .find(|(_, row)| row.client_id == id)
            .map(|(order_id, _)| *order_id)
        {
            tracing::debug!(
                user_id = %id,
                order_id = %order_id,
                "user delete blocked by order"
            );
            return Err(RepositoryError::IntegrityViolation(format!(
                "user {id} is the client of order {order_id}"
            )));
        }
        tables.users.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl Repository<Product> for InMemoryStore {
    async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.tables.read().await.products.values().cloned().collect())
    }

    async fn get(&self, id: EntityId) -> Result<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn create(&self, mut entity: Product) -> Result<Product> {
        let mut tables = self.tables.write().await;
        let id = Tables::next_id(&mut tables.last_product_id);
        entity.assign_id(id);
        tables.products.insert(id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: EntityId, mut entity: Product) -> Result<Product> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .products
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound(id))?;
        entity.assign_id(id);
        *slot = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, id: EntityId) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&id) {
            return Err(RepositoryError::NotFound(id));
        }
        if let Some((order_id, _)) = tables
            .order_items
            .keys()
            .find(|(_, product_id)| *product_id == id)
        {
            tracing::debug!(
                product_id = %id,
                order_id = %order_id,
                "product delete blocked by order line"
            );
            return Err(RepositoryError::IntegrityViolation(format!(
                "product {id} is referenced by order {order_id}"
            )));
        }
        tables.products.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl Repository<Order> for InMemoryStore {
    async fn list(&self) -> Result<Vec<Order>> {
        let tables = self.tables.read().await;
        tables
            .orders
            .keys()
            .map(|id| tables.stored_order(*id))
            .collect()
    }

    async fn get(&self, id: EntityId) -> Result<Option<Order>> {
        self.tables.read().await.hydrate_order(id)
    }

    async fn create(&self, entity: Order) -> Result<Order> {
        let mut tables = self.tables.write().await;
        let id = EntityId::new(tables.last_order_id + 1);
        tables.write_order(id, &entity)?;
        tables.last_order_id = id.as_i64();
        tables.stored_order(id)
    }

    async fn update(&self, id: EntityId, entity: Order) -> Result<Order> {
        let mut tables = self.tables.write().await;
        if !tables.orders.contains_key(&id) {
            return Err(RepositoryError::NotFound(id));
        }
        tables.write_order(id, &entity)?;
        tables.stored_order(id)
    }

    async fn delete(&self, id: EntityId) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.orders.remove(&id).is_none() {
            return Err(RepositoryError::NotFound(id));
        }
        tables.remove_order_items(id);
        Ok(())
    }
}
