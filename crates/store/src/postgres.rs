//! PostgreSQL store adapter.

use std::collections::BTreeMap;

use async_trait::async_trait;
use common::EntityId;
use domain::repository::Result;
use domain::{Entity, Order, OrderItem, OrderStatus, Product, Repository, RepositoryError, User};
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::error::map_sqlx_error;

const ORDER_SELECT: &str = r#"
    SELECT o.id, o.moment, o.order_status,
           u.id AS client_id, u.name AS client_name, u.email AS client_email,
           u.phone AS client_phone, u.password AS client_password
    FROM tb_order o
    JOIN tb_user u ON u.id = o.client_id
"#;

const ORDER_ITEM_SELECT: &str = r#"
    SELECT oi.order_id, oi.quantity, oi.price AS item_price,
           p.id AS product_id, p.name, p.description, p.price, p.img_url
    FROM tb_order_item oi
    JOIN tb_product p ON p.id = oi.product_id
"#;

/// PostgreSQL-backed store implementation.
///
/// Foreign keys do the referential checks: a user that owns orders or a
/// product on an order line cannot be deleted, and deleting an order
/// cascades to its lines.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_user(row: &PgRow) -> sqlx::Result<User> {
        Ok(User {
            id: Some(EntityId::new(row.try_get("id")?)),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            password: row.try_get("password")?,
        })
    }

    fn row_to_product(row: &PgRow) -> sqlx::Result<Product> {
        Ok(Product {
            id: Some(EntityId::new(row.try_get("id")?)),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            img_url: row.try_get("img_url")?,
        })
    }

    fn row_to_order(row: &PgRow) -> Result<Order> {
        let code: i32 = row.try_get("order_status").map_err(map_sqlx_error)?;
        let order_status = OrderStatus::from_code(code)
            .ok_or_else(|| RepositoryError::Backend(format!("unknown order status code {code}")))?;

        let client = User {
            id: Some(EntityId::new(
                row.try_get("client_id").map_err(map_sqlx_error)?,
            )),
            name: row.try_get("client_name").map_err(map_sqlx_error)?,
            email: row.try_get("client_email").map_err(map_sqlx_error)?,
            phone: row.try_get("client_phone").map_err(map_sqlx_error)?,
            password: row.try_get("client_password").map_err(map_sqlx_error)?,
        };

        let mut order = Order::new(
            row.try_get("moment").map_err(map_sqlx_error)?,
            order_status,
            client,
        );
        order.assign_id(EntityId::new(row.try_get("id").map_err(map_sqlx_error)?));
        Ok(order)
    }

    fn row_to_order_item(row: &PgRow) -> Result<OrderItem> {
        let order_id = EntityId::new(row.try_get("order_id").map_err(map_sqlx_error)?);
        let quantity: i64 = row.try_get("quantity").map_err(map_sqlx_error)?;
        let quantity = u32::try_from(quantity).map_err(|_| {
            RepositoryError::Backend(format!("order {order_id} has invalid quantity {quantity}"))
        })?;

        let product = Product {
            id: Some(EntityId::new(
                row.try_get("product_id").map_err(map_sqlx_error)?,
            )),
            name: row.try_get("name").map_err(map_sqlx_error)?,
            description: row.try_get("description").map_err(map_sqlx_error)?,
            price: row.try_get("price").map_err(map_sqlx_error)?,
            img_url: row.try_get("img_url").map_err(map_sqlx_error)?,
        };

        Ok(OrderItem::new(
            order_id,
            product,
            quantity,
            row.try_get("item_price").map_err(map_sqlx_error)?,
        ))
    }

    /// Replaces the order lines of `order_id` with those of `order`.
    async fn write_order_items(
        tx: &mut Transaction<'_, Postgres>,
        order_id: EntityId,
        order: &Order,
    ) -> Result<()> {
        sqlx::query("DELETE FROM tb_order_item WHERE order_id = $1")
            .bind(order_id.as_i64())
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;

        for item in order.items() {
            let product_id = item.product().and_then(|p| p.id).ok_or_else(|| {
                RepositoryError::IntegrityViolation("order item has no product id".to_string())
            })?;

            sqlx::query(
                r#"
                INSERT INTO tb_order_item (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(order_id.as_i64())
            .bind(product_id.as_i64())
            .bind(i64::from(item.quantity()))
            .bind(item.price())
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        Ok(())
    }

    fn client_id(order: &Order) -> Result<EntityId> {
        order
            .client
            .id
            .ok_or_else(|| RepositoryError::IntegrityViolation("order client has no id".to_string()))
    }

    async fn load_order(&self, id: EntityId) -> Result<Option<Order>> {
        let row = sqlx::query(&format!("{ORDER_SELECT} WHERE o.id = $1"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut order = Self::row_to_order(&row)?;

        let item_rows = sqlx::query(&format!(
            "{ORDER_ITEM_SELECT} WHERE oi.order_id = $1 ORDER BY p.id"
        ))
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        for row in &item_rows {
            order.add_item(Self::row_to_order_item(row)?);
        }

        Ok(Some(order))
    }

    async fn stored_order(&self, id: EntityId) -> Result<Order> {
        self.load_order(id)
            .await?
            .ok_or(RepositoryError::NotFound(id))
    }
}

#[async_trait]
impl Repository<User> for PostgresStore {
    async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT id, name, email, phone, password FROM tb_user ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| Self::row_to_user(row).map_err(map_sqlx_error))
            .collect()
    }

    async fn get(&self, id: EntityId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, email, phone, password FROM tb_user WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref()
            .map(Self::row_to_user)
            .transpose()
            .map_err(map_sqlx_error)
    }

    async fn create(&self, mut entity: User) -> Result<User> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO tb_user (name, email, phone, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&entity.name)
        .bind(&entity.email)
        .bind(&entity.phone)
        .bind(&entity.password)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        entity.assign_id(EntityId::new(id));
        Ok(entity)
    }

    async fn update(&self, id: EntityId, mut entity: User) -> Result<User> {
        let result = sqlx::query(
            r#"
            UPDATE tb_user SET name = $2, email = $3, phone = $4, password = $5
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(&entity.name)
        .bind(&entity.email)
        .bind(&entity.phone)
        .bind(&entity.password)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        entity.assign_id(id);
        Ok(entity)
    }

    async fn delete(&self, id: EntityId) -> Result<()> {
        let result = sqlx::query("DELETE FROM tb_user WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository<Product> for PostgresStore {
    async fn list(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            "SELECT id, name, description, price, img_url FROM tb_product ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| Self::row_to_product(row).map_err(map_sqlx_error))
            .collect()
    }

    async fn get(&self, id: EntityId) -> Result<Option<Product>> {
        let row = sqlx::query(
            "SELECT id, name, description, price, img_url FROM tb_product WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref()
            .map(Self::row_to_product)
            .transpose()
            .map_err(map_sqlx_error)
    }

    async fn create(&self, mut entity: Product) -> Result<Product> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO tb_product (name, description, price, img_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&entity.name)
        .bind(&entity.description)
        .bind(entity.price)
        .bind(&entity.img_url)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        entity.assign_id(EntityId::new(id));
        Ok(entity)
    }

    async fn update(&self, id: EntityId, mut entity: Product) -> Result<Product> {
        let result = sqlx::query(
            r#"
            UPDATE tb_product SET name = $2, description = $3, price = $4, img_url = $5
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(&entity.name)
        .bind(&entity.description)
        .bind(entity.price)
        .bind(&entity.img_url)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        entity.assign_id(id);
        Ok(entity)
    }

    async fn delete(&self, id: EntityId) -> Result<()> {
        let result = sqlx::query("DELETE FROM tb_product WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository<Order> for PostgresStore {
    async fn list(&self) -> Result<Vec<Order>> {
        let order_rows = sqlx::query(&format!("{ORDER_SELECT} ORDER BY o.id"))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let mut orders = BTreeMap::new();
        for row in &order_rows {
            let order = Self::row_to_order(row)?;
            if let Some(id) = order.id {
                orders.insert(id, order);
            }
        }

        let item_rows = sqlx::query(&format!(
            "{ORDER_ITEM_SELECT} ORDER BY oi.order_id, p.id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        for row in &item_rows {
            let item = Self::row_to_order_item(row)?;
            if let Some(order) = item.order().and_then(|id| orders.get_mut(&id)) {
                order.add_item(item);
            }
        }

        Ok(orders.into_values().collect())
    }

    async fn get(&self, id: EntityId) -> Result<Option<Order>> {
        self.load_order(id).await
    }

    async fn create(&self, entity: Order) -> Result<Order> {
        let client_id = Self::client_id(&entity)?;
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO tb_order (moment, order_status, client_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(entity.moment)
        .bind(entity.order_status.code())
        .bind(client_id.as_i64())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;
        let id = EntityId::new(id);

        Self::write_order_items(&mut tx, id, &entity).await?;
        tx.commit().await.map_err(map_sqlx_error)?;

        self.stored_order(id).await
    }

    async fn update(&self, id: EntityId, entity: Order) -> Result<Order> {
        let client_id = Self::client_id(&entity)?;
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query(
            r#"
            UPDATE tb_order SET moment = $2, order_status = $3, client_id = $4
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(entity.moment)
        .bind(entity.order_status.code())
        .bind(client_id.as_i64())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        Self::write_order_items(&mut tx, id, &entity).await?;
        tx.commit().await.map_err(map_sqlx_error)?;

        self.stored_order(id).await
    }

    async fn delete(&self, id: EntityId) -> Result<()> {
        let result = sqlx::query("DELETE FROM tb_order WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}
