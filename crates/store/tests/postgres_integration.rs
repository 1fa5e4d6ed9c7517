//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency and
//! truncate the tables before each test, so they run serially.
//!
//! ```bash
//! cargo test -p store --test postgres_integration
//! ```

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use common::EntityId;
use domain::{Order, OrderStatus, Product, Repository, RepositoryError, User};
use serial_test::serial;
use sqlx::PgPool;
use store::PostgresStore;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresStore::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and empty tables
async fn get_test_store() -> PostgresStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE tb_order_item, tb_order, tb_product, tb_user RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();

    PostgresStore::new(pool)
}

async fn create_user(store: &PostgresStore, name: &str) -> User {
    Repository::<User>::create(store, User::new(name, "m@x", "988888888", "123456"))
        .await
        .unwrap()
}

async fn create_product(store: &PostgresStore, name: &str, price: f64) -> Product {
    Repository::<Product>::create(store, Product::new(name, "desc", price, ""))
        .await
        .unwrap()
}

#[tokio::test]
#[serial]
async fn user_crud_round_trip() {
    let store = get_test_store().await;

    let created = create_user(&store, "Alex").await;
    assert_eq!(created.id, Some(EntityId::new(1)));

    let loaded = Repository::<User>::get(&store, EntityId::new(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded, created);

    let mut changed = loaded.clone();
    changed.name = "Alexa".to_string();
    Repository::<User>::update(&store, EntityId::new(1), changed)
        .await
        .unwrap();

    let all = Repository::<User>::list(&store).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Alexa");

    Repository::<User>::delete(&store, EntityId::new(1))
        .await
        .unwrap();
    assert!(matches!(
        Repository::<User>::delete(&store, EntityId::new(1)).await,
        Err(RepositoryError::NotFound(_))
    ));
}

#[tokio::test]
#[serial]
async fn update_missing_user_is_not_found() {
    let store = get_test_store().await;
    let result = Repository::<User>::update(&store, EntityId::new(5), User::default()).await;
    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn order_persists_composite_key_items() {
    let store = get_test_store().await;
    let client = create_user(&store, "Maria").await;
    let book = create_product(&store, "The Lord of the Rings", 90.5).await;
    let laptop = create_product(&store, "Macbook Pro", 1250.0).await;

    let moment = Utc.with_ymd_and_hms(2019, 6, 20, 19, 53, 7).unwrap();
    let mut order = Order::new(moment, OrderStatus::Paid, client);
    order.add_product(&book, 2);
    order.add_product(&laptop, 1);

    let created = Repository::<Order>::create(&store, order).await.unwrap();
    let id = created.id.unwrap();
    assert_eq!(created.item_count(), 2);
    assert_eq!(created.total(), 1431.0);

    let loaded = Repository::<Order>::get(&store, id).await.unwrap().unwrap();
    assert_eq!(loaded.moment, moment);
    assert_eq!(loaded.order_status, OrderStatus::Paid);
    assert_eq!(loaded.client.name, "Maria");
    assert!(loaded.items().all(|item| item.order() == Some(id)));

    let listed = Repository::<Order>::list(&store).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].item_count(), 2);
}

#[tokio::test]
#[serial]
async fn foreign_keys_block_deletes_and_cascade_items() {
    let store = get_test_store().await;
    let client = create_user(&store, "Maria").await;
    let book = create_product(&store, "Book", 10.0).await;

    let mut order = Order::new(Utc::now(), OrderStatus::WaitingPayment, client.clone());
    order.add_product(&book, 1);
    let order_id = Repository::<Order>::create(&store, order)
        .await
        .unwrap()
        .id
        .unwrap();

    assert!(matches!(
        Repository::<User>::delete(&store, client.id.unwrap()).await,
        Err(RepositoryError::IntegrityViolation(_))
    ));
    assert!(matches!(
        Repository::<Product>::delete(&store, book.id.unwrap()).await,
        Err(RepositoryError::IntegrityViolation(_))
    ));

    Repository::<Order>::delete(&store, order_id).await.unwrap();

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tb_order_item")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(remaining, 0);
    assert!(Repository::<User>::delete(&store, client.id.unwrap()).await.is_ok());
}

#[tokio::test]
#[serial]
async fn order_for_unknown_client_is_integrity_violation() {
    let store = get_test_store().await;
    let mut ghost = User::new("Ghost", "", "", "");
    ghost.id = Some(EntityId::new(404));

    let result =
        Repository::<Order>::create(&store, Order::new(Utc::now(), OrderStatus::Paid, ghost)).await;
    assert!(matches!(result, Err(RepositoryError::IntegrityViolation(_))));
}
