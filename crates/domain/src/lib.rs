//! Domain layer for the shop backend.
//!
//! This crate provides:
//! - The `User`, `Product`, `Order` and `OrderItem` entities
//! - The `Repository` persistence port implemented by the store adapters
//! - `EntityService`, the use-case facade the HTTP layer calls into

pub mod entity;
pub mod error;
pub mod order;
pub mod product;
pub mod repository;
pub mod service;
pub mod user;

pub use common::EntityId;
pub use entity::Entity;
pub use error::DomainError;
pub use order::{Order, OrderItem, OrderItemPk, OrderStatus};
pub use product::Product;
pub use repository::{Repository, RepositoryError, ShopRepository};
pub use service::{EntityService, OrderService, ProductService, UserService};
pub use user::User;
