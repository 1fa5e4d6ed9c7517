//! Store adapters implementing the domain `Repository` port.
//!
//! - [`InMemoryStore`] keeps normalized tables behind a lock; the default
//!   for local runs and tests.
//! - [`PostgresStore`] maps the same tables onto PostgreSQL via sqlx.

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::map_sqlx_error;
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
