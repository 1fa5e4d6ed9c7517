//! Shared types for the shop backend.

pub mod types;

pub use types::EntityId;
