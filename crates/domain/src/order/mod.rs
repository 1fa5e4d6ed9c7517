//! Order aggregate and its line items.

mod aggregate;
mod item;
mod status;

pub use aggregate::Order;
pub use item::{OrderItem, OrderItemPk};
pub use status::OrderStatus;
