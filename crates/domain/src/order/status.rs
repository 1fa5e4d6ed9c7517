//! Order status codes.

use serde::{Deserialize, Serialize};

/// Where an order is in its lifecycle.
///
/// Persisted as its integer code, serialized by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    WaitingPayment,
    Paid,
    Shipped,
    Delivered,
    Canceled,
}

impl OrderStatus {
    /// Returns the persisted integer code.
    pub fn code(&self) -> i32 {
        match self {
            OrderStatus::WaitingPayment => 1,
            OrderStatus::Paid => 2,
            OrderStatus::Shipped => 3,
            OrderStatus::Delivered => 4,
            OrderStatus::Canceled => 5,
        }
    }

    /// Looks up a status by its persisted code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(OrderStatus::WaitingPayment),
            2 => Some(OrderStatus::Paid),
            3 => Some(OrderStatus::Shipped),
            4 => Some(OrderStatus::Delivered),
            5 => Some(OrderStatus::Canceled),
            _ => None,
        }
    }

    /// Returns the status name as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::WaitingPayment => "WAITING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
