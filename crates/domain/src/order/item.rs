//! Order line items and their composite key.

use std::hash::{Hash, Hasher};

use common::EntityId;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::product::Product;

/// Identity of an [`OrderItem`]: the owning order plus the product.
///
/// Either half may be absent on an item that has not been attached yet.
/// Absent only equals absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OrderItemPk {
    pub order: Option<EntityId>,
    pub product: Option<EntityId>,
}

impl OrderItemPk {
    /// Creates a fully populated key.
    pub fn new(order: EntityId, product: EntityId) -> Self {
        Self {
            order: Some(order),
            product: Some(product),
        }
    }
}

/// A product line inside an order.
///
/// Equality and hashing only look at [`OrderItemPk`]; quantity and price
/// do not take part. The order back-reference is kept as an id and is
/// left out of the JSON form.
#[derive(Debug, Clone, Default)]
pub struct OrderItem {
    order: Option<EntityId>,
    product: Option<Product>,
    quantity: u32,
    price: f64,
}

impl OrderItem {
    /// Creates an item. Quantity and price are taken as given.
    pub fn new(order: EntityId, product: Product, quantity: u32, price: f64) -> Self {
        Self {
            order: Some(order),
            product: Some(product),
            quantity,
            price,
        }
    }

    /// Returns the composite key.
    pub fn key(&self) -> OrderItemPk {
        OrderItemPk {
            order: self.order,
            product: self.product.as_ref().and_then(|p| p.id),
        }
    }

    /// Returns `price * quantity`.
    pub fn sub_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Returns the id of the owning order.
    pub fn order(&self) -> Option<EntityId> {
        self.order
    }

    pub fn set_order(&mut self, order: EntityId) {
        self.order = Some(order);
    }

    pub(crate) fn bind_order(&mut self, order: Option<EntityId>) {
        self.order = order;
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn set_product(&mut self, product: Product) {
        self.product = Some(product);
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn set_price(&mut self, price: f64) {
        self.price = price;
    }
}

impl PartialEq for OrderItem {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OrderItem {}

impl Hash for OrderItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Serialize for OrderItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("OrderItem", 4)?;
        state.serialize_field("product", &self.product)?;
        state.serialize_field("quantity", &self.quantity)?;
        state.serialize_field("price", &self.price)?;
        state.serialize_field("subTotal", &self.sub_total())?;
        state.end()
    }
}
