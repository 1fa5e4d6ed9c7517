//! Order aggregate.

use chrono::{DateTime, Utc};
use common::EntityId;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::{OrderItem, OrderStatus};
use crate::entity::Entity;
use crate::product::Product;
use crate::user::User;

/// A customer order with its line items.
///
/// Items form a set keyed by product: an order holds at most one line
/// per product.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Option<EntityId>,
    pub moment: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub client: User,
    items: Vec<OrderItem>,
}

impl Order {
    /// Creates an order with no items.
    pub fn new(moment: DateTime<Utc>, order_status: OrderStatus, client: User) -> Self {
        Self {
            id: None,
            moment,
            order_status,
            client,
            items: Vec::new(),
        }
    }

    /// Returns an iterator over the line items.
    pub fn items(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.iter()
    }

    /// Returns the number of line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Adds a line item, re-pointing its order reference at this order.
    ///
    /// An unsaved order clears the reference, so lines are compared by
    /// product alone. Returns false and leaves the order untouched if an
    /// item for the same product is already present.
    pub fn add_item(&mut self, mut item: OrderItem) -> bool {
        item.bind_order(self.id);
        if self.items.iter().any(|existing| existing.key() == item.key()) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Adds a line for `product`, capturing its current price.
    pub fn add_product(&mut self, product: &Product, quantity: u32) -> bool {
        let mut item = OrderItem::default();
        item.set_price(product.price);
        item.set_product(product.clone());
        item.set_quantity(quantity);
        self.add_item(item)
    }

    /// Sum of every line's subtotal.
    pub fn total(&self) -> f64 {
        self.items.iter().map(OrderItem::sub_total).sum()
    }
}

impl Entity for Order {
    fn entity_type() -> &'static str {
        "Order"
    }

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
        for item in &mut self.items {
            item.set_order(id);
        }
    }

    fn merge_from(&mut self, other: Self) {
        self.order_status = other.order_status;
    }
}

impl Serialize for Order {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Order", 6)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("moment", &self.moment)?;
        state.serialize_field("orderStatus", &self.order_status)?;
        state.serialize_field("client", &self.client)?;
        state.serialize_field("items", &self.items)?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn client() -> User {
        let mut user = User::new("Maria Brown", "maria@gmail.com", "988888888", "123456");
        user.assign_id(EntityId::new(1));
        user
    }

    fn product(id: i64, price: f64) -> Product {
        let mut p = Product::new(format!("Product {id}"), "", price, "");
        p.assign_id(EntityId::new(id));
        p
    }

    fn moment() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 6, 20, 19, 53, 7).unwrap()
    }

    #[test]
    fn rejects_second_line_for_same_product() {
        let mut order = Order::new(moment(), OrderStatus::Paid, client());
        assert!(order.add_product(&product(1, 90.5), 2));
        assert!(!order.add_product(&product(1, 90.5), 5));
        assert!(order.add_product(&product(3, 1250.0), 1));

        assert_eq!(order.item_count(), 2);
        assert_eq!(order.items().next().unwrap().quantity(), 2);
    }

    #[test]
    fn foreign_order_reference_does_not_bypass_uniqueness() {
        let book = product(1, 10.0);
        let mut order = Order::new(moment(), OrderStatus::Paid, client());
        assert!(order.add_item(OrderItem::new(EntityId::new(9), book.clone(), 1, 10.0)));
        assert_eq!(order.items().next().unwrap().order(), None);
        assert!(!order.add_product(&book, 5));

        order.assign_id(EntityId::new(3));
        assert_eq!(order.item_count(), 1);
        assert_eq!(order.total(), 10.0);
    }

    #[test]
    fn saved_order_rekeys_incoming_items() {
        let mut order = Order::new(moment(), OrderStatus::Paid, client());
        order.assign_id(EntityId::new(4));
        order.add_item(OrderItem::new(EntityId::new(9), product(2, 5.0), 2, 5.0));
        assert_eq!(order.items().next().unwrap().order(), Some(EntityId::new(4)));
    }

    #[test]
    fn total_sums_subtotals() {
        let mut order = Order::new(moment(), OrderStatus::Paid, client());
        order.add_product(&product(1, 90.5), 2);
        order.add_product(&product(3, 1250.0), 1);
        assert_eq!(order.total(), 1431.0);
    }

    #[test]
    fn assign_id_rekeys_items() {
        let mut order = Order::new(moment(), OrderStatus::WaitingPayment, client());
        order.add_product(&product(1, 10.0), 1);
        assert_eq!(order.items().next().unwrap().order(), None);

        order.assign_id(EntityId::new(5));
        assert_eq!(order.items().next().unwrap().order(), Some(EntityId::new(5)));
    }

    #[test]
    fn merge_only_changes_status() {
        let mut stored = Order::new(moment(), OrderStatus::WaitingPayment, client());
        stored.assign_id(EntityId::new(2));
        stored.add_product(&product(1, 10.0), 1);

        let incoming = Order::new(Utc::now(), OrderStatus::Shipped, User::default());
        stored.merge_from(incoming);

        assert_eq!(stored.order_status, OrderStatus::Shipped);
        assert_eq!(stored.moment, moment());
        assert_eq!(stored.client.name, "Maria Brown");
        assert_eq!(stored.item_count(), 1);
    }

    #[test]
    fn json_nests_items_without_back_reference() {
        let mut order = Order::new(moment(), OrderStatus::Paid, client());
        order.assign_id(EntityId::new(1));
        order.add_product(&product(1, 90.5), 2);

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["orderStatus"], "PAID");
        assert_eq!(json["client"]["name"], "Maria Brown");
        assert_eq!(json["total"], 181.0);
        assert_eq!(json["moment"], "2019-06-20T19:53:07Z");

        let item = &json["items"][0];
        assert_eq!(item["subTotal"], 181.0);
        assert!(item.get("order").is_none());
    }
}
