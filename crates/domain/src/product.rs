//! Product entity.

use common::EntityId;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// A product from the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Option<EntityId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: String,
}

impl Product {
    /// Creates a product that has not been persisted yet.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        img_url: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            img_url: img_url.into(),
        }
    }
}

impl Entity for Product {
    fn entity_type() -> &'static str {
        "Product"
    }

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn merge_from(&mut self, other: Self) {
        self.name = other.name;
        self.description = other.description;
        self.price = other.price;
        self.img_url = other.img_url;
    }
}
