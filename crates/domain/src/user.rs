//! User entity.

use common::EntityId;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// A registered shop user.
///
/// Every field besides `id` is stored and serialized as given.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: Option<EntityId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl User {
    /// Creates a user that has not been persisted yet.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            password: password.into(),
        }
    }
}

impl Entity for User {
    fn entity_type() -> &'static str {
        "User"
    }

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    // Password changes do not go through update.
    fn merge_from(&mut self, other: Self) {
        self.name = other.name;
        self.email = other.email;
        self.phone = other.phone;
    }
}
