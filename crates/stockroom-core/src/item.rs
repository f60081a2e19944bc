//! Stock items.
//!
//! An [`Item`] is a stored record; a [`NewItem`] is what registration hands to
//! the store before an id exists. The category-specific fields live in
//! [`ItemDetails`], so the category can never disagree with the fields.

use serde::{Deserialize, Serialize};

use crate::types::{Category, ItemId};

/// Category-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum ItemDetails {
    Equipment {
        equipment_type: String,
    },
    Component {
        size: String,
        component_type: String,
    },
}

impl ItemDetails {
    /// The category these details belong to.
    pub fn category(&self) -> Category {
        match self {
            ItemDetails::Equipment { .. } => Category::Equipment,
            ItemDetails::Component { .. } => Category::Component,
        }
    }
}

/// A stored stock record.
///
/// `quantity` is never negative at rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub quantity: i64,
    pub details: ItemDetails,
}

impl Item {
    pub fn category(&self) -> Category {
        self.details.category()
    }
}

/// An item awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub quantity: i64,
    pub details: ItemDetails,
}

impl NewItem {
    pub fn equipment(name: impl Into<String>, equipment_type: impl Into<String>, quantity: i64) -> Self {
        Self {
            name: name.into(),
            quantity,
            details: ItemDetails::Equipment {
                equipment_type: equipment_type.into(),
            },
        }
    }

    pub fn component(
        name: impl Into<String>,
        quantity: i64,
        size: impl Into<String>,
        component_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity,
            details: ItemDetails::Component {
                size: size.into(),
                component_type: component_type.into(),
            },
        }
    }

    pub fn category(&self) -> Category {
        self.details.category()
    }

    /// Attach the id assigned by the store.
    pub fn with_id(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            quantity: self.quantity,
            details: self.details,
        }
    }
}
