//! Strong type definitions for the stockroom.
//!
//! Identifiers are newtypes so an actor id can never be passed where an item
//! id is expected, and categories are a closed enum parsed once at the edge.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Numeric item identifier, unique within a [`Category`].
///
/// Assigned by the store on insert. Never reused, not even after a restart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
    /// Placeholder used by audit entries that do not refer to one item.
    pub const NONE: Self = Self(0);

    /// Get the raw value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Chat user identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub i64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ActorId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// One of the two fixed item kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Equipment,
    Component,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 2] = [Category::Equipment, Category::Component];

    /// Parse a user-supplied category token.
    ///
    /// Case-sensitive. The Russian labels used by the first deployment of the
    /// bot are accepted as aliases.
    pub fn from_token(token: &str) -> Result<Self, ValidationError> {
        match token {
            "Equipment" | "Оборудование" => Ok(Category::Equipment),
            "Component" | "Компоненты" => Ok(Category::Component),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }

    /// Parse a category-chooser selector value.
    pub fn from_selector(value: &str) -> Option<Self> {
        match value {
            "equipment" => Some(Category::Equipment),
            "component" => Some(Category::Component),
            _ => None,
        }
    }

    /// The selector value sent back by the category chooser.
    pub const fn selector(self) -> &'static str {
        match self {
            Category::Equipment => "equipment",
            Category::Component => "component",
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Category::Equipment => "Equipment",
            Category::Component => "Component",
        }
    }

    /// Number of `|`-separated fields expected during registration.
    pub const fn field_count(self) -> usize {
        match self {
            Category::Equipment => 3,
            Category::Component => 4,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tokens() {
        assert_eq!(Category::from_token("Equipment").unwrap(), Category::Equipment);
        assert_eq!(Category::from_token("Component").unwrap(), Category::Component);
        assert_eq!(Category::from_token("Оборудование").unwrap(), Category::Equipment);
        assert_eq!(Category::from_token("Компоненты").unwrap(), Category::Component);
    }

    #[test]
    fn test_category_tokens_are_case_sensitive() {
        let err = Category::from_token("equipment").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownCategory(t) if t == "equipment"));
        assert!(Category::from_token("Tools").is_err());
    }

    #[test]
    fn test_selector_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::from_selector(category.selector()), Some(category));
        }
        assert_eq!(Category::from_selector("Equipment"), None);
    }

    #[test]
    fn test_serde_representation() {
        let json = serde_json::to_string(&Category::Component).unwrap();
        assert_eq!(json, "\"Component\"");
        let id: ItemId = serde_json::from_str("42").unwrap();
        assert_eq!(id, ItemId(42));
    }
}
