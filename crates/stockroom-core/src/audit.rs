//! Audit trail records.
//!
//! An [`AuditRecord`] describes an action; the audit log turns it into an
//! immutable [`AuditEntry`] by stamping a sequence number and a timestamp at
//! write time.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{ActorId, Category, ItemId};

/// What kind of action an audit entry records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Search,
    Add,
    Give,
    AddNew,
}

impl ActionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ActionKind::Search => "SEARCH",
            ActionKind::Add => "ADD",
            ActionKind::Give => "GIVE",
            ActionKind::AddNew => "ADD_NEW",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SEARCH" => Some(ActionKind::Search),
            "ADD" => Some(ActionKind::Add),
            "GIVE" => Some(ActionKind::Give),
            "ADD_NEW" => Some(ActionKind::AddNew),
            _ => None,
        }
    }

    /// Kind for a quantity change: positive deltas are additions, everything
    /// else is a withdrawal.
    pub const fn for_delta(delta: i64) -> Self {
        if delta > 0 {
            ActionKind::Add
        } else {
            ActionKind::Give
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of the ledger an action touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditScope {
    Category(Category),
    /// Cross-category name search.
    All,
}

impl AuditScope {
    pub const fn as_str(self) -> &'static str {
        match self {
            AuditScope::Category(c) => c.label(),
            AuditScope::All => "ALL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ALL" => Some(AuditScope::All),
            other => Category::from_token(other).ok().map(AuditScope::Category),
        }
    }
}

impl From<Category> for AuditScope {
    fn from(category: Category) -> Self {
        AuditScope::Category(category)
    }
}

/// An action to be recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub actor: ActorId,
    pub action: ActionKind,
    pub scope: AuditScope,
    /// [`ItemId::NONE`] when no single item is involved.
    pub item_id: ItemId,
    pub details: String,
}

impl AuditRecord {
    pub fn new(actor: ActorId, action: ActionKind, scope: impl Into<AuditScope>, item_id: ItemId) -> Self {
        Self {
            actor,
            action,
            scope: scope.into(),
            item_id,
            details: String::new(),
        }
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }
}

/// A written audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Position in the log, starting at 1.
    pub seq: u64,
    /// Write time (Unix ms).
    pub timestamp: i64,
    pub record: AuditRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_for_delta() {
        assert_eq!(ActionKind::for_delta(5), ActionKind::Add);
        assert_eq!(ActionKind::for_delta(-5), ActionKind::Give);
        assert_eq!(ActionKind::for_delta(0), ActionKind::Give);
    }

    #[test]
    fn test_action_kind_names() {
        for kind in [ActionKind::Search, ActionKind::Add, ActionKind::Give, ActionKind::AddNew] {
            assert_eq!(ActionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ActionKind::AddNew.to_string(), "ADD_NEW");
    }

    #[test]
    fn test_scope_names() {
        assert_eq!(AuditScope::All.as_str(), "ALL");
        assert_eq!(AuditScope::parse("Component"), Some(AuditScope::Category(Category::Component)));
        assert_eq!(AuditScope::parse("ALL"), Some(AuditScope::All));
        assert_eq!(AuditScope::parse("all"), None);
    }
}
