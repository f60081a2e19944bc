//! Store traits: the abstract interface for the ledger and its audit trail.
//!
//! The assistant is storage-agnostic. Implementations include SQLite
//! (primary) and in-memory (for tests).

use async_trait::async_trait;
use stockroom_core::{AuditEntry, AuditRecord, Category, Item, ItemId, NewItem};

use crate::error::Result;

/// Result of a quantity adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjustOutcome {
    /// The delta was applied. Carries the item as written.
    Applied(Item),
    /// No item with that id in that category.
    NotFound,
    /// The delta would leave the stock below zero (or overflow). Nothing was written.
    WouldGoNegative {
        /// Stock at the time of the attempt.
        current: i64,
    },
}

/// The ledger: items keyed by (category, id).
///
/// # Design Notes
///
/// - **Atomic adjustments**: `adjust_quantity` reads, checks and writes in one
///   critical section and returns the written item, so a confirmation can never
///   show a value produced by a concurrent adjustment.
/// - **Id assignment**: ids are monotonic per category and never reused, also
///   across restarts of a persistent store.
/// - **No auditing**: callers pair each mutation with an [`AuditLog`] append.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Get an item by id.
    async fn get_by_id(&self, category: Category, id: ItemId) -> Result<Option<Item>>;

    /// Case-insensitive substring search over item names in all categories.
    ///
    /// Ordered by category (Equipment first), then id. An empty result is not
    /// an error.
    async fn search_by_name(&self, term: &str) -> Result<Vec<Item>>;

    /// Apply `delta` to an item's quantity.
    async fn adjust_quantity(&self, category: Category, id: ItemId, delta: i64) -> Result<AdjustOutcome>;

    /// Insert a new item and return its assigned id.
    async fn insert(&self, item: &NewItem) -> Result<ItemId>;
}

/// Append-only audit trail.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Append a record, stamping it with the write time.
    async fn append(&self, record: &AuditRecord) -> Result<AuditEntry>;

    /// All entries in write order.
    async fn entries(&self) -> Result<Vec<AuditEntry>>;

    /// Number of entries.
    async fn count(&self) -> Result<usize>;
}

/// Case-insensitive substring match used by every backend.
///
/// Full Unicode lowercasing, so Cyrillic names match regardless of case.
pub fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
