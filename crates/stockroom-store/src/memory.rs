//! In-memory implementation of the store traits.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use stockroom_core::{AuditEntry, AuditRecord, Category, Item, ItemId, NewItem};

use crate::error::{Result, StoreError};
use crate::traits::{name_matches, now_millis, AdjustOutcome, AuditLog, LedgerStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; every
/// mutation runs under the write lock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    equipment: Table,
    components: Table,
    audit: Vec<AuditEntry>,
}

#[derive(Default)]
struct Table {
    items: BTreeMap<ItemId, Item>,
    /// Last id handed out. Only ever grows.
    last_id: i64,
}

impl MemoryStoreInner {
    fn table(&self, category: Category) -> &Table {
        match category {
            Category::Equipment => &self.equipment,
            Category::Component => &self.components,
        }
    }

    fn table_mut(&mut self, category: Category) -> &mut Table {
        match category {
            Category::Equipment => &mut self.equipment,
            Category::Component => &mut self.components,
        }
    }
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn get_by_id(&self, category: Category, id: ItemId) -> Result<Option<Item>> {
        let inner = self.read()?;
        Ok(inner.table(category).items.get(&id).cloned())
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Item>> {
        let guard = self.read()?;
        let inner = &*guard;

        let hits = Category::ALL
            .iter()
            .flat_map(|&category| inner.table(category).items.values())
            .filter(|item| name_matches(&item.name, term))
            .cloned()
            .collect();

        Ok(hits)
    }

    async fn adjust_quantity(&self, category: Category, id: ItemId, delta: i64) -> Result<AdjustOutcome> {
        let mut inner = self.write()?;

        let Some(item) = inner.table_mut(category).items.get_mut(&id) else {
            return Ok(AdjustOutcome::NotFound);
        };

        match item.quantity.checked_add(delta) {
            Some(updated) if updated >= 0 => {
                item.quantity = updated;
                Ok(AdjustOutcome::Applied(item.clone()))
            }
            _ => Ok(AdjustOutcome::WouldGoNegative {
                current: item.quantity,
            }),
        }
    }

    async fn insert(&self, item: &NewItem) -> Result<ItemId> {
        if item.quantity < 0 {
            return Err(StoreError::InvalidData(format!(
                "negative quantity {} for new item",
                item.quantity
            )));
        }

        let mut inner = self.write()?;
        let table = inner.table_mut(item.category());

        table.last_id += 1;
        let id = ItemId(table.last_id);
        table.items.insert(id, item.clone().with_id(id));

        Ok(id)
    }
}

#[async_trait]
impl AuditLog for MemoryStore {
    async fn append(&self, record: &AuditRecord) -> Result<AuditEntry> {
        let mut inner = self.write()?;

        let entry = AuditEntry {
            seq: inner.audit.len() as u64 + 1,
            timestamp: now_millis(),
            record: record.clone(),
        };
        inner.audit.push(entry.clone());

        Ok(entry)
    }

    async fn entries(&self) -> Result<Vec<AuditEntry>> {
        Ok(self.read()?.audit.clone())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.read()?.audit.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::{ActionKind, ActorId};

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();

        let id = store
            .insert(&NewItem::component("Bolt", 10, "M12", "Fastener"))
            .await
            .unwrap();
        let item = store.get_by_id(Category::Component, id).await.unwrap().unwrap();

        assert_eq!(id, ItemId(1));
        assert_eq!(item.quantity, 10);
        assert!(store.get_by_id(Category::Equipment, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_adjust() {
        let store = MemoryStore::new();
        let id = store
            .insert(&NewItem::component("Bolt", 3, "M12", "Fastener"))
            .await
            .unwrap();

        let outcome = store.adjust_quantity(Category::Component, id, -999).await.unwrap();
        assert_eq!(outcome, AdjustOutcome::WouldGoNegative { current: 3 });

        let outcome = store.adjust_quantity(Category::Component, id, -3).await.unwrap();
        assert!(matches!(outcome, AdjustOutcome::Applied(ref item) if item.quantity == 0));

        let outcome = store.adjust_quantity(Category::Equipment, id, 1).await.unwrap();
        assert_eq!(outcome, AdjustOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_memory_store_search() {
        let store = MemoryStore::new();
        store
            .insert(&NewItem::component("Bolt M12", 3, "M12", "Fastener"))
            .await
            .unwrap();
        store
            .insert(&NewItem::equipment("Bolt cutter", "Hand tool", 1))
            .await
            .unwrap();

        let hits = store.search_by_name("bolt").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Bolt cutter");
        assert_eq!(hits[1].name, "Bolt M12");
    }

    #[tokio::test]
    async fn test_memory_store_audit() {
        let store = MemoryStore::new();
        let record = AuditRecord::new(ActorId(7), ActionKind::Give, Category::Component, ItemId(1))
            .details("delta -2");

        let entry = store.append(&record).await.unwrap();
        assert_eq!(entry.seq, 1);
        assert_eq!(entry.record, record);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
