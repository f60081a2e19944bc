//! SQLite implementation of the store traits.
//!
//! This is the primary storage backend. It uses rusqlite with bundled SQLite,
//! wrapped in async via tokio::spawn_blocking. One connection behind a mutex
//! serializes every read-modify-write.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use stockroom_core::{
    ActionKind, ActorId, AuditEntry, AuditRecord, AuditScope, Category, Item, ItemDetails, ItemId,
    NewItem,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{name_matches, now_millis, AdjustOutcome, AuditLog, LedgerStore};

/// SQLite-based store implementation.
///
/// Implements both [`LedgerStore`] and [`AuditLog`] over the same database.
/// Cloning shares the connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file, and any missing parent directories, and runs
    /// migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let mut conn = Connection::open(path)?;
        register_functions(&conn)?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened ledger database");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        register_functions(&conn)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the locked connection on the blocking pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn table(category: Category) -> &'static str {
    match category {
        Category::Equipment => "equipment",
        Category::Component => "components",
    }
}

// Column order: id, name, quantity, equipment_type
fn row_to_equipment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: ItemId(row.get(0)?),
        name: row.get(1)?,
        quantity: row.get(2)?,
        details: ItemDetails::Equipment {
            equipment_type: row.get(3)?,
        },
    })
}

// Column order: id, name, quantity, size, component_type
fn row_to_component(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: ItemId(row.get(0)?),
        name: row.get(1)?,
        quantity: row.get(2)?,
        details: ItemDetails::Component {
            size: row.get(3)?,
            component_type: row.get(4)?,
        },
    })
}

const SELECT_EQUIPMENT: &str = "SELECT id, name, quantity, equipment_type FROM equipment";
const SELECT_COMPONENTS: &str = "SELECT id, name, quantity, size, component_type FROM components";

fn get_item(conn: &Connection, category: Category, id: ItemId) -> Result<Option<Item>> {
    let item = match category {
        Category::Equipment => conn
            .query_row(
                &format!("{SELECT_EQUIPMENT} WHERE id = ?1"),
                params![id.0],
                row_to_equipment,
            )
            .optional()?,
        Category::Component => conn
            .query_row(
                &format!("{SELECT_COMPONENTS} WHERE id = ?1"),
                params![id.0],
                row_to_component,
            )
            .optional()?,
    };
    Ok(item)
}

fn matching_items(conn: &Connection, category: Category, term: &str) -> Result<Vec<Item>> {
    let (select, mapper): (&str, fn(&rusqlite::Row<'_>) -> rusqlite::Result<Item>) = match category {
        Category::Equipment => (SELECT_EQUIPMENT, row_to_equipment),
        Category::Component => (SELECT_COMPONENTS, row_to_component),
    };

    let mut stmt = conn.prepare(&format!("{select} WHERE name_contains(name, ?1) ORDER BY id"))?;
    let items = stmt
        .query_map(params![term], mapper)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(items)
}

// SQLite's LIKE and lower() only fold ASCII, and names are often Cyrillic.
fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "name_contains",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let name: String = ctx.get(0)?;
            let term: String = ctx.get(1)?;
            Ok(name_matches(&name, &term))
        },
    )?;
    Ok(())
}

// Raw audit row before the text columns are parsed back into enums.
struct AuditRow {
    seq: i64,
    timestamp: i64,
    actor_id: i64,
    action: String,
    scope: String,
    item_id: i64,
    details: String,
}

impl AuditRow {
    fn into_entry(self) -> Result<AuditEntry> {
        let action = ActionKind::parse(&self.action)
            .ok_or_else(|| StoreError::InvalidData(format!("unknown audit action: {}", self.action)))?;
        let scope = AuditScope::parse(&self.scope)
            .ok_or_else(|| StoreError::InvalidData(format!("unknown audit scope: {}", self.scope)))?;

        Ok(AuditEntry {
            seq: self.seq as u64,
            timestamp: self.timestamp,
            record: AuditRecord {
                actor: ActorId(self.actor_id),
                action,
                scope,
                item_id: ItemId(self.item_id),
                details: self.details,
            },
        })
    }
}

#[async_trait]
impl LedgerStore for SqliteStore {
    async fn get_by_id(&self, category: Category, id: ItemId) -> Result<Option<Item>> {
        self.blocking(move |conn| get_item(conn, category, id)).await
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Item>> {
        let term = term.to_string();

        self.blocking(move |conn| {
            let mut hits = Vec::new();
            for category in Category::ALL {
                hits.extend(matching_items(conn, category, &term)?);
            }
            Ok(hits)
        })
        .await
    }

    async fn adjust_quantity(&self, category: Category, id: ItemId, delta: i64) -> Result<AdjustOutcome> {
        self.blocking(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let current: Option<i64> = tx
                .query_row(
                    &format!("SELECT quantity FROM {} WHERE id = ?1", table(category)),
                    params![id.0],
                    |row| row.get(0),
                )
                .optional()?;

            let Some(current) = current else {
                return Ok(AdjustOutcome::NotFound);
            };

            let updated = match current.checked_add(delta) {
                Some(q) if q >= 0 => q,
                _ => return Ok(AdjustOutcome::WouldGoNegative { current }),
            };

            tx.execute(
                &format!("UPDATE {} SET quantity = ?1 WHERE id = ?2", table(category)),
                params![updated, id.0],
            )?;

            let item = get_item(&tx, category, id)?.ok_or_else(|| {
                StoreError::InvalidData(format!("{category} {id} vanished during update"))
            })?;

            tx.commit()?;
            Ok(AdjustOutcome::Applied(item))
        })
        .await
    }

    async fn insert(&self, item: &NewItem) -> Result<ItemId> {
        if item.quantity < 0 {
            return Err(StoreError::InvalidData(format!(
                "negative quantity {} for new item",
                item.quantity
            )));
        }

        let item = item.clone();

        self.blocking(move |conn| {
            match &item.details {
                ItemDetails::Equipment { equipment_type } => conn.execute(
                    "INSERT INTO equipment (name, equipment_type, quantity) VALUES (?1, ?2, ?3)",
                    params![item.name, equipment_type, item.quantity],
                )?,
                ItemDetails::Component {
                    size,
                    component_type,
                } => conn.execute(
                    "INSERT INTO components (name, quantity, size, component_type)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![item.name, item.quantity, size, component_type],
                )?,
            };

            // Safe: the connection mutex is held until we return.
            Ok(ItemId(conn.last_insert_rowid()))
        })
        .await
    }
}

#[async_trait]
impl AuditLog for SqliteStore {
    async fn append(&self, record: &AuditRecord) -> Result<AuditEntry> {
        let record = record.clone();

        self.blocking(move |conn| {
            let timestamp = now_millis();

            conn.execute(
                "INSERT INTO audit_log (timestamp, actor_id, action, scope, item_id, details)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    timestamp,
                    record.actor.0,
                    record.action.as_str(),
                    record.scope.as_str(),
                    record.item_id.0,
                    record.details,
                ],
            )?;

            Ok(AuditEntry {
                seq: conn.last_insert_rowid() as u64,
                timestamp,
                record,
            })
        })
        .await
    }

    async fn entries(&self) -> Result<Vec<AuditEntry>> {
        self.blocking(|conn| {
            let mut stmt = conn.prepare(
                "SELECT seq, timestamp, actor_id, action, scope, item_id, details
                 FROM audit_log ORDER BY seq",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(AuditRow {
                        seq: row.get(0)?,
                        timestamp: row.get(1)?,
                        actor_id: row.get(2)?,
                        action: row.get(3)?,
                        scope: row.get(4)?,
                        item_id: row.get(5)?,
                        details: row.get(6)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            rows.into_iter().map(AuditRow::into_entry).collect()
        })
        .await
    }

    async fn count(&self) -> Result<usize> {
        self.blocking(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))?;
            Ok(count as usize)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lathe(quantity: i64) -> NewItem {
        NewItem::equipment("Lathe", "Metalwork", quantity)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = SqliteStore::open_memory().unwrap();

        let id = store.insert(&lathe(5)).await.unwrap();
        let item = store.get_by_id(Category::Equipment, id).await.unwrap().unwrap();

        assert_eq!(item.name, "Lathe");
        assert_eq!(item.quantity, 5);
        assert_eq!(item.category(), Category::Equipment);
    }

    #[tokio::test]
    async fn test_categories_are_separate() {
        let store = SqliteStore::open_memory().unwrap();

        let id = store.insert(&lathe(5)).await.unwrap();
        assert!(store.get_by_id(Category::Component, id).await.unwrap().is_none());

        let cid = store
            .insert(&NewItem::component("Bolt", 10, "M12", "Fastener"))
            .await
            .unwrap();
        // Each category has its own id sequence.
        assert_eq!(cid, id);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let store = SqliteStore::open_memory().unwrap();

        let mut last = ItemId(0);
        for _ in 0..5 {
            let id = store.insert(&lathe(1)).await.unwrap();
            assert!(id > last);
            last = id;
        }
    }

    #[tokio::test]
    async fn test_ids_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.db");

        let first = {
            let store = SqliteStore::open(&path).unwrap();
            store.insert(&lathe(1)).await.unwrap();
            store.insert(&lathe(1)).await.unwrap()
        };

        let store = SqliteStore::open(&path).unwrap();
        let second = store.insert(&lathe(1)).await.unwrap();

        assert!(second > first);
        assert!(store.get_by_id(Category::Equipment, first).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_adjust_returns_written_item() {
        let store = SqliteStore::open_memory().unwrap();
        let id = store.insert(&lathe(3)).await.unwrap();

        let outcome = store.adjust_quantity(Category::Equipment, id, 4).await.unwrap();
        match outcome {
            AdjustOutcome::Applied(item) => assert_eq!(item.quantity, 7),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_adjust_rejects_negative() {
        let store = SqliteStore::open_memory().unwrap();
        let id = store.insert(&lathe(3)).await.unwrap();

        let outcome = store.adjust_quantity(Category::Equipment, id, -999).await.unwrap();
        assert_eq!(outcome, AdjustOutcome::WouldGoNegative { current: 3 });

        let item = store.get_by_id(Category::Equipment, id).await.unwrap().unwrap();
        assert_eq!(item.quantity, 3);
    }

    #[tokio::test]
    async fn test_adjust_overflow_rejected() {
        let store = SqliteStore::open_memory().unwrap();
        let id = store.insert(&lathe(1)).await.unwrap();

        let outcome = store.adjust_quantity(Category::Equipment, id, i64::MAX).await.unwrap();
        assert_eq!(outcome, AdjustOutcome::WouldGoNegative { current: 1 });
    }

    #[tokio::test]
    async fn test_adjust_missing_item() {
        let store = SqliteStore::open_memory().unwrap();
        let outcome = store.adjust_quantity(Category::Component, ItemId(10), 1).await.unwrap();
        assert_eq!(outcome, AdjustOutcome::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_gives_never_go_negative() {
        let store = SqliteStore::open_memory().unwrap();
        let id = store.insert(&lathe(20)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.adjust_quantity(Category::Equipment, id, -1).await.unwrap()
            }));
        }

        let mut applied = 0;
        for handle in handles {
            if let AdjustOutcome::Applied(item) = handle.await.unwrap() {
                assert!(item.quantity >= 0);
                applied += 1;
            }
        }

        assert_eq!(applied, 20);
        let item = store.get_by_id(Category::Equipment, id).await.unwrap().unwrap();
        assert_eq!(item.quantity, 0);
    }

    #[tokio::test]
    async fn test_insert_negative_rejected() {
        let store = SqliteStore::open_memory().unwrap();
        let err = store.insert(&lathe(-1)).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let store = SqliteStore::open_memory().unwrap();
        store
            .insert(&NewItem::equipment("Станок ЧПУ", "Металлообработка", 1))
            .await
            .unwrap();
        store
            .insert(&NewItem::component("Болт М12", 100, "12x50", "Крепеж"))
            .await
            .unwrap();
        store
            .insert(&NewItem::component("станок-подставка", 2, "L", "Опора"))
            .await
            .unwrap();

        let hits = store.search_by_name("СТАНОК").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].category(), Category::Equipment);
        assert_eq!(hits[1].category(), Category::Component);

        assert!(store.search_by_name("гайка").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert(&lathe(1)).await.unwrap();

        assert!(store.search_by_name("%").await.unwrap().is_empty());
        assert!(store.search_by_name("L_the").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("stock.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .insert(&NewItem::equipment("Фрезер Bosch", "Деревообработка", 1))
                .await
                .unwrap();
            store.insert(&lathe(1)).await.unwrap();
        }
        assert!(path.exists());

        let store = SqliteStore::open(&path).unwrap();
        let hits = store.search_by_name("фрезер BOSCH").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Фрезер Bosch");
    }

    #[tokio::test]
    async fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = SqliteStore::open(blocker.join("stock.db")).err().unwrap();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[tokio::test]
    async fn test_audit_append_and_read() {
        let store = SqliteStore::open_memory().unwrap();

        let first = store
            .append(&AuditRecord::new(ActorId(1), ActionKind::AddNew, Category::Equipment, ItemId(1)))
            .await
            .unwrap();
        let second = store
            .append(
                &AuditRecord::new(ActorId(2), ActionKind::Search, AuditScope::All, ItemId::NONE)
                    .details("search: bolt"),
            )
            .await
            .unwrap();

        assert_eq!(first.seq, 1);
        assert_eq!(second.seq, 2);
        assert!(second.timestamp >= first.timestamp);

        let entries = store.entries().await.unwrap();
        assert_eq!(entries, vec![first, second]);
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(entries[1].record.scope, AuditScope::All);
        assert_eq!(entries[1].record.details, "search: bolt");
    }
}
