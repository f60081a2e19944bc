//! # Stockroom Store
//!
//! Storage abstraction for the stockroom assistant. Provides trait-based
//! interfaces for the item ledger and the audit trail, with SQLite and
//! in-memory implementations.
//!
//! ## Key Types
//!
//! - [`LedgerStore`] - Items keyed by (category, id): lookup, search, atomic adjust, insert
//! - [`AuditLog`] - Append-only action history
//! - [`SqliteStore`] - SQLite-based persistent storage, implements both traits
//! - [`MemoryStore`] - In-memory storage for tests, implements both traits
//! - [`AdjustOutcome`] - Result of a quantity adjustment
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stockroom_core::{Category, NewItem};
//! use stockroom_store::{AdjustOutcome, LedgerStore, SqliteStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("stock.db").unwrap();
//!
//!     let id = store
//!         .insert(&NewItem::equipment("Lathe", "Metalwork", 5))
//!         .await
//!         .unwrap();
//!
//!     match store.adjust_quantity(Category::Equipment, id, -2).await.unwrap() {
//!         AdjustOutcome::Applied(item) => assert_eq!(item.quantity, 3),
//!         other => panic!("{other:?}"),
//!     }
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Stock never goes negative**: adjustments that would are rejected whole
//! - **Ids are never reused**: per-category monotonic counters, persistent in SQLite
//! - **The store does not audit itself**: callers append to the [`AuditLog`]

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{name_matches, AdjustOutcome, AuditLog, LedgerStore};
