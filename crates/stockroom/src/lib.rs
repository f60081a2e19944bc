//! # Stockroom
//!
//! A conversational inventory assistant: operators query, add, withdraw and
//! register stock items through chat commands, and every change is audited.
//!
//! ## Overview
//!
//! - **Commands**: `/start`, `/cancel`, `/search`, `/add`, `/give`, `/add_new`
//! - **Ledger**: Equipment and Component items with a never-negative quantity
//! - **Registration**: a multi-turn flow that collects a new item's fields
//! - **Audit**: every successful search, adjustment and registration is logged
//!
//! The chat transport is not part of this crate. It hands each message to
//! [`Assistant::handle`] as an [`Inbound`] and renders the returned [`Reply`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stockroom::{ActorId, Assistant, AssistantConfig, Inbound};
//! use stockroom::store::SqliteStore;
//!
//! async fn example() {
//!     let store = Arc::new(SqliteStore::open("stock.db").unwrap());
//!     let assistant = Assistant::new(store.clone(), store, AssistantConfig::default());
//!
//!     let reply = assistant
//!         .handle(ActorId(42), Inbound::text("/search Equipment 5"))
//!         .await;
//!
//!     if let Some(reply) = reply {
//!         println!("{}", reply.text);
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `stockroom::core` - Items, categories, audit records
//! - `stockroom::store` - Ledger and audit storage, SQLite and in-memory

pub mod assistant;
pub mod command;
pub mod error;
pub mod messages;
pub mod registration;

pub use stockroom_core as core;
pub use stockroom_store as store;

pub use assistant::{Assistant, AssistantConfig};
pub use command::{interpret, Adjustment, CommandError, Direction, Intent, SearchTerm};
pub use error::{AssistantError, Result};
pub use messages::{Choice, Inbound, Reply};
pub use registration::{RegistrationSession, RegistrationState, SessionTable, TransitionError};

pub use stockroom_core::{
    ActionKind, ActorId, AuditEntry, AuditRecord, AuditScope, Category, Item, ItemDetails, ItemId,
    NewItem,
};
