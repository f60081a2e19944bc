//! # Stockroom Core
//!
//! Pure types for the stockroom assistant: items, categories, audit records,
//! registration field parsing and item formatting.
//!
//! This crate contains no I/O and no storage.
//!
//! ## Key Types
//!
//! - [`Item`] / [`NewItem`] - A stock record, before and after id assignment
//! - [`Category`] - Closed set of item kinds (Equipment, Component)
//! - [`AuditRecord`] / [`AuditEntry`] - An action, before and after it is logged
//! - [`ValidationError`] - Everything that is rejected before the store is touched

pub mod audit;
pub mod error;
pub mod format;
pub mod item;
pub mod types;
pub mod validation;

pub use audit::{ActionKind, AuditEntry, AuditRecord, AuditScope};
pub use error::ValidationError;
pub use format::{format_item, format_search_hit};
pub use item::{Item, ItemDetails, NewItem};
pub use types::{ActorId, Category, ItemId};
pub use validation::{parse_quantity, parse_registration_fields, FIELD_SEPARATOR};
