//! # Stockroom Testkit
//!
//! Testing utilities for the stockroom assistant.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Generators**: Proptest strategies for items, categories and quantity changes
//! - **Fixtures**: An assistant over an in-memory store, with chat helpers
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use stockroom_core::parse_registration_fields;
//! use stockroom_testkit::generators::{new_item, registration_line};
//!
//! proptest! {
//!     #[test]
//!     fn registration_line_parses(item in new_item()) {
//!         let parsed = parse_registration_fields(item.category(), &registration_line(&item));
//!         prop_assert_eq!(parsed.unwrap(), item);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust,ignore
//! use stockroom_core::Category;
//! use stockroom_testkit::fixtures::{actors, TestFixture};
//!
//! let fixture = TestFixture::new();
//! let actor = actors(1)[0];
//! let reply = fixture.register(actor, Category::Equipment, "Drill | Power | 3").await;
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{actors, TestFixture};
pub use generators::{new_item, registration_line};
