//! Domain model for the three stockroom record types.
//!
//! # Responsibility
//! - Define typed records for Category, Book and Grocery.
//! - Define the coerced field values that flow from the gateway to stores.
//!
//! # Invariants
//! - `id` and `date_created` are assigned by the store, never by callers.
//! - Required-on-create fields are non-nullable; optional fields are `Option`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod book;
pub mod category;
pub mod entity;
pub mod grocery;
pub mod record;
pub mod value;
